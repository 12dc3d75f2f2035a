//! Daily aggregation of activity entries and Pomodoro sessions.
//!
//! The report answers "where did today go": per project, the total seconds
//! and per-file breakdown, plus a summary of the focus sessions. Idle entries
//! only count towards the idle total, never towards a project.

use crate::libs::activity::ActivityEntry;
use crate::libs::session::{PomodoroSession, SessionType};
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::BTreeMap;

/// UTC bounds `[start, end)` of a local calendar day.
///
/// On days where local midnight does not exist (DST gaps) the earliest valid
/// local time is used, falling back to UTC midnight.
pub fn local_day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start_of = |day: NaiveDate| -> DateTime<Utc> {
        let midnight = day.and_time(NaiveTime::MIN);
        Local
            .from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
    };
    let next = date.succ_opt().unwrap_or(date);
    let start = start_of(date);
    let end = if next == date { start + Duration::days(1) } else { start_of(next) };
    (start, end)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTime {
    pub file: String,
    pub seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectStats {
    pub project: String,
    pub total_seconds: u64,
    /// Longest first.
    pub files: Vec<FileTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PomodoroSummary {
    pub completed_focus: u32,
    pub focus_seconds: i64,
    pub interrupted: u32,
    pub break_seconds: i64,
    pub average_rating: Option<f64>,
    pub daily_goal: u32,
}

impl PomodoroSummary {
    pub fn from_sessions(sessions: &[PomodoroSession], daily_goal: u32) -> Self {
        let mut summary = PomodoroSummary {
            completed_focus: 0,
            focus_seconds: 0,
            interrupted: 0,
            break_seconds: 0,
            average_rating: None,
            daily_goal,
        };
        let mut ratings = Vec::new();

        for session in sessions {
            let actual = session.actual_duration_seconds.unwrap_or(0);
            match session.session_type {
                SessionType::Focus => {
                    summary.focus_seconds += actual;
                    if session.was_completed {
                        summary.completed_focus += 1;
                    }
                }
                SessionType::ShortBreak | SessionType::LongBreak => summary.break_seconds += actual,
            }
            if session.was_interrupted {
                summary.interrupted += 1;
            }
            if let Some(rating) = session.productivity_rating {
                ratings.push(f64::from(rating));
            }
        }

        if !ratings.is_empty() {
            summary.average_rating = Some(ratings.iter().sum::<f64>() / ratings.len() as f64);
        }
        summary
    }

    /// Completed focus sessions as a percentage of the daily goal, capped at 100.
    pub fn goal_progress(&self) -> f64 {
        if self.daily_goal == 0 {
            return 0.0;
        }
        (f64::from(self.completed_focus) / f64::from(self.daily_goal) * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsReport {
    pub date: NaiveDate,
    /// Busiest project first.
    pub projects: Vec<ProjectStats>,
    pub active_seconds: u64,
    pub idle_seconds: u64,
    pub pomodoro: PomodoroSummary,
}

impl StatsReport {
    /// Aggregates entries and sessions already narrowed to `date`.
    pub fn build(entries: &[ActivityEntry], sessions: &[PomodoroSession], date: NaiveDate, daily_goal: u32) -> Self {
        let mut per_project: BTreeMap<&str, BTreeMap<&str, u64>> = BTreeMap::new();
        let mut active_seconds = 0;
        let mut idle_seconds = 0;

        for entry in entries {
            if entry.is_idle {
                idle_seconds += entry.duration_seconds;
                continue;
            }
            active_seconds += entry.duration_seconds;
            *per_project
                .entry(entry.project.as_str())
                .or_default()
                .entry(entry.file.as_str())
                .or_default() += entry.duration_seconds;
        }

        let mut projects: Vec<ProjectStats> = per_project
            .into_iter()
            .map(|(project, files)| {
                let mut files: Vec<FileTime> = files
                    .into_iter()
                    .map(|(file, seconds)| FileTime {
                        file: file.to_string(),
                        seconds,
                    })
                    .collect();
                files.sort_by(|a, b| b.seconds.cmp(&a.seconds).then_with(|| a.file.cmp(&b.file)));
                ProjectStats {
                    project: project.to_string(),
                    total_seconds: files.iter().map(|f| f.seconds).sum(),
                    files,
                }
            })
            .collect();
        projects.sort_by(|a, b| b.total_seconds.cmp(&a.total_seconds).then_with(|| a.project.cmp(&b.project)));

        StatsReport {
            date,
            projects,
            active_seconds,
            idle_seconds,
            pomodoro: PomodoroSummary::from_sessions(sessions, daily_goal),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
            && self.idle_seconds == 0
            && self.pomodoro.focus_seconds == 0
            && self.pomodoro.break_seconds == 0
            && self.pomodoro.interrupted == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_span_one_local_day() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let (start, end) = local_day_bounds(date);
        assert_eq!(start.with_timezone(&Local).date_naive(), date);
        assert_eq!(end - start, Duration::days(1));
    }

    #[test]
    fn goal_progress_caps_at_hundred() {
        let mut summary = PomodoroSummary::from_sessions(&[], 4);
        summary.completed_focus = 6;
        assert_eq!(summary.goal_progress(), 100.0);
        summary.completed_focus = 1;
        assert_eq!(summary.goal_progress(), 25.0);
    }
}
