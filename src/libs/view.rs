use super::config::PomodoroConfig;
use super::dashboard::pomodoro_config_rows;
use super::formatter::{format_epoch_time, format_seconds};
use super::session::PomodoroSession;
use super::stats::StatsReport;
use anyhow::Result;
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn stats(report: &StatsReport) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["PROJECT", "FILE", "TIME"]);
        for project in &report.projects {
            table.add_row(row![project.project, "", format_seconds(project.total_seconds as i64)]);
            for file in &project.files {
                table.add_row(row!["", file.file, format_seconds(file.seconds as i64)]);
            }
        }
        table.add_row(row!["ACTIVE", "", format_seconds(report.active_seconds as i64)]);
        table.add_row(row!["IDLE", "", format_seconds(report.idle_seconds as i64)]);
        table.printstd();

        let pomodoro = &report.pomodoro;
        let mut table = Table::new();
        table.add_row(row!["FOCUS", "GOAL", "FOCUS TIME", "BREAK TIME", "INTERRUPTED", "AVG RATING"]);
        table.add_row(row![
            pomodoro.completed_focus,
            format!("{} ({:.0}%)", pomodoro.daily_goal, pomodoro.goal_progress()),
            format_seconds(pomodoro.focus_seconds),
            format_seconds(pomodoro.break_seconds),
            pomodoro.interrupted,
            pomodoro.average_rating.map(|r| format!("{:.1}", r)).unwrap_or_else(|| "-".to_string())
        ]);
        table.printstd();

        Ok(())
    }

    pub fn sessions(sessions: &[PomodoroSession]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TYPE", "START", "END", "PLANNED", "ACTUAL", "STATUS", "ACTIVITY", "RATING", "NOTES"]);
        for session in sessions {
            let status = if session.was_completed {
                "completed"
            } else if session.was_interrupted {
                "interrupted"
            } else {
                "open"
            };
            table.add_row(row![
                session.id.unwrap_or(0),
                session.session_type,
                format_epoch_time(session.start_time),
                session.end_time.map(format_epoch_time).unwrap_or_default(),
                format_seconds(session.planned_duration_seconds),
                session.actual_duration_seconds.map(format_seconds).unwrap_or_default(),
                status,
                session.associated_activity.as_deref().unwrap_or(""),
                session.productivity_rating.map(|r| r.to_string()).unwrap_or_default(),
                session.notes.as_deref().unwrap_or("")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn pomodoro_config(config: &PomodoroConfig) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["SETTING", "VALUE"]);
        for (label, value) in pomodoro_config_rows(config) {
            table.add_row(row![label, value]);
        }
        table.printstd();

        Ok(())
    }

    pub fn table_counts(counts: &[(&str, Option<i64>)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["TABLE", "ROWS"]);
        for (name, rows) in counts {
            match rows {
                Some(rows) => table.add_row(row![name, rows]),
                None => table.add_row(row![name, "-"]),
            };
        }
        table.printstd();

        Ok(())
    }

    pub fn migration_history(history: &[(u32, String, String)]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["VERSION", "NAME", "APPLIED"]);
        for (version, name, applied_at) in history {
            table.add_row(row![format!("v{}", version), name, applied_at]);
        }
        table.printstd();

        Ok(())
    }
}
