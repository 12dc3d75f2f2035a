//! Composition root wiring the tracker, the Pomodoro timer and the host.
//!
//! The engine owns every stateful component and is driven from a single
//! loop: host events through [`Engine::handle`], the one-second
//! [`Engine::tick`] and the thirty-second [`Engine::idle_check`]. Each call
//! returns the lines to send back to the host. One activity clock, kept by
//! the tracker, serves both the tracker's idle timeout and the timer's
//! auto-pause.

use crate::db::db::Db;
use crate::db::pomodoro_config::PomodoroConfigs;
use crate::db::pomodoro_sessions::PomodoroSessions;
use crate::db::time_entries::TimeEntries;
use crate::libs::activity::{EditorFile, UNKNOWN_PROJECT};
use crate::libs::config::{Config, TrackerConfig};
use crate::libs::dashboard::{render_pomodoro_config, render_stats};
use crate::libs::host::{HostCommand, HostEvent, HostOutput};
use crate::libs::messages::Message;
use crate::libs::pomodoro::{CountdownOutcome, PomodoroEvent, PomodoroObserver, PomodoroState, PomodoroTimer};
use crate::libs::session::SessionType;
use crate::libs::stats::{local_day_bounds, StatsReport};
use crate::libs::status_bar::{pomodoro_text, tracker_text, StatusText};
use crate::libs::tracker::{ActivityTracker, TickOutcome};
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, Utc};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Extensions that count as "coding" for the focus auto-start.
pub const CODING_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "py", "rs", "go", "java", "c", "cpp", "h", "hpp", "cs", "rb", "php", "swift", "kt", "scala", "vue",
    "svelte", "html", "css", "scss", "json", "md", "sql", "sh",
];

pub fn is_coding_file(file: &EditorFile) -> bool {
    file.extension().is_some_and(|ext| CODING_EXTENSIONS.contains(&ext.as_str()))
}

pub struct Engine {
    tracker: ActivityTracker<TimeEntries>,
    pomodoro: PomodoroTimer<PomodoroSessions>,
    time_entries: TimeEntries,
    sessions: PomodoroSessions,
    configs: PomodoroConfigs,
    tracker_config: TrackerConfig,
    active_file: Option<EditorFile>,
    /// Local day the project totals belong to.
    today: NaiveDate,
    /// Seconds flushed today per project, idle excluded.
    project_totals: HashMap<String, u64>,
    last_status: Option<StatusText>,
}

impl Engine {
    /// Builds the engine on top of `db`. Fails when the stored Pomodoro settings cannot be loaded.
    pub fn new(db: &Db, config: &Config, now: DateTime<Utc>) -> Result<Self> {
        let tracker_config = config.tracker.clone().unwrap_or_default();
        let configs = PomodoroConfigs::new(db);
        let pomodoro_config = configs.load()?;
        let time_entries = TimeEntries::new(db);
        let sessions = PomodoroSessions::new(db);

        let mut engine = Engine {
            tracker: ActivityTracker::new(time_entries.clone(), &tracker_config, now),
            pomodoro: PomodoroTimer::new(sessions.clone(), pomodoro_config),
            time_entries,
            sessions,
            configs,
            tracker_config,
            active_file: None,
            today: now.with_timezone(&Local).date_naive(),
            project_totals: HashMap::new(),
            last_status: None,
        };
        engine.reload_totals(now)?;

        if engine.tracker_config.auto_start_tracking {
            engine.tracker.start_tracking(now, None);
        }
        info!(tracking = engine.tracker.is_tracking(), "engine ready");
        Ok(engine)
    }

    pub fn add_observer(&mut self, observer: Box<dyn PomodoroObserver + Send>) {
        self.pomodoro.add_observer(observer);
    }

    pub fn tracker(&self) -> &ActivityTracker<TimeEntries> {
        &self.tracker
    }

    pub fn pomodoro(&self) -> &PomodoroTimer<PomodoroSessions> {
        &self.pomodoro
    }

    pub fn handle(&mut self, event: HostEvent, now: DateTime<Utc>) -> Vec<HostOutput> {
        let mut outputs = Vec::new();
        match event {
            HostEvent::ActiveFile { path, project } => {
                self.active_file = path.map(|path| EditorFile::new(path, project.as_deref()));
                let previous = self.tracker.last_activity();
                self.tracker.on_active_file_changed(self.active_file.as_ref(), now);
                self.pomodoro.on_user_activity(now, previous);
                self.maybe_auto_start_focus(now);
            }
            HostEvent::TextChanged => {
                let previous = self.tracker.last_activity();
                self.tracker.on_text_changed(now, self.active_file.as_ref());
                self.pomodoro.on_user_activity(now, previous);
            }
            HostEvent::WindowFocus { focused } => {
                let previous = self.tracker.last_activity();
                self.tracker.on_window_focus_changed(focused, now, self.active_file.as_ref());
                if focused {
                    self.pomodoro.on_user_activity(now, previous);
                }
            }
            HostEvent::Command { command } => match self.run_command(command, now) {
                Ok(mut produced) => outputs.append(&mut produced),
                Err(e) => {
                    warn!(error = %e, "command failed");
                    outputs.push(HostOutput::error(e));
                }
            },
            HostEvent::Shutdown => return self.shutdown(now),
        }
        self.collect(now, outputs)
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<HostOutput> {
        let mut outputs = Vec::new();
        if self.tracker.tick(now, self.active_file.as_ref()) == TickOutcome::WentIdle {
            debug!("tracker went idle");
            outputs.push(HostOutput::info(Message::TrackerIdle));
        }
        if self.pomodoro.tick(now) == CountdownOutcome::BreakCompleted {
            self.maybe_auto_start_focus(now);
        }
        self.collect(now, outputs)
    }

    pub fn idle_check(&mut self, now: DateTime<Utc>) -> Vec<HostOutput> {
        self.pomodoro.check_idle(now, self.tracker.last_activity());
        self.collect(now, Vec::new())
    }

    /// Flushes the tracker and interrupts any open session.
    pub fn shutdown(&mut self, now: DateTime<Utc>) -> Vec<HostOutput> {
        self.tracker.flush(now);
        self.pomodoro.stop_session(now);
        info!("engine shut down");
        self.collect(now, Vec::new())
    }

    /// Current status bar texts.
    pub fn status(&self) -> StatusText {
        let tracker = self.tracker_config.show_in_status_bar.then(|| {
            let project = self.tracker.project();
            let flushed = self.project_totals.get(project.unwrap_or(UNKNOWN_PROJECT)).copied().unwrap_or(0);
            tracker_text(
                self.tracker.is_tracking(),
                project,
                self.tracker.current_file().is_some(),
                flushed + self.tracker.accumulated_seconds(),
            )
        });
        let pomodoro = if self.pomodoro.config().enable_status_bar_timer {
            pomodoro_text(self.pomodoro.state(), self.pomodoro.remaining_seconds())
        } else {
            None
        };
        StatusText { tracker, pomodoro }
    }

    fn run_command(&mut self, command: HostCommand, now: DateTime<Utc>) -> Result<Vec<HostOutput>> {
        debug!(?command, "host command");
        let output = match command {
            HostCommand::StartTracking => {
                self.tracker.start_tracking(now, self.active_file.as_ref());
                HostOutput::info(Message::TrackingStarted)
            }
            HostCommand::PauseTracking => {
                self.tracker.pause_tracking(now);
                HostOutput::info(Message::TrackingPaused)
            }
            HostCommand::ShowStats => {
                let date = now.with_timezone(&Local).date_naive();
                let report = self.report_for(date)?;
                HostOutput::Panel {
                    title: Message::StatsHeader(date.format("%Y-%m-%d").to_string()).to_string(),
                    html: render_stats(&report),
                }
            }
            HostCommand::StartFocus { activity } => {
                let activity = activity.or_else(|| self.tracker.project().map(str::to_string));
                self.pomodoro.start_focus_session(now, activity)?;
                return Ok(Vec::new());
            }
            HostCommand::StartBreak { kind } => {
                self.pomodoro.start_break_session(kind, now)?;
                return Ok(Vec::new());
            }
            HostCommand::PauseSession => {
                self.pomodoro.pause_session()?;
                return Ok(Vec::new());
            }
            HostCommand::ResumeSession => {
                self.pomodoro.resume_session()?;
                return Ok(Vec::new());
            }
            HostCommand::StopSession => match self.pomodoro.stop_session(now) {
                Some(_) => return Ok(Vec::new()),
                None => HostOutput::info(Message::NoActiveSession),
            },
            HostCommand::ExtendFocus { minutes } => {
                self.pomodoro.extend_focus(minutes)?;
                return Ok(Vec::new());
            }
            HostCommand::ExtendBreak { minutes } => {
                self.pomodoro.extend_break(minutes)?;
                return Ok(Vec::new());
            }
            HostCommand::ShowPomodoroConfig => HostOutput::Panel {
                title: Message::PomodoroConfigHeader.to_string(),
                html: render_pomodoro_config(self.pomodoro.config()),
            },
            HostCommand::UpdatePomodoroConfig { config } => {
                self.configs.save(&config)?;
                self.pomodoro.apply_config(config);
                HostOutput::info(Message::PomodoroConfigSaved)
            }
            HostCommand::AnnotateSession { id, rating, notes } => {
                self.sessions.annotate(id, rating, notes, None)?;
                HostOutput::info(Message::SessionAnnotated(id))
            }
        };
        Ok(vec![output])
    }

    /// Starts focus when enabled, idle, tracking and looking at a coding file.
    fn maybe_auto_start_focus(&mut self, now: DateTime<Utc>) {
        let eligible = self.pomodoro.config().auto_start_focus
            && self.pomodoro.state() == PomodoroState::Inactive
            && self.tracker.is_tracking()
            && self.active_file.as_ref().is_some_and(is_coding_file);
        if !eligible {
            return;
        }
        let activity = self.tracker.project().map(str::to_string);
        if let Err(e) = self.pomodoro.start_focus_session(now, activity) {
            warn!(error = %e, "focus auto-start failed");
        }
    }

    fn report_for(&self, date: NaiveDate) -> Result<StatsReport> {
        let (from, to) = local_day_bounds(date);
        let entries = self.time_entries.fetch_range(from, to)?;
        let sessions = self.sessions.fetch_range(from.timestamp(), to.timestamp())?;
        Ok(StatsReport::build(&entries, &sessions, date, self.pomodoro.config().daily_goal_sessions))
    }

    fn reload_totals(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.today = now.with_timezone(&Local).date_naive();
        let (from, to) = local_day_bounds(self.today);
        self.project_totals.clear();
        for entry in self.time_entries.fetch_range(from, to)?.into_iter().filter(|e| !e.is_idle) {
            *self.project_totals.entry(entry.project).or_default() += entry.duration_seconds;
        }
        Ok(())
    }

    /// Appends notices for everything that happened during the call and the status when it changed.
    fn collect(&mut self, now: DateTime<Utc>, mut outputs: Vec<HostOutput>) -> Vec<HostOutput> {
        if now.with_timezone(&Local).date_naive() != self.today {
            if let Err(e) = self.reload_totals(now) {
                warn!(error = %e, "failed to reload today's totals");
                self.project_totals.clear();
            }
        }
        for entry in self.tracker.take_flushed() {
            if !entry.is_idle && entry.timestamp.with_timezone(&Local).date_naive() == self.today {
                *self.project_totals.entry(entry.project).or_default() += entry.duration_seconds;
            }
        }

        outputs.extend(self.pomodoro.take_events().iter().filter_map(notice_for));
        outputs.extend(self.tracker.take_warnings().into_iter().map(HostOutput::warning));
        outputs.extend(self.pomodoro.take_warnings().into_iter().map(HostOutput::warning));

        let status = self.status();
        if self.last_status.as_ref() != Some(&status) {
            self.last_status = Some(status.clone());
            outputs.push(HostOutput::Status(status));
        }
        outputs
    }
}

fn notice_for(event: &PomodoroEvent) -> Option<HostOutput> {
    let message = match event {
        PomodoroEvent::FocusStarted { planned_seconds, .. } => Message::FocusStarted(planned_seconds / 60),
        PomodoroEvent::BreakStarted { kind, planned_seconds } => match kind {
            SessionType::LongBreak => Message::LongBreakStarted(planned_seconds / 60),
            _ => Message::ShortBreakStarted(planned_seconds / 60),
        },
        PomodoroEvent::Paused { automatic: true } => Message::AlertAutoPaused,
        PomodoroEvent::Paused { automatic: false } => Message::SessionPaused,
        PomodoroEvent::Resumed => Message::SessionResumed,
        PomodoroEvent::Extended { added_seconds } => Message::SessionExtended(added_seconds / 60),
        PomodoroEvent::FocusCompleted { .. } => Message::AlertFocusComplete,
        PomodoroEvent::BreakCompleted { .. } => Message::AlertBreakComplete,
        PomodoroEvent::Stopped { .. } => Message::SessionStopped,
        PomodoroEvent::Reset => return Some(HostOutput::warning(Message::AlertSessionReset)),
        PomodoroEvent::DailyGoalReached { completed, .. } => Message::AlertDailyGoalBody(*completed),
    };
    Some(HostOutput::info(message))
}
