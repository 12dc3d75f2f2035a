//! Pomodoro focus/break state machine.
//!
//! ```text
//!             start_focus                  countdown = 0
//!  INACTIVE ───────────────▶ FOCUS ─────────────────────────▶ INACTIVE
//!     │                      │   ▲                               (completed)
//!     │                pause │   │ resume
//!     │                      ▼   │
//!     │                   FOCUS_PAUSED ──── back after ≥ break ──▶ INACTIVE
//!     │                                                           (interrupted)
//!     │  start_break           extend_break
//!     └────────────▶ SHORT/LONG_BREAK ──────▶ BREAK_EXTENDED
//!                           │                       │
//!                           └──── countdown = 0 ────┴──▶ INACTIVE
//!
//!  stop_session() from any state ──▶ INACTIVE (interrupted)
//! ```
//!
//! The countdown moves one second per [`PomodoroTimer::tick`]. Sessions are
//! persisted through a [`SessionStore`]; lifecycle events go to registered
//! [`PomodoroObserver`]s. Neither a failed write nor a failing observer ever
//! blocks a transition.

use crate::db::pomodoro_sessions::SessionStore;
use crate::libs::config::PomodoroConfig;
use crate::libs::error::PomodoroError;
use crate::libs::messages::Message;
use crate::libs::session::{PomodoroSession, SessionType};
use crate::libs::stats::local_day_bounds;
use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// How often the idle check runs.
pub const IDLE_CHECK_INTERVAL_SECS: u64 = 30;
/// Inactivity after which a running focus session pauses itself.
pub const IDLE_PAUSE_THRESHOLD_MINUTES: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PomodoroState {
    Inactive,
    Focus,
    FocusPaused,
    ShortBreak,
    LongBreak,
    BreakExtended,
}

impl PomodoroState {
    /// States in which the countdown runs.
    pub fn is_counting(&self) -> bool {
        matches!(self, PomodoroState::Focus | PomodoroState::ShortBreak | PomodoroState::LongBreak | PomodoroState::BreakExtended)
    }

    pub fn is_break(&self) -> bool {
        matches!(self, PomodoroState::ShortBreak | PomodoroState::LongBreak | PomodoroState::BreakExtended)
    }
}

impl fmt::Display for PomodoroState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PomodoroState::Inactive => "inactive",
            PomodoroState::Focus => "in focus",
            PomodoroState::FocusPaused => "paused",
            PomodoroState::ShortBreak => "on a short break",
            PomodoroState::LongBreak => "on a long break",
            PomodoroState::BreakExtended => "on an extended break",
        };
        f.write_str(name)
    }
}

/// Lifecycle notifications raised by the timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PomodoroEvent {
    FocusStarted { session_id: Option<i64>, planned_seconds: i64 },
    BreakStarted { kind: SessionType, planned_seconds: i64 },
    Paused { automatic: bool },
    Resumed,
    Extended { added_seconds: i64 },
    FocusCompleted { session_id: Option<i64>, next_break: SessionType },
    BreakCompleted { kind: SessionType },
    Stopped { kind: SessionType },
    /// A paused focus session was abandoned because the user stayed away longer than a break.
    Reset,
    DailyGoalReached { completed: u32, goal: u32 },
}

/// Consumer of [`PomodoroEvent`]s (notifications, sounds, ...).
pub trait PomodoroObserver {
    fn on_event(&mut self, event: &PomodoroEvent, config: &PomodoroConfig) -> anyhow::Result<()>;
}

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownOutcome {
    Inactive,
    Paused,
    Running,
    FocusCompleted,
    BreakCompleted,
}

pub struct PomodoroTimer<S: SessionStore> {
    store: S,
    config: PomodoroConfig,
    state: PomodoroState,
    session: Option<PomodoroSession>,
    remaining_seconds: i64,
    elapsed_seconds: i64,
    /// Focus sessions completed since the last long break.
    completed_in_cycle: u32,
    auto_paused: bool,
    observers: Vec<Box<dyn PomodoroObserver + Send>>,
    events: Vec<PomodoroEvent>,
    warnings: Vec<String>,
}

impl<S: SessionStore> PomodoroTimer<S> {
    pub fn new(store: S, config: PomodoroConfig) -> Self {
        Self {
            store,
            config,
            state: PomodoroState::Inactive,
            session: None,
            remaining_seconds: 0,
            elapsed_seconds: 0,
            completed_in_cycle: 0,
            auto_paused: false,
            observers: Vec::new(),
            events: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_observer(&mut self, observer: Box<dyn PomodoroObserver + Send>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> PomodoroState {
        self.state
    }

    pub fn config(&self) -> &PomodoroConfig {
        &self.config
    }

    /// New settings apply from the next session on.
    pub fn apply_config(&mut self, config: PomodoroConfig) {
        self.config = config;
    }

    pub fn remaining_seconds(&self) -> i64 {
        self.remaining_seconds
    }

    pub fn elapsed_seconds(&self) -> i64 {
        self.elapsed_seconds
    }

    pub fn current_session(&self) -> Option<&PomodoroSession> {
        self.session.as_ref()
    }

    pub fn completed_in_cycle(&self) -> u32 {
        self.completed_in_cycle
    }

    pub fn is_auto_paused(&self) -> bool {
        self.auto_paused
    }

    /// Events raised since the last call, in order.
    pub fn take_events(&mut self) -> Vec<PomodoroEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Break kind that follows the next completed focus session.
    pub fn next_break_kind(&self) -> SessionType {
        let every = self.config.sessions_until_long_break.max(1);
        if self.completed_in_cycle > 0 && self.completed_in_cycle % every == 0 {
            SessionType::LongBreak
        } else {
            SessionType::ShortBreak
        }
    }

    pub fn start_focus_session(&mut self, now: DateTime<Utc>, activity: Option<String>) -> Result<(), PomodoroError> {
        self.require(self.state == PomodoroState::Inactive, "start a focus session")?;

        let planned = self.config.focus_seconds();
        self.open_session(SessionType::Focus, planned, now, activity);
        self.state = PomodoroState::Focus;
        info!(planned, "focus session started");

        let session_id = self.session.as_ref().and_then(|s| s.id);
        self.emit(PomodoroEvent::FocusStarted {
            session_id,
            planned_seconds: planned,
        });
        Ok(())
    }

    pub fn start_break_session(&mut self, kind: SessionType, now: DateTime<Utc>) -> Result<(), PomodoroError> {
        self.require(self.state == PomodoroState::Inactive && kind.is_break(), "start a break")?;

        let (planned, state) = match kind {
            SessionType::LongBreak => (self.config.long_break_seconds(), PomodoroState::LongBreak),
            _ => (self.config.short_break_seconds(), PomodoroState::ShortBreak),
        };
        self.open_session(kind, planned, now, None);
        self.state = state;
        info!(%kind, planned, "break started");

        self.emit(PomodoroEvent::BreakStarted {
            kind,
            planned_seconds: planned,
        });
        Ok(())
    }

    pub fn pause_session(&mut self) -> Result<(), PomodoroError> {
        self.require(self.state == PomodoroState::Focus, "pause")?;
        self.pause(false);
        Ok(())
    }

    pub fn resume_session(&mut self) -> Result<(), PomodoroError> {
        self.require(self.state == PomodoroState::FocusPaused, "resume")?;
        self.state = PomodoroState::Focus;
        self.auto_paused = false;
        debug!(remaining = self.remaining_seconds, "focus resumed");
        self.emit(PomodoroEvent::Resumed);
        Ok(())
    }

    /// Interrupts whatever session is open and returns to INACTIVE.
    ///
    /// Returns the interrupted session, or `None` when nothing was running.
    pub fn stop_session(&mut self, now: DateTime<Utc>) -> Option<PomodoroSession> {
        let stopped = self.interrupt(now)?;
        self.emit(PomodoroEvent::Stopped { kind: stopped.session_type });
        Some(stopped)
    }

    /// Adds `minutes` to the running or paused focus session.
    pub fn extend_focus(&mut self, minutes: u32) -> Result<(), PomodoroError> {
        self.require(matches!(self.state, PomodoroState::Focus | PomodoroState::FocusPaused), "extend focus")?;
        self.extend(minutes)
    }

    /// Adds `minutes` to the current break and marks it extended.
    pub fn extend_break(&mut self, minutes: u32) -> Result<(), PomodoroError> {
        self.require(self.state.is_break(), "extend the break")?;
        self.extend(minutes)?;
        self.state = PomodoroState::BreakExtended;
        Ok(())
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> CountdownOutcome {
        if self.state == PomodoroState::Inactive {
            return CountdownOutcome::Inactive;
        }
        if !self.state.is_counting() {
            return CountdownOutcome::Paused;
        }

        self.remaining_seconds -= 1;
        self.elapsed_seconds += 1;
        if self.remaining_seconds > 0 {
            return CountdownOutcome::Running;
        }
        self.complete(now)
    }

    /// Pauses a running focus session once the user has been inactive past the threshold.
    ///
    /// `last_activity` is the shared activity clock kept by the tracker.
    pub fn check_idle(&mut self, now: DateTime<Utc>, last_activity: DateTime<Utc>) -> bool {
        if self.state != PomodoroState::Focus {
            return false;
        }
        if now - last_activity <= Duration::minutes(IDLE_PAUSE_THRESHOLD_MINUTES) {
            return false;
        }
        info!("focus paused after inactivity");
        self.pause(true);
        true
    }

    /// Reacts to the user coming back while focus is paused.
    ///
    /// Away for at least a short break: the session counts as interrupted and
    /// the timer resets. Shorter absences resume an automatically paused
    /// session; a manual pause stays paused.
    pub fn on_user_activity(&mut self, now: DateTime<Utc>, previous_activity: DateTime<Utc>) {
        if self.state != PomodoroState::FocusPaused {
            return;
        }

        if now - previous_activity >= Duration::seconds(self.config.short_break_seconds()) {
            if self.interrupt(now).is_some() {
                info!("paused focus session reset after a long absence");
                self.emit(PomodoroEvent::Reset);
            }
        } else if self.auto_paused {
            self.state = PomodoroState::Focus;
            self.auto_paused = false;
            self.emit(PomodoroEvent::Resumed);
        }
    }

    fn require(&self, allowed: bool, action: &'static str) -> Result<(), PomodoroError> {
        if allowed {
            Ok(())
        } else {
            Err(PomodoroError::InvalidTransition { state: self.state, action })
        }
    }

    fn pause(&mut self, automatic: bool) {
        self.state = PomodoroState::FocusPaused;
        self.auto_paused = automatic;
        self.emit(PomodoroEvent::Paused { automatic });
    }

    fn extend(&mut self, minutes: u32) -> Result<(), PomodoroError> {
        if minutes == 0 {
            return Err(PomodoroError::InvalidExtension);
        }
        let added = i64::from(minutes) * 60;
        self.remaining_seconds += added;
        if let Some(mut session) = self.session.take() {
            session.planned_duration_seconds += added;
            self.persist(&mut session);
            self.session = Some(session);
        }
        self.emit(PomodoroEvent::Extended { added_seconds: added });
        Ok(())
    }

    fn open_session(&mut self, kind: SessionType, planned: i64, now: DateTime<Utc>, activity: Option<String>) {
        let mut session = PomodoroSession::start(kind, planned, now.timestamp(), activity);
        self.persist(&mut session);
        self.session = Some(session);
        self.remaining_seconds = planned;
        self.elapsed_seconds = 0;
        self.auto_paused = false;
    }

    fn interrupt(&mut self, now: DateTime<Utc>) -> Option<PomodoroSession> {
        let mut session = self.session.take()?;
        session.was_interrupted = true;
        session.end_time = Some(now.timestamp());
        session.actual_duration_seconds = Some(self.elapsed_seconds);
        self.persist(&mut session);
        self.reset_countdown();
        Some(session)
    }

    fn complete(&mut self, now: DateTime<Utc>) -> CountdownOutcome {
        let Some(mut session) = self.session.take() else {
            self.reset_countdown();
            return CountdownOutcome::Inactive;
        };
        session.was_completed = true;
        session.end_time = Some(now.timestamp());
        session.actual_duration_seconds = Some(self.elapsed_seconds);
        self.persist(&mut session);
        self.reset_countdown();

        match session.session_type {
            SessionType::Focus => {
                self.completed_in_cycle += 1;
                let next_break = self.next_break_kind();
                info!(%next_break, "focus session completed");
                self.emit(PomodoroEvent::FocusCompleted {
                    session_id: session.id,
                    next_break,
                });
                self.check_daily_goal(now);

                if self.config.auto_start_breaks {
                    if let Err(e) = self.start_break_session(next_break, now) {
                        warn!(error = %e, "could not auto-start break");
                    }
                }
                CountdownOutcome::FocusCompleted
            }
            kind => {
                if kind == SessionType::LongBreak {
                    self.completed_in_cycle = 0;
                }
                info!(%kind, "break completed");
                self.emit(PomodoroEvent::BreakCompleted { kind });
                CountdownOutcome::BreakCompleted
            }
        }
    }

    fn check_daily_goal(&mut self, now: DateTime<Utc>) {
        let (day_start, _) = local_day_bounds(now.with_timezone(&Local).date_naive());
        match self.store.count_completed_focus_since(day_start.timestamp()) {
            Ok(completed) if completed == self.config.daily_goal_sessions => {
                self.emit(PomodoroEvent::DailyGoalReached {
                    completed,
                    goal: self.config.daily_goal_sessions,
                });
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "failed to count today's focus sessions"),
        }
    }

    fn reset_countdown(&mut self) {
        self.state = PomodoroState::Inactive;
        self.remaining_seconds = 0;
        self.elapsed_seconds = 0;
        self.auto_paused = false;
    }

    fn persist(&mut self, session: &mut PomodoroSession) {
        let result = match session.id {
            Some(_) => self.store.update(session),
            None => self.store.insert(session).map(|id| session.id = Some(id)),
        };
        if let Err(e) = result {
            warn!(error = %e, kind = %session.session_type, "failed to persist pomodoro session");
            self.warnings.push(Message::SessionSaveFailed(e.to_string()).to_string());
        }
    }

    fn emit(&mut self, event: PomodoroEvent) {
        for observer in self.observers.iter_mut() {
            if let Err(e) = observer.on_event(&event, &self.config) {
                warn!(error = %e, ?event, "pomodoro observer failed");
            }
        }
        self.events.push(event);
    }
}
