//! Passive per-file time tracking.
//!
//! The tracker attributes wall-clock time to the file the editor has focused.
//! A one-second tick grows the accumulator while the window is focused; the
//! accumulator is flushed to the store as an [`ActivityEntry`] when the file
//! changes, the window loses focus, tracking pauses or the user goes idle.
//!
//! All operations take the current instant explicitly. The caller owns the
//! clock, which keeps the state machine deterministic.
//!
//! ```text
//!   file switch ─┐
//!   window blur ─┼──▶ flush(accumulated) ──▶ TimeEntryStore
//!   pause       ─┤
//!   idle trip   ─┘──▶ flush + idle entry, current file cleared
//! ```

use crate::db::time_entries::TimeEntryStore;
use crate::libs::activity::{ActivityEntry, EditorFile};
use crate::libs::config::TrackerConfig;
use crate::libs::messages::Message;
use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

/// Milliseconds credited per tick.
pub const TICK_MILLIS: u64 = 1000;

/// What a single tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Tracking is paused.
    Disabled,
    /// One tick was credited to the current file.
    Accumulated,
    /// The idle timeout tripped: accumulated time was flushed and an idle entry written.
    WentIdle,
    /// Still idle after an earlier trip; nothing to do.
    Idle,
    /// A file reported by the host was adopted again after an idle episode.
    Recovered,
    /// Nothing tracked (no file, or the window is unfocused).
    Waiting,
}

pub struct ActivityTracker<S: TimeEntryStore> {
    store: S,
    idle_timeout: Duration,
    current_file: Option<String>,
    project_root: Option<String>,
    accumulated_ms: u64,
    /// Start of the span the accumulator covers.
    segment_start: DateTime<Utc>,
    last_activity: DateTime<Utc>,
    tracking_enabled: bool,
    window_focused: bool,
    flushed: Vec<ActivityEntry>,
    warnings: Vec<String>,
}

impl<S: TimeEntryStore> ActivityTracker<S> {
    pub fn new(store: S, config: &TrackerConfig, now: DateTime<Utc>) -> Self {
        Self {
            store,
            idle_timeout: config.idle_timeout(),
            current_file: None,
            project_root: None,
            accumulated_ms: 0,
            segment_start: now,
            last_activity: now,
            tracking_enabled: false,
            window_focused: true,
            flushed: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking_enabled
    }

    pub fn current_file(&self) -> Option<&str> {
        self.current_file.as_deref()
    }

    pub fn project(&self) -> Option<&str> {
        self.project_root.as_deref()
    }

    pub fn accumulated_seconds(&self) -> u64 {
        self.accumulated_ms / 1000
    }

    pub fn last_activity(&self) -> DateTime<Utc> {
        self.last_activity
    }

    /// Drains the entries written since the last call, including idle ones.
    pub fn take_flushed(&mut self) -> Vec<ActivityEntry> {
        std::mem::take(&mut self.flushed)
    }

    /// Drains the warnings raised by failed writes since the last call.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Enables tracking on the host's active file.
    ///
    /// A file left over from before a pause is replaced, since switches are
    /// not followed while paused.
    pub fn start_tracking(&mut self, now: DateTime<Utc>, active: Option<&EditorFile>) {
        self.tracking_enabled = true;
        self.last_activity = now;
        if !self.is_current(active) {
            self.flush(now);
            match active {
                Some(file) => self.adopt(file, now),
                None => {
                    self.current_file = None;
                    self.project_root = None;
                }
            }
        }
        if self.accumulated_ms == 0 {
            self.segment_start = now;
        }
        debug!(file = ?self.current_file, "tracking started");
    }

    /// Stops ticking and flushes whatever is accumulated.
    pub fn pause_tracking(&mut self, now: DateTime<Utc>) -> Option<ActivityEntry> {
        self.tracking_enabled = false;
        debug!(file = ?self.current_file, "tracking paused");
        self.flush(now)
    }

    pub fn on_active_file_changed(&mut self, new_file: Option<&EditorFile>, now: DateTime<Utc>) -> Option<ActivityEntry> {
        self.last_activity = now;
        if !self.tracking_enabled {
            return None;
        }

        if self.is_current(new_file) {
            return None;
        }

        let flushed = self.flush(now);
        match new_file {
            Some(file) => self.adopt(file, now),
            None => {
                self.current_file = None;
                self.project_root = None;
            }
        }
        flushed
    }

    pub fn on_text_changed(&mut self, now: DateTime<Utc>, active: Option<&EditorFile>) {
        if self.tracking_enabled && self.current_file.is_none() {
            if let Some(file) = active {
                self.adopt(file, now);
            }
        }
        self.last_activity = now;
    }

    /// Losing focus flushes at once so time spent outside the editor is never credited.
    pub fn on_window_focus_changed(&mut self, focused: bool, now: DateTime<Utc>, active: Option<&EditorFile>) -> Option<ActivityEntry> {
        self.window_focused = focused;
        if !focused {
            return self.flush(now);
        }

        self.last_activity = now;
        if self.accumulated_ms == 0 {
            self.segment_start = now;
        }
        if self.tracking_enabled && self.current_file.is_none() {
            if let Some(file) = active {
                self.adopt(file, now);
            }
        }
        None
    }

    pub fn tick(&mut self, now: DateTime<Utc>, active: Option<&EditorFile>) -> TickOutcome {
        if !self.tracking_enabled {
            return TickOutcome::Disabled;
        }

        if now - self.last_activity > self.idle_timeout {
            if self.current_file.is_none() {
                return TickOutcome::Idle;
            }
            self.go_idle(now);
            return TickOutcome::WentIdle;
        }

        if self.current_file.is_some() {
            if !self.window_focused {
                return TickOutcome::Waiting;
            }
            self.accumulated_ms += TICK_MILLIS;
            return TickOutcome::Accumulated;
        }

        match active {
            Some(file) if self.window_focused => {
                self.adopt(file, now);
                TickOutcome::Recovered
            }
            _ => TickOutcome::Waiting,
        }
    }

    /// Writes the accumulated duration for the current file and resets the accumulator.
    ///
    /// Nothing is written when less than a second has accumulated. A failed
    /// write is logged and the duration is dropped.
    pub fn flush(&mut self, now: DateTime<Utc>) -> Option<ActivityEntry> {
        let seconds = self.accumulated_ms / 1000;
        self.accumulated_ms = 0;
        self.segment_start = now;
        if seconds == 0 {
            return None;
        }

        let entry = ActivityEntry::new(now, self.project_root.as_deref(), self.current_file.as_deref(), seconds);
        self.persist(entry)
    }

    fn go_idle(&mut self, now: DateTime<Utc>) {
        // Idle time starts where the credited time ends, never before it.
        let credited_end = self.segment_start + Duration::milliseconds(self.accumulated_ms as i64);
        let project = self.project_root.clone();

        self.flush(now);

        let idle_seconds = (now - credited_end).num_seconds().max(0) as u64;
        if idle_seconds > 0 {
            self.persist(ActivityEntry::idle(now, project.as_deref(), idle_seconds));
        }

        debug!(idle_seconds, "idle timeout reached");
        self.current_file = None;
        self.project_root = None;
        self.segment_start = now;
    }

    /// Files are identified by path and project together.
    fn is_current(&self, file: Option<&EditorFile>) -> bool {
        let identity = file.map(|f| (f.path.as_str(), f.project.as_deref()));
        identity == self.current_file.as_deref().map(|path| (path, self.project_root.as_deref()))
    }

    fn adopt(&mut self, file: &EditorFile, now: DateTime<Utc>) {
        self.current_file = Some(file.path.clone());
        self.project_root = file.project.clone();
        self.accumulated_ms = 0;
        self.segment_start = now;
    }

    fn persist(&mut self, mut entry: ActivityEntry) -> Option<ActivityEntry> {
        match self.store.insert(&entry) {
            Ok(id) => {
                entry.id = Some(id);
                self.flushed.push(entry.clone());
                Some(entry)
            }
            Err(e) => {
                warn!(error = %e, file = %entry.file, seconds = entry.duration_seconds, "failed to persist activity entry");
                self.warnings.push(Message::FlushFailed(e.to_string()).to_string());
                None
            }
        }
    }
}
