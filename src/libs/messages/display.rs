//! Text for every [`Message`] variant.
//!
//! All user-facing wording lives here, so a translation only has to replace
//! this match.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleTracker => "Activity tracker".to_string(),
            Message::ConfigModuleNotifications => "Notifications".to_string(),
            Message::ConfigModulePomodoro => "Pomodoro timer".to_string(),
            Message::PomodoroConfigHeader => "Pomodoro settings".to_string(),
            Message::PomodoroConfigSaved => "Pomodoro settings saved".to_string(),
            Message::PomodoroConfigReset => "Pomodoro settings restored to defaults".to_string(),

            // === PROMPTS ===
            Message::PromptIdleTimeout => "Idle timeout (minutes)".to_string(),
            Message::PromptAutoStartTracking => "Start tracking automatically?".to_string(),
            Message::PromptShowInStatusBar => "Show tracked time in the status bar?".to_string(),
            Message::PromptUseQuietHours => "Silence alerts during quiet hours?".to_string(),
            Message::PromptQuietHoursStart => "Quiet hours start (HH:MM)".to_string(),
            Message::PromptQuietHoursEnd => "Quiet hours end (HH:MM)".to_string(),
            Message::PromptFocusDuration => "Focus duration (minutes)".to_string(),
            Message::PromptShortBreakDuration => "Short break duration (minutes)".to_string(),
            Message::PromptLongBreakDuration => "Long break duration (minutes)".to_string(),
            Message::PromptSessionsUntilLongBreak => "Focus sessions before a long break".to_string(),
            Message::PromptDailyGoal => "Daily goal (focus sessions)".to_string(),
            Message::PromptAutoStartBreaks => "Start breaks automatically?".to_string(),
            Message::PromptAutoStartFocus => "Start focus automatically after a break?".to_string(),
            Message::PromptSoundAlerts => "Play sound alerts?".to_string(),
            Message::PromptDesktopNotifications => "Show desktop notifications?".to_string(),
            Message::PromptStatusBarTimer => "Show the timer in the status bar?".to_string(),

            // === TRACKER MESSAGES ===
            Message::TrackingStarted => "Time tracking started".to_string(),
            Message::TrackingPaused => "Time tracking paused".to_string(),
            Message::TrackerIdle => "No activity detected, tracking is idle".to_string(),
            Message::StatusTrackingPaused => "Tracking paused".to_string(),
            Message::StatusWaitingForActivity => "Waiting for activity".to_string(),
            Message::FlushFailed(error) => format!("Failed to save tracked time: {}", error),

            // === POMODORO MESSAGES ===
            Message::FocusStarted(minutes) => format!("Focus session started ({} min)", minutes),
            Message::ShortBreakStarted(minutes) => format!("Short break started ({} min)", minutes),
            Message::LongBreakStarted(minutes) => format!("Long break started ({} min)", minutes),
            Message::SessionPaused => "Session paused".to_string(),
            Message::SessionResumed => "Session resumed".to_string(),
            Message::SessionExtended(minutes) => format!("Session extended by {} min", minutes),
            Message::SessionStopped => "Session stopped".to_string(),
            Message::NoActiveSession => "No active Pomodoro session".to_string(),
            Message::SessionSaveFailed(error) => format!("Failed to save Pomodoro session: {}", error),
            Message::SessionAnnotated(id) => format!("Session {} updated", id),
            Message::SessionNotFound(id) => format!("Session {} not found", id),
            Message::SessionsHeader(date) => format!("Pomodoro sessions for {}", date),
            Message::NoSessionsForDate(date) => format!("No Pomodoro sessions for {}", date),

            // === ALERTS ===
            Message::AlertFocusComplete => "Focus session complete".to_string(),
            Message::AlertTakeShortBreak => "Time for a short break.".to_string(),
            Message::AlertTakeLongBreak => "You earned a long break.".to_string(),
            Message::AlertBreakComplete => "Break is over".to_string(),
            Message::AlertBackToWork => "Ready for the next focus session?".to_string(),
            Message::AlertDailyGoalReached => "Daily goal reached".to_string(),
            Message::AlertDailyGoalBody(completed) => format!("{} focus sessions completed today", completed),
            Message::AlertAutoPaused => "Focus paused".to_string(),
            Message::AlertAutoPausedBody => "No activity for 5 minutes, the timer is on hold.".to_string(),
            Message::AlertSessionReset => "Focus session reset".to_string(),
            Message::AlertSessionResetBody => "You were away longer than a break, the session was marked interrupted.".to_string(),

            // === STATS MESSAGES ===
            Message::StatsHeader(date) => format!("Coding activity for {}", date),
            Message::StatsEmpty => "Nothing tracked yet".to_string(),
            Message::HtmlWritten(path) => format!("Dashboard written to {}", path),
            Message::InvalidDate(value) => format!("Invalid date '{}', expected 'today' or YYYY-MM-DD", value),

            // === PANEL LABELS ===
            Message::LabelActive => "Active".to_string(),
            Message::LabelIdle => "Idle".to_string(),
            Message::LabelFile => "File".to_string(),
            Message::LabelTime => "Time".to_string(),
            Message::LabelPomodoro => "Pomodoro".to_string(),
            Message::LabelCompletedFocus => "Completed focus sessions".to_string(),
            Message::LabelFocusTime => "Focus time".to_string(),
            Message::LabelBreakTime => "Break time".to_string(),
            Message::LabelInterrupted => "Interrupted".to_string(),
            Message::LabelAverageRating => "Average rating".to_string(),
            Message::SettingFocus => "Focus".to_string(),
            Message::SettingShortBreak => "Short break".to_string(),
            Message::SettingLongBreak => "Long break".to_string(),
            Message::SettingSessionsUntilLongBreak => "Sessions until long break".to_string(),
            Message::SettingDailyGoal => "Daily goal".to_string(),
            Message::SettingAutoStartBreaks => "Auto-start breaks".to_string(),
            Message::SettingAutoStartFocus => "Auto-start focus".to_string(),
            Message::SettingSoundAlerts => "Sound alerts".to_string(),
            Message::SettingDesktopNotifications => "Desktop notifications".to_string(),
            Message::SettingStatusBarTimer => "Status bar timer".to_string(),
            Message::ValueMinutes(minutes) => format!("{} min", minutes),
            Message::ValueSessions(count) => format!("{} sessions", count),
            Message::ValueOn => "on".to_string(),
            Message::ValueOff => "off".to_string(),

            // === WATCH MESSAGES ===
            Message::WatchStarted => "Watching editor events on stdin".to_string(),
            Message::WatchStopped => "Watch stopped, tracked time flushed".to_string(),
            Message::MalformedHostLine(error) => format!("Ignoring malformed host message: {}", error),
            Message::WatchStartFailed(error) => format!("devpulse failed to start: {}", error),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
            Message::DatabaseVersion(version, latest) => format!("Database schema version: {} (latest {})", version, latest),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
            Message::PendingMigration(version, name) => format!("  pending v{}: {}", version, name),
            Message::MigrationHistory => "Migration history:".to_string(),
        };
        write!(f, "{}", text)
    }
}
