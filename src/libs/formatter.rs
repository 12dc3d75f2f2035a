//! Time formatting helpers for the status bar, tables and dashboards.
//!
//! ## Output Formats
//!
//! - Durations use `HH:MM`: hours and minutes zero-padded, seconds dropped,
//!   negative values clamped to `00:00`.
//! - Countdowns use `MM:SS`; minutes are not wrapped into hours, so an
//!   extended 70-minute focus session reads `70:00`.
//!
//! ```rust
//! use devpulse::libs::formatter::{format_clock, format_duration};
//! use chrono::Duration;
//!
//! assert_eq!(format_duration(&(Duration::hours(2) + Duration::minutes(30))), "02:30");
//! assert_eq!(format_clock(1499), "24:59");
//! ```

use chrono::{DateTime, Duration, Local, TimeZone};

/// Formats a duration as `HH:MM`.
pub fn format_duration(duration: &Duration) -> String {
    let hours = duration.num_hours();
    let mins = duration.num_minutes() % 60;

    format!("{:02}:{:02}", hours.max(0), mins.max(0))
}

/// Formats a number of seconds as `HH:MM`.
pub fn format_seconds(seconds: i64) -> String {
    format_duration(&Duration::seconds(seconds))
}

/// Formats a countdown as `MM:SS`.
pub fn format_clock(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Local wall-clock time (`HH:MM`) of an epoch timestamp, or `--:--` when out of range.
pub fn format_epoch_time(epoch: i64) -> String {
    Local
        .timestamp_opt(epoch, 0)
        .single()
        .map(|dt: DateTime<Local>| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
