//! Activity entries produced by the tracker.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project name recorded when the host reports no workspace.
pub const UNKNOWN_PROJECT: &str = "unknown-project";
/// File name recorded when a flush happens without a tracked file.
pub const UNKNOWN_FILE: &str = "unknown-file";
/// File name of the entries covering idle spans.
pub const IDLE_FILE: &str = "IDLE";

/// One flushed slice of time.
///
/// Entries are written once and never updated; retention is unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub id: Option<i64>,
    /// Flush time.
    pub timestamp: DateTime<Utc>,
    pub project: String,
    pub file: String,
    pub duration_seconds: u64,
    pub is_idle: bool,
}

impl ActivityEntry {
    pub fn new(timestamp: DateTime<Utc>, project: Option<&str>, file: Option<&str>, duration_seconds: u64) -> Self {
        Self {
            id: None,
            timestamp,
            project: project.unwrap_or(UNKNOWN_PROJECT).to_string(),
            file: file.unwrap_or(UNKNOWN_FILE).to_string(),
            duration_seconds,
            is_idle: false,
        }
    }

    pub fn idle(timestamp: DateTime<Utc>, project: Option<&str>, duration_seconds: u64) -> Self {
        Self {
            id: None,
            timestamp,
            project: project.unwrap_or(UNKNOWN_PROJECT).to_string(),
            file: IDLE_FILE.to_string(),
            duration_seconds,
            is_idle: true,
        }
    }
}

/// Formats a timestamp the way it is stored: RFC 3339, UTC, milliseconds, `Z` suffix.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Identity of the file the editor has focused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorFile {
    pub path: String,
    #[serde(default)]
    pub project: Option<String>,
}

impl EditorFile {
    pub fn new(path: impl Into<String>, project: Option<&str>) -> Self {
        Self {
            path: path.into(),
            project: project.map(str::to_string),
        }
    }

    /// Lower-cased extension of the file path, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.path).extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase())
    }
}
