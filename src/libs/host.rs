//! Line-delimited JSON protocol spoken with the host editor.
//!
//! Each stdin line carries one [`HostEvent`], each stdout line one
//! [`HostOutput`]:
//!
//! ```text
//! → {"type":"active_file","path":"src/main.rs","project":"devpulse"}
//! → {"type":"command","command":{"name":"start_focus","activity":"review"}}
//! ← {"type":"status","tracker":"⏱ devpulse · 01:12","pomodoro":"🍅 25:00"}
//! ← {"type":"notice","level":"info","message":"Focus session started"}
//! ```

use crate::libs::config::PomodoroConfig;
use crate::libs::session::SessionType;
use crate::libs::status_bar::StatusText;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostEvent {
    /// The focused editor changed; no path means no file is focused.
    ActiveFile {
        #[serde(default)]
        path: Option<String>,
        #[serde(default)]
        project: Option<String>,
    },
    TextChanged,
    WindowFocus {
        focused: bool,
    },
    Command {
        command: HostCommand,
    },
    Shutdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum HostCommand {
    StartTracking,
    PauseTracking,
    ShowStats,
    StartFocus {
        #[serde(default)]
        activity: Option<String>,
    },
    StartBreak {
        kind: SessionType,
    },
    PauseSession,
    ResumeSession,
    StopSession,
    ExtendFocus {
        minutes: u32,
    },
    ExtendBreak {
        minutes: u32,
    },
    ShowPomodoroConfig,
    UpdatePomodoroConfig {
        config: PomodoroConfig,
    },
    AnnotateSession {
        id: i64,
        #[serde(default)]
        rating: Option<u8>,
        #[serde(default)]
        notes: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HostOutput {
    Status(StatusText),
    Notice { level: NoticeLevel, message: String },
    Panel { title: String, html: String },
}

impl HostOutput {
    pub fn info(message: impl ToString) -> Self {
        HostOutput::Notice {
            level: NoticeLevel::Info,
            message: message.to_string(),
        }
    }

    pub fn warning(message: impl ToString) -> Self {
        HostOutput::Notice {
            level: NoticeLevel::Warning,
            message: message.to_string(),
        }
    }

    pub fn error(message: impl ToString) -> Self {
        HostOutput::Notice {
            level: NoticeLevel::Error,
            message: message.to_string(),
        }
    }

    /// Serializes to a single protocol line, without the trailing newline.
    pub fn to_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Parses one protocol line.
pub fn parse_event(line: &str) -> Result<HostEvent> {
    Ok(serde_json::from_str(line.trim())?)
}
