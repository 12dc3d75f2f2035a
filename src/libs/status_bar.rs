//! Status bar texts pushed to the host.

use crate::libs::activity::UNKNOWN_PROJECT;
use crate::libs::formatter::{format_clock, format_seconds};
use crate::libs::messages::Message;
use crate::libs::pomodoro::PomodoroState;
use serde::{Deserialize, Serialize};

/// The two status bar items. `None` hides the item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusText {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pomodoro: Option<String>,
}

/// Tracker item: today's total for the project, including the open accumulation.
pub fn tracker_text(tracking: bool, project: Option<&str>, has_file: bool, today_seconds: u64) -> String {
    if !tracking {
        return format!("⏸ {}", Message::StatusTrackingPaused);
    }
    if !has_file {
        return format!("⏱ {}", Message::StatusWaitingForActivity);
    }
    format!(
        "⏱ {} · {}",
        project.unwrap_or(UNKNOWN_PROJECT),
        format_seconds(today_seconds as i64)
    )
}

/// Pomodoro item, hidden while inactive.
pub fn pomodoro_text(state: PomodoroState, remaining_seconds: i64) -> Option<String> {
    let icon = match state {
        PomodoroState::Inactive => return None,
        PomodoroState::Focus => "🍅",
        PomodoroState::FocusPaused => "⏸",
        PomodoroState::ShortBreak => "☕",
        PomodoroState::LongBreak | PomodoroState::BreakExtended => "🌴",
    };
    Some(format!("{} {}", icon, format_clock(remaining_seconds)))
}
