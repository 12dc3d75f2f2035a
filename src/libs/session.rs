//! Pomodoro session records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of countdown a session represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Focus,
    ShortBreak,
    LongBreak,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Focus => "focus",
            SessionType::ShortBreak => "short_break",
            SessionType::LongBreak => "long_break",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, SessionType::Focus)
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(SessionType::Focus),
            "short_break" => Ok(SessionType::ShortBreak),
            "long_break" => Ok(SessionType::LongBreak),
            other => Err(format!("unknown session type '{}'", other)),
        }
    }
}

/// One focus or break attempt.
///
/// Created when the countdown starts and updated in place when it completes,
/// is interrupted, extended or annotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSession {
    pub id: Option<i64>,
    pub session_type: SessionType,
    pub planned_duration_seconds: i64,
    pub actual_duration_seconds: Option<i64>,
    /// Epoch seconds.
    pub start_time: i64,
    /// Epoch seconds, `None` while the session runs.
    pub end_time: Option<i64>,
    pub was_completed: bool,
    pub was_interrupted: bool,
    pub associated_activity: Option<String>,
    pub productivity_rating: Option<u8>,
    pub notes: Option<String>,
}

impl PomodoroSession {
    pub fn start(session_type: SessionType, planned_duration_seconds: i64, start_time: i64, associated_activity: Option<String>) -> Self {
        Self {
            id: None,
            session_type,
            planned_duration_seconds,
            actual_duration_seconds: None,
            start_time,
            end_time: None,
            was_completed: false,
            was_interrupted: false,
            associated_activity,
            productivity_rating: None,
            notes: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_type_round_trips_through_its_column_value() {
        for kind in [SessionType::Focus, SessionType::ShortBreak, SessionType::LongBreak] {
            assert_eq!(kind.as_str().parse::<SessionType>(), Ok(kind));
        }
        assert!("nap".parse::<SessionType>().is_err());
    }

    #[test]
    fn new_session_is_open() {
        let session = PomodoroSession::start(SessionType::Focus, 1500, 1_700_000_000, None);
        assert!(session.is_open());
        assert!(!session.was_completed);
    }
}
