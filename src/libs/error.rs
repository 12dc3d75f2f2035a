//! Domain error types.
//!
//! Repositories and commands propagate `anyhow::Error`; the variants here
//! describe failures that callers match on, such as an illegal Pomodoro
//! transition or a configuration that breaks the duration ordering rules.

use crate::libs::pomodoro::PomodoroState;
use thiserror::Error;

/// Errors raised by the Pomodoro state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PomodoroError {
    /// The requested trigger is not valid in the current state.
    #[error("cannot {action} while the timer is {state}")]
    InvalidTransition { state: PomodoroState, action: &'static str },

    /// Extensions must add at least one minute.
    #[error("extension must be at least one minute")]
    InvalidExtension,
}

/// Validation failures for persisted or user-supplied settings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },

    #[error("{field} must be at most {max}, got {value}")]
    TooLarge { field: &'static str, max: u64, value: u64 },

    #[error("short break ({short} min) must be shorter than focus ({focus} min)")]
    ShortBreakTooLong { short: u32, focus: u32 },

    #[error("long break ({long} min) must be longer than short break ({short} min)")]
    LongBreakTooShort { long: u32, short: u32 },

    #[error("productivity rating must be between 1 and 10, got {0}")]
    RatingOutOfRange(u8),

    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidTimeOfDay(String),
}
