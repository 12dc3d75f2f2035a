//! Database layer for devpulse.
//!
//! A single SQLite file holds both tracks of data: the activity entries the
//! tracker flushes and the Pomodoro settings and sessions. Every repository
//! wraps a clone of the same [`db::Db`] handle.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use devpulse::db::{db::Db, pomodoro_config::PomodoroConfigs, time_entries::TimeEntries};
//!
//! let db = Db::new()?;
//! let config = PomodoroConfigs::new(&db).load()?;
//! let entries = TimeEntries::new(&db).fetch_all()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection handle shared by all repositories.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Singleton Pomodoro settings row.
pub mod pomodoro_config;

/// Pomodoro focus and break session history.
pub mod pomodoro_sessions;

/// Per-file activity entries.
pub mod time_entries;
