//! Domain logic for devpulse.
//!
//! - **Tracking**: `activity`, `tracker`
//! - **Pomodoro**: `session`, `pomodoro`, `alerts`, `notifier`, `sound`
//! - **Host integration**: `engine`, `host`, `status_bar`, `dashboard`
//! - **Reporting**: `stats`, `view`, `formatter`
//! - **Infrastructure**: `config`, `data_storage`, `error`, `messages`, `app_metadata`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use devpulse::db::db::Db;
//! use devpulse::libs::{config::Config, engine::Engine, host::HostEvent};
//! use chrono::Utc;
//!
//! let mut engine = Engine::new(&Db::new()?, &Config::read()?, Utc::now())?;
//! for output in engine.handle(HostEvent::TextChanged, Utc::now()) {
//!     println!("{}", output.to_line()?);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod activity;
pub mod alerts;
pub mod app_metadata;
pub mod config;
pub mod dashboard;
pub mod data_storage;
pub mod engine;
pub mod error;
pub mod formatter;
pub mod host;
pub mod messages;
pub mod notifier;
pub mod pomodoro;
pub mod session;
pub mod sound;
pub mod stats;
pub mod status_bar;
pub mod tracker;
pub mod view;
