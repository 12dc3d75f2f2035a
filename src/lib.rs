//! # devpulse
//!
//! Passive per-file coding time tracking with a Pomodoro timer, driven by an
//! editor extension over a line-delimited JSON protocol.
//!
//! ## Features
//!
//! - **Activity Tracking**: time per file and project, idle detection, flush on switch or blur
//! - **Pomodoro Timer**: focus and break sessions, auto-pause, daily goal
//! - **Local Storage**: a single SQLite file with versioned migrations
//! - **Presentation**: status bar texts, HTML dashboards, desktop notifications and sounds
//!
//! ## Usage
//!
//! ```rust,no_run
//! use devpulse::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
