//! Singleton storage for the Pomodoro settings.

use crate::db::db::Db;
use crate::libs::config::PomodoroConfig;
use anyhow::Result;
use rusqlite::{params, OptionalExtension};

const SELECT_CONFIG: &str = "SELECT focus_duration, short_break_duration, long_break_duration, sessions_until_long_break, daily_goal_sessions,
    auto_start_breaks, auto_start_focus, enable_sound_alerts, enable_desktop_notifications, enable_status_bar_timer
    FROM pomodoro_config WHERE id = 1";
const REPLACE_CONFIG: &str = "INSERT OR REPLACE INTO pomodoro_config (id, focus_duration, short_break_duration, long_break_duration,
    sessions_until_long_break, daily_goal_sessions, auto_start_breaks, auto_start_focus, enable_sound_alerts,
    enable_desktop_notifications, enable_status_bar_timer) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

#[derive(Clone)]
pub struct PomodoroConfigs {
    db: Db,
}

impl PomodoroConfigs {
    pub fn new(db: &Db) -> Self {
        Self { db: db.clone() }
    }

    /// Returns the stored settings, writing the defaults on first access.
    pub fn load(&self) -> Result<PomodoroConfig> {
        let stored = self
            .db
            .conn()
            .query_row(SELECT_CONFIG, [], |row| {
                Ok(PomodoroConfig {
                    focus_duration_minutes: row.get(0)?,
                    short_break_duration_minutes: row.get(1)?,
                    long_break_duration_minutes: row.get(2)?,
                    sessions_until_long_break: row.get(3)?,
                    daily_goal_sessions: row.get(4)?,
                    auto_start_breaks: row.get(5)?,
                    auto_start_focus: row.get(6)?,
                    enable_sound_alerts: row.get(7)?,
                    enable_desktop_notifications: row.get(8)?,
                    enable_status_bar_timer: row.get(9)?,
                })
            })
            .optional()?;

        match stored {
            Some(config) => Ok(config),
            None => {
                let config = PomodoroConfig::default();
                self.save(&config)?;
                Ok(config)
            }
        }
    }

    /// Replaces the stored settings wholesale.
    pub fn save(&self, config: &PomodoroConfig) -> Result<()> {
        config.validate()?;
        self.db.conn().execute(
            REPLACE_CONFIG,
            params![
                config.focus_duration_minutes,
                config.short_break_duration_minutes,
                config.long_break_duration_minutes,
                config.sessions_until_long_break,
                config.daily_goal_sessions,
                config.auto_start_breaks,
                config.auto_start_focus,
                config.enable_sound_alerts,
                config.enable_desktop_notifications,
                config.enable_status_bar_timer,
            ],
        )?;
        Ok(())
    }

    /// Restores the default settings.
    pub fn reset(&self) -> Result<PomodoroConfig> {
        let config = PomodoroConfig::default();
        self.save(&config)?;
        Ok(config)
    }
}
