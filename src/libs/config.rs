//! Configuration management for devpulse.
//!
//! Two kinds of settings exist:
//!
//! - [`Config`] lives in `config.json` in the data directory and holds the
//!   tracker and notification sections. Every section is optional so an
//!   absent file means "all defaults".
//! - [`PomodoroConfig`] is stored as a single row in the database (see
//!   `db::pomodoro_config`) because the timer owns it and the host can
//!   replace it at runtime.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use devpulse::libs::config::Config;
//!
//! let config = Config::read()?;
//! let tracker = config.tracker.clone().unwrap_or_default();
//! println!("idle timeout: {} min", tracker.idle_timeout_minutes);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::data_storage::DataStorage;
use crate::libs::error::ConfigError;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use chrono::{Duration, NaiveTime, Timelike};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";
/// One day.
pub const MAX_IDLE_TIMEOUT_MINUTES: u64 = 1440;

/// Activity tracker settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Minutes without editor activity before the tracker stops crediting the current file.
    pub idle_timeout_minutes: u64,
    /// Start tracking as soon as `watch` starts.
    pub auto_start_tracking: bool,
    /// Publish the tracker text to the host status bar.
    pub show_in_status_bar: bool,
}

impl TrackerConfig {
    /// The idle timeout, clamped to `1..=MAX_IDLE_TIMEOUT_MINUTES`.
    pub fn idle_timeout(&self) -> Duration {
        Duration::minutes(self.idle_timeout_minutes.clamp(1, MAX_IDLE_TIMEOUT_MINUTES) as i64)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.idle_timeout_minutes {
            0 => Err(ConfigError::NotPositive { field: "idle_timeout_minutes" }),
            value if value > MAX_IDLE_TIMEOUT_MINUTES => Err(ConfigError::TooLarge {
                field: "idle_timeout_minutes",
                max: MAX_IDLE_TIMEOUT_MINUTES,
                value,
            }),
            _ => Ok(()),
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            idle_timeout_minutes: 5,
            auto_start_tracking: true,
            show_in_status_bar: true,
        }
    }
}

/// A daily window, in local time, during which alerts stay silent.
///
/// `start` may be later than `end`, in which case the window wraps past midnight.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct QuietHours {
    pub start: String,
    pub end: String,
}

impl QuietHours {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    pub fn contains(&self, time: NaiveTime) -> Result<bool, ConfigError> {
        let start = parse_time_of_day(&self.start)?;
        let end = parse_time_of_day(&self.end)?;
        let minute = time.hour() * 60 + time.minute();
        let (start, end) = (start.hour() * 60 + start.minute(), end.hour() * 60 + end.minute());

        Ok(if start == end {
            false
        } else if start < end {
            minute >= start && minute < end
        } else {
            minute >= start || minute < end
        })
    }
}

pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ConfigError::InvalidTimeOfDay(value.to_string()))
}

/// Desktop notification and sound settings.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct NotificationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours: Option<QuietHours>,
    /// Custom sound played instead of the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_file: Option<PathBuf>,
}

/// Root of `config.json`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<TrackerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<NotificationConfig>,
}

impl Config {
    /// Reads `config.json` from the data directory, defaulting when the file is absent.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(tracker) = &self.tracker {
            tracker.validate()?;
        }
        if let Some(quiet) = self.notifications.as_ref().and_then(|n| n.quiet_hours.as_ref()) {
            parse_time_of_day(&quiet.start)?;
            parse_time_of_day(&quiet.end)?;
        }
        Ok(())
    }

    /// Interactive setup for the tracker and notification sections.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();
        let theme = ColorfulTheme::default();

        let tracker = config.tracker.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleTracker);
        config.tracker = Some(TrackerConfig {
            idle_timeout_minutes: Input::with_theme(&theme)
                .with_prompt(Message::PromptIdleTimeout.to_string())
                .default(tracker.idle_timeout_minutes)
                .validate_with(|value: &u64| {
                    TrackerConfig {
                        idle_timeout_minutes: *value,
                        ..TrackerConfig::default()
                    }
                    .validate()
                    .map_err(|e| e.to_string())
                })
                .interact_text()?,
            auto_start_tracking: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptAutoStartTracking.to_string())
                .default(tracker.auto_start_tracking)
                .interact()?,
            show_in_status_bar: Confirm::with_theme(&theme)
                .with_prompt(Message::PromptShowInStatusBar.to_string())
                .default(tracker.show_in_status_bar)
                .interact()?,
        });

        let notifications = config.notifications.clone().unwrap_or_default();
        msg_print!(Message::ConfigModuleNotifications);
        let use_quiet_hours = Confirm::with_theme(&theme)
            .with_prompt(Message::PromptUseQuietHours.to_string())
            .default(notifications.quiet_hours.is_some())
            .interact()?;
        let quiet_hours = if use_quiet_hours {
            let current = notifications.quiet_hours.clone().unwrap_or_else(|| QuietHours::new("22:00", "08:00"));
            Some(QuietHours {
                start: Input::with_theme(&theme)
                    .with_prompt(Message::PromptQuietHoursStart.to_string())
                    .default(current.start)
                    .validate_with(|value: &String| parse_time_of_day(value).map(|_| ()).map_err(|e| e.to_string()))
                    .interact_text()?,
                end: Input::with_theme(&theme)
                    .with_prompt(Message::PromptQuietHoursEnd.to_string())
                    .default(current.end)
                    .validate_with(|value: &String| parse_time_of_day(value).map(|_| ()).map_err(|e| e.to_string()))
                    .interact_text()?,
            })
        } else {
            None
        };
        config.notifications = Some(NotificationConfig {
            quiet_hours,
            sound_file: notifications.sound_file,
        });

        Ok(config)
    }
}

/// Pomodoro timer settings, persisted as the single `pomodoro_config` row.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PomodoroConfig {
    pub focus_duration_minutes: u32,
    pub short_break_duration_minutes: u32,
    pub long_break_duration_minutes: u32,
    pub sessions_until_long_break: u32,
    pub daily_goal_sessions: u32,
    pub auto_start_breaks: bool,
    pub auto_start_focus: bool,
    pub enable_sound_alerts: bool,
    pub enable_desktop_notifications: bool,
    pub enable_status_bar_timer: bool,
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        PomodoroConfig {
            focus_duration_minutes: 25,
            short_break_duration_minutes: 5,
            long_break_duration_minutes: 15,
            sessions_until_long_break: 4,
            daily_goal_sessions: 8,
            auto_start_breaks: false,
            auto_start_focus: false,
            enable_sound_alerts: true,
            enable_desktop_notifications: true,
            enable_status_bar_timer: true,
        }
    }
}

impl PomodoroConfig {
    /// Checks positivity and the `short < focus`, `long > short` ordering.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("focus_duration_minutes", self.focus_duration_minutes),
            ("short_break_duration_minutes", self.short_break_duration_minutes),
            ("long_break_duration_minutes", self.long_break_duration_minutes),
            ("sessions_until_long_break", self.sessions_until_long_break),
            ("daily_goal_sessions", self.daily_goal_sessions),
        ];
        if let Some((field, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::NotPositive { field });
        }
        if self.short_break_duration_minutes >= self.focus_duration_minutes {
            return Err(ConfigError::ShortBreakTooLong {
                short: self.short_break_duration_minutes,
                focus: self.focus_duration_minutes,
            });
        }
        if self.long_break_duration_minutes <= self.short_break_duration_minutes {
            return Err(ConfigError::LongBreakTooShort {
                long: self.long_break_duration_minutes,
                short: self.short_break_duration_minutes,
            });
        }
        Ok(())
    }

    pub fn focus_seconds(&self) -> i64 {
        i64::from(self.focus_duration_minutes) * 60
    }

    pub fn short_break_seconds(&self) -> i64 {
        i64::from(self.short_break_duration_minutes) * 60
    }

    pub fn long_break_seconds(&self) -> i64 {
        i64::from(self.long_break_duration_minutes) * 60
    }

    /// Interactive editor seeded with the current values.
    pub fn init(current: &PomodoroConfig) -> Result<Self> {
        let theme = ColorfulTheme::default();
        msg_print!(Message::ConfigModulePomodoro);

        let minutes = |prompt: Message, default: u32| -> Result<u32> {
            Ok(Input::with_theme(&theme)
                .with_prompt(prompt.to_string())
                .default(default)
                .validate_with(|value: &u32| if *value > 0 { Ok(()) } else { Err("must be positive") })
                .interact_text()?)
        };
        let toggle = |prompt: Message, default: bool| -> Result<bool> {
            Ok(Confirm::with_theme(&theme).with_prompt(prompt.to_string()).default(default).interact()?)
        };

        let config = PomodoroConfig {
            focus_duration_minutes: minutes(Message::PromptFocusDuration, current.focus_duration_minutes)?,
            short_break_duration_minutes: minutes(Message::PromptShortBreakDuration, current.short_break_duration_minutes)?,
            long_break_duration_minutes: minutes(Message::PromptLongBreakDuration, current.long_break_duration_minutes)?,
            sessions_until_long_break: minutes(Message::PromptSessionsUntilLongBreak, current.sessions_until_long_break)?,
            daily_goal_sessions: minutes(Message::PromptDailyGoal, current.daily_goal_sessions)?,
            auto_start_breaks: toggle(Message::PromptAutoStartBreaks, current.auto_start_breaks)?,
            auto_start_focus: toggle(Message::PromptAutoStartFocus, current.auto_start_focus)?,
            enable_sound_alerts: toggle(Message::PromptSoundAlerts, current.enable_sound_alerts)?,
            enable_desktop_notifications: toggle(Message::PromptDesktopNotifications, current.enable_desktop_notifications)?,
            enable_status_bar_timer: toggle(Message::PromptStatusBarTimer, current.enable_status_bar_timer)?,
        };
        config.validate()?;
        Ok(config)
    }
}
