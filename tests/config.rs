#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveTime};
    use devpulse::libs::config::{parse_time_of_day, Config, NotificationConfig, PomodoroConfig, QuietHours, TrackerConfig, MAX_IDLE_TIMEOUT_MINUTES};
    use devpulse::libs::error::ConfigError;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Points the config file at a fresh temporary directory.
    struct ConfigTestContext {
        _temp_dir: TempDir,
        path: PathBuf,
    }

    impl TestContext for ConfigTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let path = temp_dir.path().join("config.json");
            ConfigTestContext { _temp_dir: temp_dir, path }
        }
    }

    fn time(value: &str) -> NaiveTime {
        NaiveTime::parse_from_str(value, "%H:%M").unwrap()
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_missing_file_means_defaults(ctx: &mut ConfigTestContext) {
        let config = Config::read_from(&ctx.path).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.tracker.is_none());
        assert!(config.notifications.is_none());

        let tracker = config.tracker.unwrap_or_default();
        assert_eq!(tracker.idle_timeout_minutes, 5);
        assert!(tracker.auto_start_tracking);
        assert!(tracker.show_in_status_bar);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_save_and_read_back(ctx: &mut ConfigTestContext) {
        let config = Config {
            tracker: Some(TrackerConfig {
                idle_timeout_minutes: 10,
                auto_start_tracking: false,
                show_in_status_bar: true,
            }),
            notifications: Some(NotificationConfig {
                quiet_hours: Some(QuietHours::new("22:00", "07:30")),
                sound_file: Some(PathBuf::from("/tmp/ding.wav")),
            }),
        };
        config.save_to(&ctx.path).unwrap();

        assert_eq!(Config::read_from(&ctx.path).unwrap(), config);
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_partial_file_keeps_other_sections_empty(ctx: &mut ConfigTestContext) {
        std::fs::write(
            &ctx.path,
            r#"{"tracker":{"idle_timeout_minutes":3,"auto_start_tracking":true,"show_in_status_bar":false}}"#,
        )
        .unwrap();

        let config = Config::read_from(&ctx.path).unwrap();
        assert_eq!(config.tracker.map(|t| t.idle_timeout_minutes), Some(3));
        assert!(config.notifications.is_none());
    }

    #[test_context(ConfigTestContext)]
    #[test]
    fn test_invalid_values_are_rejected(ctx: &mut ConfigTestContext) {
        let zero_timeout = Config {
            tracker: Some(TrackerConfig {
                idle_timeout_minutes: 0,
                ..TrackerConfig::default()
            }),
            notifications: None,
        };
        assert!(zero_timeout.save_to(&ctx.path).is_err());
        assert!(!ctx.path.exists());

        std::fs::write(&ctx.path, r#"{"notifications":{"quiet_hours":{"start":"25:00","end":"07:00"}}}"#).unwrap();
        let err = Config::read_from(&ctx.path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::InvalidTimeOfDay("25:00".to_string()))
        );

        std::fs::write(&ctx.path, r#"{"tracker":{"idle_timeout_minutes":1000000000000000,"auto_start_tracking":true,"show_in_status_bar":true}}"#)
            .unwrap();
        let err = Config::read_from(&ctx.path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::TooLarge {
                field: "idle_timeout_minutes",
                max: MAX_IDLE_TIMEOUT_MINUTES,
                value: 1_000_000_000_000_000,
            })
        );

        std::fs::write(&ctx.path, "{ not json").unwrap();
        assert!(Config::read_from(&ctx.path).is_err());
    }

    #[test]
    fn test_idle_timeout_is_clamped() {
        let huge = TrackerConfig {
            idle_timeout_minutes: u64::MAX,
            ..TrackerConfig::default()
        };
        assert_eq!(huge.idle_timeout(), Duration::minutes(1440));
        assert_eq!(TrackerConfig::default().idle_timeout(), Duration::minutes(5));
    }

    #[test]
    fn test_quiet_hours_within_one_day() {
        let window = QuietHours::new("12:00", "13:30");
        assert!(window.contains(time("12:00")).unwrap());
        assert!(window.contains(time("13:29")).unwrap());
        assert!(!window.contains(time("13:30")).unwrap());
        assert!(!window.contains(time("11:59")).unwrap());
    }

    #[test]
    fn test_quiet_hours_wrap_past_midnight() {
        let window = QuietHours::new("22:00", "08:00");
        assert!(window.contains(time("23:15")).unwrap());
        assert!(window.contains(time("00:00")).unwrap());
        assert!(window.contains(time("07:59")).unwrap());
        assert!(!window.contains(time("08:00")).unwrap());
        assert!(!window.contains(time("21:59")).unwrap());

        assert!(!QuietHours::new("09:00", "09:00").contains(time("09:00")).unwrap());
        assert!(QuietHours::new("9pm", "08:00").contains(time("23:00")).is_err());
    }

    #[test]
    fn test_parse_time_of_day_trims_input() {
        assert_eq!(parse_time_of_day(" 06:45 ").unwrap(), time("06:45"));
        assert!(parse_time_of_day("6.45").is_err());
    }

    #[test]
    fn test_pomodoro_defaults_are_valid() {
        let config = PomodoroConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.focus_seconds(), 1500);
        assert_eq!(config.short_break_seconds(), 300);
        assert_eq!(config.long_break_seconds(), 900);
    }

    #[test]
    fn test_pomodoro_validation_rules() {
        let zero = PomodoroConfig {
            daily_goal_sessions: 0,
            ..PomodoroConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::NotPositive { field: "daily_goal_sessions" }));

        let short_too_long = PomodoroConfig {
            focus_duration_minutes: 10,
            short_break_duration_minutes: 10,
            ..PomodoroConfig::default()
        };
        assert_eq!(short_too_long.validate(), Err(ConfigError::ShortBreakTooLong { short: 10, focus: 10 }));

        let long_too_short = PomodoroConfig {
            long_break_duration_minutes: 4,
            ..PomodoroConfig::default()
        };
        assert_eq!(long_too_short.validate(), Err(ConfigError::LongBreakTooShort { long: 4, short: 5 }));
    }

    #[test]
    fn test_pomodoro_config_json_uses_field_names() {
        let json = serde_json::to_value(PomodoroConfig::default()).unwrap();
        assert_eq!(json["focus_duration_minutes"], 25);
        assert_eq!(json["enable_status_bar_timer"], true);
    }
}
