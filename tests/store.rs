#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use devpulse::db::db::Db;
    use devpulse::db::pomodoro_config::PomodoroConfigs;
    use devpulse::db::pomodoro_sessions::{PomodoroSessions, SessionStore};
    use devpulse::db::time_entries::{TimeEntries, TimeEntryStore};
    use devpulse::libs::activity::ActivityEntry;
    use devpulse::libs::config::PomodoroConfig;
    use devpulse::libs::error::ConfigError;
    use devpulse::libs::session::{PomodoroSession, SessionType};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct StoreTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for StoreTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("devpulse.db")).unwrap();
            StoreTestContext { _temp_dir: temp_dir, db }
        }
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_time_entry_timestamp_is_stored_as_rfc3339_millis(ctx: &mut StoreTestContext) {
        let ts = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let entries = TimeEntries::new(&ctx.db);
        let id = entries.insert(&ActivityEntry::new(ts, Some("api"), Some("src/main.rs"), 42)).unwrap();

        let raw: String = ctx
            .db
            .conn()
            .query_row("SELECT timestamp FROM time_entries WHERE id = ?1", [id], |row| row.get(0))
            .unwrap();
        assert_eq!(raw, "2025-03-01T08:30:00.000Z");

        let synced: bool = ctx
            .db
            .conn()
            .query_row("SELECT synced FROM time_entries WHERE id = ?1", [id], |row| row.get(0))
            .unwrap();
        assert!(!synced);

        let stored = entries.fetch_all().unwrap();
        assert_eq!(stored[0].id, Some(id));
        assert_eq!(stored[0].timestamp, ts);
        assert_eq!(stored[0].project, "api");
        assert_eq!(stored[0].duration_seconds, 42);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_fetch_range_is_half_open(ctx: &mut StoreTestContext) {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let entries = TimeEntries::new(&ctx.db);
        for offset in [-1, 0, 3600, 86_400] {
            entries
                .insert(&ActivityEntry::new(start + Duration::seconds(offset), None, None, 1))
                .unwrap();
        }

        let day = entries.fetch_range(start, start + Duration::days(1)).unwrap();
        assert_eq!(day.len(), 2);
        assert_eq!(day[0].timestamp, start);
        assert_eq!(day[1].timestamp, start + Duration::hours(1));
        assert_eq!(entries.count().unwrap(), 4);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_pomodoro_config_defaults_on_first_load(ctx: &mut StoreTestContext) {
        let configs = PomodoroConfigs::new(&ctx.db);
        assert_eq!(configs.load().unwrap(), PomodoroConfig::default());

        let rows: i64 = ctx
            .db
            .conn()
            .query_row("SELECT COUNT(*) FROM pomodoro_config", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_pomodoro_config_save_and_reset(ctx: &mut StoreTestContext) {
        let configs = PomodoroConfigs::new(&ctx.db);
        let custom = PomodoroConfig {
            focus_duration_minutes: 50,
            short_break_duration_minutes: 10,
            long_break_duration_minutes: 30,
            auto_start_focus: true,
            enable_sound_alerts: false,
            ..PomodoroConfig::default()
        };
        configs.save(&custom).unwrap();
        assert_eq!(configs.load().unwrap(), custom);

        assert_eq!(configs.reset().unwrap(), PomodoroConfig::default());
        assert_eq!(configs.load().unwrap(), PomodoroConfig::default());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_pomodoro_config_rejects_invalid_ordering(ctx: &mut StoreTestContext) {
        let configs = PomodoroConfigs::new(&ctx.db);
        let bad = PomodoroConfig {
            short_break_duration_minutes: 25,
            ..PomodoroConfig::default()
        };
        let err = configs.save(&bad).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::ShortBreakTooLong { short: 25, focus: 25 })
        );
        assert_eq!(configs.load().unwrap(), PomodoroConfig::default());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_session_insert_update_and_get(ctx: &mut StoreTestContext) {
        let sessions = PomodoroSessions::new(&ctx.db);
        let mut session = PomodoroSession::start(SessionType::Focus, 1500, 1_736_935_200, Some("refactor".into()));
        let id = sessions.insert(&session).unwrap();
        session.id = Some(id);

        let open = sessions.get(id).unwrap().unwrap();
        assert!(open.is_open());
        assert_eq!(open.associated_activity.as_deref(), Some("refactor"));

        session.was_completed = true;
        session.end_time = Some(1_736_936_700);
        session.actual_duration_seconds = Some(1500);
        sessions.update(&session).unwrap();

        let stored = sessions.get(id).unwrap().unwrap();
        assert_eq!(stored, session);
        assert!(!stored.is_open());
        assert!(sessions.get(id + 1).unwrap().is_none());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_update_unknown_session_fails(ctx: &mut StoreTestContext) {
        let sessions = PomodoroSessions::new(&ctx.db);
        let mut ghost = PomodoroSession::start(SessionType::ShortBreak, 300, 0, None);
        assert!(sessions.update(&ghost).is_err());

        ghost.id = Some(99);
        assert!(sessions.update(&ghost).is_err());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_annotate_keeps_unset_fields(ctx: &mut StoreTestContext) {
        let sessions = PomodoroSessions::new(&ctx.db);
        let id = sessions
            .insert(&PomodoroSession::start(SessionType::Focus, 1500, 0, Some("docs".into())))
            .unwrap();

        sessions.annotate(id, Some(8), Some("deep work".into()), None).unwrap();
        let annotated = sessions.annotate(id, None, None, None).unwrap();
        assert_eq!(annotated.productivity_rating, Some(8));
        assert_eq!(annotated.notes.as_deref(), Some("deep work"));
        assert_eq!(annotated.associated_activity.as_deref(), Some("docs"));
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_annotate_validates_rating(ctx: &mut StoreTestContext) {
        let sessions = PomodoroSessions::new(&ctx.db);
        let id = sessions.insert(&PomodoroSession::start(SessionType::Focus, 1500, 0, None)).unwrap();

        for rating in [0, 11] {
            let err = sessions.annotate(id, Some(rating), None, None).unwrap_err();
            assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::RatingOutOfRange(rating)));
        }
        assert!(sessions.annotate(id + 1, Some(5), None, None).is_err());
    }

    #[test_context(StoreTestContext)]
    #[test]
    fn test_count_completed_focus_since(ctx: &mut StoreTestContext) {
        let sessions = PomodoroSessions::new(&ctx.db);
        let insert = |kind: SessionType, start: i64, completed: bool| {
            let mut session = PomodoroSession::start(kind, 60, start, None);
            session.was_completed = completed;
            session.was_interrupted = !completed;
            sessions.insert(&session).unwrap();
        };
        insert(SessionType::Focus, 100, true);
        insert(SessionType::Focus, 200, true);
        insert(SessionType::Focus, 300, false);
        insert(SessionType::ShortBreak, 400, true);
        insert(SessionType::Focus, 50, true);

        assert_eq!(sessions.count_completed_focus_since(100).unwrap(), 2);
        assert_eq!(sessions.count_completed_focus_since(0).unwrap(), 3);
        assert_eq!(sessions.fetch_range(100, 301).unwrap().len(), 3);
    }
}
