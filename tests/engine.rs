#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use devpulse::commands::watch;
    use devpulse::db::db::Db;
    use devpulse::db::pomodoro_config::PomodoroConfigs;
    use devpulse::db::pomodoro_sessions::PomodoroSessions;
    use devpulse::db::time_entries::TimeEntries;
    use devpulse::libs::config::{Config, PomodoroConfig};
    use devpulse::libs::engine::Engine;
    use devpulse::libs::host::{HostCommand, HostEvent, HostOutput, NoticeLevel};
    use devpulse::libs::pomodoro::PomodoroState;
    use devpulse::libs::session::SessionType;
    use devpulse::libs::status_bar::StatusText;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext, TestContext};

    struct EngineTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for EngineTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("devpulse.db")).unwrap();
            EngineTestContext { _temp_dir: temp_dir, db }
        }
    }

    struct WatchTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl AsyncTestContext for WatchTestContext {
        async fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("devpulse.db")).unwrap();
            WatchTestContext { _temp_dir: temp_dir, db }
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    fn at(seconds: i64) -> DateTime<Utc> {
        t0() + Duration::seconds(seconds)
    }

    fn engine(ctx: &EngineTestContext) -> Engine {
        Engine::new(&ctx.db, &Config::default(), t0()).unwrap()
    }

    fn open(path: &str, project: &str) -> HostEvent {
        HostEvent::ActiveFile {
            path: Some(path.to_string()),
            project: Some(project.to_string()),
        }
    }

    fn command(command: HostCommand) -> HostEvent {
        HostEvent::Command { command }
    }

    fn notices(outputs: &[HostOutput], wanted: NoticeLevel) -> Vec<String> {
        outputs
            .iter()
            .filter_map(|output| match output {
                HostOutput::Notice { level, message } if *level == wanted => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn last_status(outputs: &[HostOutput]) -> Option<StatusText> {
        outputs.iter().rev().find_map(|output| match output {
            HostOutput::Status(status) => Some(status.clone()),
            _ => None,
        })
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_file_switch_flushes_and_refreshes_status(ctx: &mut EngineTestContext) {
        let mut engine = engine(ctx);
        assert!(engine.tracker().is_tracking());

        let outputs = engine.handle(open("src/lib.rs", "api"), t0());
        assert_eq!(last_status(&outputs).and_then(|s| s.tracker).as_deref(), Some("⏱ api · 00:00"));

        // Unchanged status is not re-sent.
        assert!(engine.tick(at(1)).is_empty());
        for i in 2..=120 {
            engine.tick(at(i));
        }

        let outputs = engine.handle(open("src/main.rs", "api"), at(120));
        assert!(last_status(&outputs).is_none());
        assert_eq!(engine.status().tracker.as_deref(), Some("⏱ api · 00:02"));

        let stored = TimeEntries::new(&ctx.db).fetch_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].file, "src/lib.rs");
        assert_eq!(stored[0].duration_seconds, 120);
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_today_totals_survive_restart(ctx: &mut EngineTestContext) {
        let mut first = engine(ctx);
        first.handle(open("a.rs", "api"), t0());
        for i in 1..=180 {
            first.tick(at(i));
        }
        first.shutdown(at(180));

        let mut second = Engine::new(&ctx.db, &Config::default(), at(200)).unwrap();
        second.handle(open("b.rs", "api"), at(200));
        assert_eq!(second.status().tracker.as_deref(), Some("⏱ api · 00:03"));
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_pomodoro_commands_report_notices_and_status(ctx: &mut EngineTestContext) {
        let mut engine = engine(ctx);

        let outputs = engine.handle(command(HostCommand::StartFocus { activity: None }), t0());
        assert_eq!(notices(&outputs, NoticeLevel::Info), vec!["Focus session started (25 min)".to_string()]);
        assert_eq!(last_status(&outputs).and_then(|s| s.pomodoro).as_deref(), Some("🍅 25:00"));

        engine.tick(at(1));
        let outputs = engine.handle(command(HostCommand::PauseSession), at(2));
        assert_eq!(notices(&outputs, NoticeLevel::Info), vec!["Session paused".to_string()]);
        assert_eq!(last_status(&outputs).and_then(|s| s.pomodoro).as_deref(), Some("⏸ 24:59"));

        let outputs = engine.handle(command(HostCommand::ExtendFocus { minutes: 5 }), at(3));
        assert_eq!(notices(&outputs, NoticeLevel::Info), vec!["Session extended by 5 min".to_string()]);
        assert_eq!(engine.pomodoro().remaining_seconds(), 25 * 60 - 1 + 300);

        let outputs = engine.handle(command(HostCommand::StopSession), at(4));
        assert_eq!(notices(&outputs, NoticeLevel::Info), vec!["Session stopped".to_string()]);
        assert_eq!(last_status(&outputs).map(|s| s.pomodoro), Some(None));

        let outputs = engine.handle(command(HostCommand::StopSession), at(5));
        assert_eq!(notices(&outputs, NoticeLevel::Info), vec!["No active Pomodoro session".to_string()]);
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_invalid_commands_become_error_notices(ctx: &mut EngineTestContext) {
        let mut engine = engine(ctx);

        let outputs = engine.handle(command(HostCommand::ResumeSession), t0());
        let errors = notices(&outputs, NoticeLevel::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("inactive"));

        let outputs = engine.handle(command(HostCommand::StartBreak { kind: SessionType::Focus }), t0());
        assert_eq!(notices(&outputs, NoticeLevel::Error).len(), 1);
        assert_eq!(engine.pomodoro().state(), PomodoroState::Inactive);

        let outputs = engine.handle(
            command(HostCommand::AnnotateSession {
                id: 42,
                rating: Some(7),
                notes: None,
            }),
            t0(),
        );
        assert_eq!(notices(&outputs, NoticeLevel::Error).len(), 1);
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_update_pomodoro_config_validates_and_applies(ctx: &mut EngineTestContext) {
        let mut engine = engine(ctx);

        let invalid = PomodoroConfig {
            long_break_duration_minutes: 5,
            ..PomodoroConfig::default()
        };
        let outputs = engine.handle(command(HostCommand::UpdatePomodoroConfig { config: invalid }), t0());
        assert_eq!(notices(&outputs, NoticeLevel::Error).len(), 1);
        assert_eq!(PomodoroConfigs::new(&ctx.db).load().unwrap(), PomodoroConfig::default());

        let valid = PomodoroConfig {
            focus_duration_minutes: 45,
            ..PomodoroConfig::default()
        };
        let outputs = engine.handle(command(HostCommand::UpdatePomodoroConfig { config: valid.clone() }), t0());
        assert_eq!(notices(&outputs, NoticeLevel::Info), vec!["Pomodoro settings saved".to_string()]);
        assert_eq!(PomodoroConfigs::new(&ctx.db).load().unwrap(), valid);

        engine.handle(command(HostCommand::StartFocus { activity: None }), at(1));
        assert_eq!(engine.pomodoro().remaining_seconds(), 45 * 60);
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_panels_escape_user_text(ctx: &mut EngineTestContext) {
        let mut engine = engine(ctx);
        engine.handle(open("a&b.rs", "<b>P</b>"), t0());
        for i in 1..=90 {
            engine.tick(at(i));
        }
        engine.handle(HostEvent::ActiveFile { path: None, project: None }, at(90));

        let outputs = engine.handle(command(HostCommand::ShowStats), at(91));
        let Some(HostOutput::Panel { title, html }) = outputs.first() else {
            panic!("expected a panel, got {:?}", outputs);
        };
        let day = at(91).with_timezone(&Local).date_naive();
        assert_eq!(title, &format!("Coding activity for {}", day.format("%Y-%m-%d")));
        assert!(html.contains("&lt;b&gt;P&lt;/b&gt;"));
        assert!(html.contains("a&amp;b.rs"));
        assert!(!html.contains("<b>P"));

        let outputs = engine.handle(command(HostCommand::ShowPomodoroConfig), at(92));
        assert!(matches!(&outputs[0], HostOutput::Panel { html, .. } if html.contains("25 min")));
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_auto_start_focus_only_on_coding_files(ctx: &mut EngineTestContext) {
        let config = PomodoroConfig {
            auto_start_focus: true,
            ..PomodoroConfig::default()
        };
        PomodoroConfigs::new(&ctx.db).save(&config).unwrap();
        let mut engine = engine(ctx);

        engine.handle(open("notes.txt", "docs"), t0());
        assert_eq!(engine.pomodoro().state(), PomodoroState::Inactive);

        engine.handle(open("src/main.rs", "api"), at(1));
        assert_eq!(engine.pomodoro().state(), PomodoroState::Focus);
        assert_eq!(
            engine.pomodoro().current_session().and_then(|s| s.associated_activity.clone()).as_deref(),
            Some("api")
        );
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_auto_start_focus_requires_tracking(ctx: &mut EngineTestContext) {
        let config = PomodoroConfig {
            auto_start_focus: true,
            ..PomodoroConfig::default()
        };
        PomodoroConfigs::new(&ctx.db).save(&config).unwrap();
        let mut engine = engine(ctx);

        engine.handle(command(HostCommand::PauseTracking), t0());
        engine.handle(open("src/main.rs", "api"), at(1));
        assert_eq!(engine.pomodoro().state(), PomodoroState::Inactive);
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_auto_start_focus_after_break(ctx: &mut EngineTestContext) {
        let config = PomodoroConfig {
            auto_start_focus: true,
            ..PomodoroConfig::default()
        };
        PomodoroConfigs::new(&ctx.db).save(&config).unwrap();
        let mut engine = engine(ctx);

        engine.handle(command(HostCommand::StartBreak { kind: SessionType::ShortBreak }), t0());
        engine.handle(open("src/main.rs", "api"), t0());
        assert_eq!(engine.pomodoro().state(), PomodoroState::ShortBreak);

        for i in 1..=300 {
            engine.tick(at(i));
        }
        assert_eq!(engine.pomodoro().state(), PomodoroState::Focus);
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_idle_check_and_return_share_one_clock(ctx: &mut EngineTestContext) {
        let mut engine = engine(ctx);
        engine.handle(open("src/main.rs", "api"), t0());
        engine.handle(command(HostCommand::StartFocus { activity: None }), t0());

        assert!(notices(&engine.idle_check(at(240)), NoticeLevel::Info).is_empty());
        let outputs = engine.idle_check(at(301));
        assert_eq!(notices(&outputs, NoticeLevel::Info), vec!["Focus paused".to_string()]);
        assert_eq!(engine.pomodoro().state(), PomodoroState::FocusPaused);

        let outputs = engine.handle(HostEvent::TextChanged, at(320));
        assert_eq!(notices(&outputs, NoticeLevel::Warning), vec!["Focus session reset".to_string()]);
        assert_eq!(engine.pomodoro().state(), PomodoroState::Inactive);
    }

    #[test_context(EngineTestContext)]
    #[test]
    fn test_shutdown_flushes_and_interrupts(ctx: &mut EngineTestContext) {
        let mut engine = engine(ctx);
        engine.handle(open("src/main.rs", "api"), t0());
        for i in 1..=30 {
            engine.tick(at(i));
        }
        engine.handle(command(HostCommand::StartFocus { activity: Some("spike".into()) }), at(30));

        let outputs = engine.handle(HostEvent::Shutdown, at(31));
        assert_eq!(notices(&outputs, NoticeLevel::Info), vec!["Session stopped".to_string()]);

        let entries = TimeEntries::new(&ctx.db).fetch_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].duration_seconds, 30);

        let sessions = PomodoroSessions::new(&ctx.db).fetch_all().unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].was_interrupted);
        assert_eq!(sessions[0].associated_activity.as_deref(), Some("spike"));
    }

    #[test_context(WatchTestContext)]
    #[tokio::test]
    async fn test_watch_loop_speaks_line_protocol(ctx: &mut WatchTestContext) {
        let mut engine = Engine::new(&ctx.db, &Config::default(), Utc::now()).unwrap();
        let input = concat!(
            r#"{"type":"active_file","path":"src/main.rs","project":"demo"}"#,
            "\n",
            "not json\n",
            "\n",
            r#"{"type":"command","command":{"name":"start_focus"}}"#,
            "\n",
        );
        let mut output = Vec::new();

        watch::run(&mut engine, input.as_bytes(), &mut output, std::future::pending())
            .await
            .unwrap();

        let lines: Vec<HostOutput> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert!(matches!(lines[0], HostOutput::Status(_)));
        assert_eq!(notices(&lines, NoticeLevel::Error).len(), 1);
        let info = notices(&lines, NoticeLevel::Info);
        assert!(info.contains(&"Focus session started (25 min)".to_string()));
        assert_eq!(info.last().map(String::as_str), Some("Session stopped"));

        let sessions = PomodoroSessions::new(&ctx.db).fetch_all().unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].was_interrupted);
    }

    #[test_context(WatchTestContext)]
    #[tokio::test]
    async fn test_watch_loop_survives_invalid_utf8(ctx: &mut WatchTestContext) {
        let mut engine = Engine::new(&ctx.db, &Config::default(), Utc::now()).unwrap();
        let mut input = Vec::new();
        input.extend_from_slice(br#"{"type":"active_file","path":"src/main.rs","project":"demo"}"#);
        input.extend_from_slice(b"\n\xff\xfe garbage\n");
        input.extend_from_slice(br#"{"type":"command","command":{"name":"start_focus"}}"#);
        let mut output = Vec::new();

        watch::run(&mut engine, input.as_slice(), &mut output, std::future::pending())
            .await
            .unwrap();

        let lines: Vec<HostOutput> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(notices(&lines, NoticeLevel::Error).len(), 1);
        let info = notices(&lines, NoticeLevel::Info);
        assert!(info.contains(&"Focus session started (25 min)".to_string()));
        assert_eq!(info.last().map(String::as_str), Some("Session stopped"));
        assert_eq!(engine.pomodoro().state(), PomodoroState::Inactive);

        let sessions = PomodoroSessions::new(&ctx.db).fetch_all().unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].was_interrupted);
    }

    struct BrokenPipe;

    impl tokio::io::AsyncWrite for BrokenPipe {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_flush(self: std::pin::Pin<&mut Self>, _cx: &mut std::task::Context<'_>) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: std::pin::Pin<&mut Self>, _cx: &mut std::task::Context<'_>) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[test_context(WatchTestContext)]
    #[tokio::test]
    async fn test_watch_loop_shuts_down_when_output_breaks(ctx: &mut WatchTestContext) {
        let mut engine = Engine::new(&ctx.db, &Config::default(), Utc::now()).unwrap();
        engine.handle(command(HostCommand::StartFocus { activity: None }), Utc::now());

        let result = watch::run(&mut engine, &b""[..], BrokenPipe, std::future::pending()).await;

        assert!(result.is_err());
        assert_eq!(engine.pomodoro().state(), PomodoroState::Inactive);
        let sessions = PomodoroSessions::new(&ctx.db).fetch_all().unwrap();
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].was_interrupted);
    }

    #[tokio::test]
    async fn test_startup_failure_is_reported_to_host() {
        let mut output = Vec::new();
        let error = anyhow::anyhow!("database is locked");

        watch::report_startup_failure(&mut output, &error).await;

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<HostOutput> = text.lines().map(|line| serde_json::from_str(line).unwrap()).collect();
        assert_eq!(lines.len(), 1);
        let errors = notices(&lines, NoticeLevel::Error);
        assert_eq!(errors, vec!["devpulse failed to start: database is locked".to_string()]);
    }
}
