#[derive(Debug, Clone)]
pub enum Message {
    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigModuleTracker,
    ConfigModuleNotifications,
    ConfigModulePomodoro,
    PomodoroConfigHeader,
    PomodoroConfigSaved,
    PomodoroConfigReset,

    // === PROMPTS ===
    PromptIdleTimeout,
    PromptAutoStartTracking,
    PromptShowInStatusBar,
    PromptUseQuietHours,
    PromptQuietHoursStart,
    PromptQuietHoursEnd,
    PromptFocusDuration,
    PromptShortBreakDuration,
    PromptLongBreakDuration,
    PromptSessionsUntilLongBreak,
    PromptDailyGoal,
    PromptAutoStartBreaks,
    PromptAutoStartFocus,
    PromptSoundAlerts,
    PromptDesktopNotifications,
    PromptStatusBarTimer,

    // === TRACKER MESSAGES ===
    TrackingStarted,
    TrackingPaused,
    TrackerIdle,
    StatusTrackingPaused,
    StatusWaitingForActivity,
    FlushFailed(String), // error

    // === POMODORO MESSAGES ===
    FocusStarted(i64),      // minutes
    ShortBreakStarted(i64), // minutes
    LongBreakStarted(i64),  // minutes
    SessionPaused,
    SessionResumed,
    SessionExtended(i64), // minutes
    SessionStopped,
    NoActiveSession,
    SessionSaveFailed(String), // error
    SessionAnnotated(i64),     // id
    SessionNotFound(i64),      // id
    SessionsHeader(String),    // date
    NoSessionsForDate(String), // date

    // === ALERTS ===
    AlertFocusComplete,
    AlertTakeShortBreak,
    AlertTakeLongBreak,
    AlertBreakComplete,
    AlertBackToWork,
    AlertDailyGoalReached,
    AlertDailyGoalBody(u32), // completed sessions
    AlertAutoPaused,
    AlertAutoPausedBody,
    AlertSessionReset,
    AlertSessionResetBody,

    // === STATS MESSAGES ===
    StatsHeader(String), // date
    StatsEmpty,
    HtmlWritten(String), // path
    InvalidDate(String),

    // === PANEL LABELS ===
    LabelActive,
    LabelIdle,
    LabelFile,
    LabelTime,
    LabelPomodoro,
    LabelCompletedFocus,
    LabelFocusTime,
    LabelBreakTime,
    LabelInterrupted,
    LabelAverageRating,
    SettingFocus,
    SettingShortBreak,
    SettingLongBreak,
    SettingSessionsUntilLongBreak,
    SettingDailyGoal,
    SettingAutoStartBreaks,
    SettingAutoStartFocus,
    SettingSoundAlerts,
    SettingDesktopNotifications,
    SettingStatusBarTimer,
    ValueMinutes(u32),  // minutes
    ValueSessions(u32), // count
    ValueOn,
    ValueOff,

    // === WATCH MESSAGES ===
    WatchStarted,
    WatchStopped,
    MalformedHostLine(String), // parse error
    WatchStartFailed(String),  // error

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),        // count
    RunningMigration(u32, String), // version, name
    MigrationFailed(u32, String),  // version, error
    AllMigrationsCompleted,
    DatabaseVersion(u32, u32), // current, latest
    DatabaseUpToDate,
    PendingMigration(u32, String), // version, name
    MigrationHistory,
}
