//! Desktop notifications and sounds for Pomodoro lifecycle events.

use crate::libs::config::{PomodoroConfig, QuietHours};
use crate::libs::messages::Message;
use crate::libs::notifier::Notifier;
use crate::libs::pomodoro::{PomodoroEvent, PomodoroObserver};
use crate::libs::session::SessionType;
use crate::libs::sound::{SoundCue, SoundPlayer};
use anyhow::Result;
use chrono::{Local, NaiveTime};
use tracing::debug;

/// What the user should see and hear for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub body: String,
    pub cue: Option<SoundCue>,
}

/// Maps an event to its alert; `None` for events that stay silent.
pub fn alert_for(event: &PomodoroEvent) -> Option<Alert> {
    let alert = |title: Message, body: Message, cue: Option<SoundCue>| Alert {
        title: title.to_string(),
        body: body.to_string(),
        cue,
    };

    match event {
        PomodoroEvent::FocusCompleted { next_break, .. } => {
            let body = match next_break {
                SessionType::LongBreak => Message::AlertTakeLongBreak,
                _ => Message::AlertTakeShortBreak,
            };
            Some(alert(Message::AlertFocusComplete, body, Some(SoundCue::FocusComplete)))
        }
        PomodoroEvent::BreakCompleted { .. } => {
            Some(alert(Message::AlertBreakComplete, Message::AlertBackToWork, Some(SoundCue::BreakComplete)))
        }
        PomodoroEvent::DailyGoalReached { completed, .. } => Some(alert(
            Message::AlertDailyGoalReached,
            Message::AlertDailyGoalBody(*completed),
            Some(SoundCue::GoalReached),
        )),
        PomodoroEvent::Paused { automatic: true } => Some(alert(Message::AlertAutoPaused, Message::AlertAutoPausedBody, None)),
        PomodoroEvent::Reset => Some(alert(Message::AlertSessionReset, Message::AlertSessionResetBody, None)),
        _ => None,
    }
}

/// Observer that turns lifecycle events into notifications and sounds.
///
/// Honours `enable_desktop_notifications`, `enable_sound_alerts` and the
/// quiet-hours window.
pub struct AlertObserver<N: Notifier, P: SoundPlayer> {
    notifier: N,
    sound: P,
    quiet_hours: Option<QuietHours>,
    clock: fn() -> NaiveTime,
}

impl<N: Notifier, P: SoundPlayer> AlertObserver<N, P> {
    pub fn new(notifier: N, sound: P, quiet_hours: Option<QuietHours>) -> Self {
        Self {
            notifier,
            sound,
            quiet_hours,
            clock: || Local::now().time(),
        }
    }

    /// Replaces the local clock used for the quiet-hours check.
    pub fn with_clock(mut self, clock: fn() -> NaiveTime) -> Self {
        self.clock = clock;
        self
    }

    fn is_quiet(&self) -> Result<bool> {
        match &self.quiet_hours {
            Some(window) => Ok(window.contains((self.clock)())?),
            None => Ok(false),
        }
    }
}

impl<N: Notifier, P: SoundPlayer> PomodoroObserver for AlertObserver<N, P> {
    fn on_event(&mut self, event: &PomodoroEvent, config: &PomodoroConfig) -> Result<()> {
        let Some(alert) = alert_for(event) else {
            return Ok(());
        };
        if self.is_quiet()? {
            debug!(?event, "alert suppressed by quiet hours");
            return Ok(());
        }

        let mut first_error = None;
        if config.enable_desktop_notifications {
            if let Err(e) = self.notifier.notify(&alert.title, &alert.body) {
                first_error.get_or_insert(e);
            }
        }
        if config.enable_sound_alerts {
            if let Some(cue) = alert.cue {
                if let Err(e) = self.sound.play(cue) {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
