//! Desktop notifications.

use crate::libs::app_metadata;
use anyhow::Result;
use notify_rust::{Notification, Timeout};

/// Delivers a short title/body pair to the user.
pub trait Notifier {
    fn notify(&mut self, title: &str, body: &str) -> Result<()>;
}

/// Native notifications through the platform notification service.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&mut self, title: &str, body: &str) -> Result<()> {
        Notification::new()
            .summary(title)
            .body(body)
            .appname(app_metadata::name())
            .icon("alarm-clock")
            .timeout(Timeout::Milliseconds(8000))
            .show()?;
        Ok(())
    }
}
