//! Outbound notification collaborator
//!
//! The core hands (email, name, kind) to this boundary and logs the
//! outcome; delivery transport lives outside this service. With email
//! disabled (the default) the notifier records the would-be delivery in the
//! service log and reports success.

use anyhow::Result;
use tracing::info;

use crate::settings::ReminderSettings;

#[derive(Debug, Clone)]
pub struct EmailNotifier {
    enabled: bool,
    from_email: String,
    from_name: String,
}

impl EmailNotifier {
    pub fn new(settings: &ReminderSettings) -> Self {
        Self {
            enabled: settings.email_enabled,
            from_email: settings.from_email.clone(),
            from_name: settings.from_name.clone(),
        }
    }

    /// Fire-and-forget notification. Returns whether the hand-off was
    /// accepted; the caller logs failures and never retries.
    pub fn notify(&self, user_email: &str, user_name: &str, kind: &str) -> Result<bool> {
        if !self.enabled {
            info!(
                "email disabled; would send {} to {} <{}>",
                kind, user_name, user_email
            );
            return Ok(true);
        }

        info!(
            "handing {} for {} <{}> to delivery as {} <{}>",
            kind, user_name, user_email, self.from_name, self.from_email
        );
        Ok(true)
    }
}
