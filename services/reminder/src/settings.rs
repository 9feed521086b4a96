//! Scheduler settings
//!
//! Loaded once at process start from an optional `reminder.toml` plus
//! `REMINDER_*` environment overrides, then passed explicitly into the job.
//! Never hot-reloaded.

use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Reminder service settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReminderSettings {
    /// IANA timezone the schedule is evaluated in
    pub timezone: String,
    /// Wall-clock fire time, `HH:MM`
    pub evening_reminder: String,
    /// Suppress firings whose trigger day is Saturday or Sunday
    pub skip_weekends: bool,
    /// Hand reminders to the delivery surface instead of demo-logging
    pub email_enabled: bool,
    /// Sender identity
    pub from_email: String,
    pub from_name: String,
}

impl ReminderSettings {
    /// Load settings with defaults, file and environment layered in that
    /// order
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("timezone", "Asia/Kolkata")?
            .set_default("evening_reminder", "18:00")?
            .set_default("skip_weekends", true)?
            .set_default("email_enabled", false)?
            .set_default("from_email", "noreply@deskday.local")?
            .set_default("from_name", "Deskday")?
            .add_source(File::with_name("reminder").required(false))
            .add_source(Environment::with_prefix("REMINDER"))
            .build()
            .context("Failed to build reminder settings")?;

        settings
            .try_deserialize()
            .context("Invalid reminder settings")
    }

    /// Parse the configured timezone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone {}: {}", self.timezone, e))
    }

    /// Parse the `HH:MM` fire time
    pub fn fire_time(&self) -> Result<(u32, u32)> {
        let (hour, minute) = self
            .evening_reminder
            .split_once(':')
            .ok_or_else(|| anyhow!("Invalid fire time: {}", self.evening_reminder))?;

        let hour: u32 = hour
            .parse()
            .map_err(|_| anyhow!("Invalid fire hour: {}", self.evening_reminder))?;
        let minute: u32 = minute
            .parse()
            .map_err(|_| anyhow!("Invalid fire minute: {}", self.evening_reminder))?;

        if hour > 23 || minute > 59 {
            return Err(anyhow!("Fire time out of range: {}", self.evening_reminder));
        }

        Ok((hour, minute))
    }

    /// Six-field cron expression for the daily firing
    pub fn cron_expression(&self) -> Result<String> {
        let (hour, minute) = self.fire_time()?;
        Ok(format!("0 {} {} * * *", minute, hour))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn settings(evening_reminder: &str, timezone: &str) -> ReminderSettings {
        ReminderSettings {
            timezone: timezone.to_string(),
            evening_reminder: evening_reminder.to_string(),
            skip_weekends: true,
            email_enabled: false,
            from_email: "noreply@deskday.local".to_string(),
            from_name: "Deskday".to_string(),
        }
    }

    #[test]
    #[serial]
    fn load_uses_defaults() {
        let loaded = ReminderSettings::load().unwrap();
        assert_eq!(loaded.timezone, "Asia/Kolkata");
        assert_eq!(loaded.evening_reminder, "18:00");
        assert!(loaded.skip_weekends);
        assert!(!loaded.email_enabled);
    }

    #[test]
    fn parses_fire_time() {
        assert_eq!(settings("18:00", "UTC").fire_time().unwrap(), (18, 0));
        assert_eq!(settings("07:45", "UTC").fire_time().unwrap(), (7, 45));
    }

    #[test]
    fn rejects_malformed_fire_time() {
        assert!(settings("1800", "UTC").fire_time().is_err());
        assert!(settings("25:00", "UTC").fire_time().is_err());
        assert!(settings("18:61", "UTC").fire_time().is_err());
        assert!(settings("six pm", "UTC").fire_time().is_err());
    }

    #[test]
    fn builds_cron_expression() {
        assert_eq!(settings("18:00", "UTC").cron_expression().unwrap(), "0 0 18 * * *");
        assert_eq!(settings("07:45", "UTC").cron_expression().unwrap(), "0 45 7 * * *");
    }

    #[test]
    fn parses_timezone() {
        assert_eq!(settings("18:00", "Asia/Kolkata").tz().unwrap(), chrono_tz::Asia::Kolkata);
        assert!(settings("18:00", "Mars/Olympus").tz().is_err());
    }
}
