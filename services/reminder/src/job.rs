//! The evening reminder scan
//!
//! A time-driven job with two states: idle between triggers, running while
//! a scan is in flight. The weekday gate checks the trigger day in the
//! configured timezone; the target date is always tomorrow relative to the
//! fire time. A Friday firing therefore still fires and asks about
//! Saturday, while a Saturday firing is suppressed outright.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::database::Database;
use crate::notifier::EmailNotifier;

/// Notification log tag written for every processed user
pub const EVENING_REMINDER: &str = "evening_reminder";

/// Whether a firing at `now` is allowed. The gate looks at the trigger
/// day's weekday, never the target day's.
pub fn gate_allows(skip_weekends: bool, now: DateTime<Tz>) -> bool {
    if skip_weekends {
        return now.weekday().num_days_from_monday() < 5;
    }
    true
}

/// The date a firing reminds about: tomorrow relative to the fire time
pub fn target_date(now: DateTime<Tz>) -> NaiveDate {
    now.date_naive() + Duration::days(1)
}

#[derive(Clone)]
pub struct ReminderJob {
    database: Database,
    notifier: EmailNotifier,
    skip_weekends: bool,
}

impl ReminderJob {
    pub fn new(database: Database, notifier: EmailNotifier, skip_weekends: bool) -> Self {
        Self {
            database,
            notifier,
            skip_weekends,
        }
    }

    /// Execute one firing at the injected instant. Returns the number of
    /// users processed. Notifier failures are isolated per user and never
    /// abort the batch; the log row records "reminder processed", not
    /// "email delivered".
    pub async fn run(&self, now: DateTime<Tz>) -> Result<usize> {
        if !gate_allows(self.skip_weekends, now) {
            info!("Skipping reminder firing: weekend in configured timezone");
            return Ok(0);
        }

        let target = target_date(now);
        let pending = self.database.users_without_response(target).await?;

        for user in &pending {
            self.database
                .log_notification(user.id, EVENING_REMINDER)
                .await?;

            match self.notifier.notify(&user.email, &user.name, EVENING_REMINDER) {
                Ok(true) => {}
                Ok(false) => warn!("Reminder delivery refused for {}", user.email),
                Err(e) => warn!("Reminder delivery failed for {}: {}", user.email, e),
            }
        }

        info!(
            "Evening reminders processed: {} users for {}",
            pending.len(),
            target
        );
        Ok(pending.len())
    }

    /// Register the daily firing and start the scheduler. Firings are
    /// single-instance: an overlapping trigger is skipped, never run
    /// concurrently. A failed firing logs and waits for the next trigger.
    pub async fn start(&self, tz: Tz, cron: &str) -> Result<JobScheduler> {
        let scheduler = JobScheduler::new().await?;

        let job_body = self.clone();
        let running = Arc::new(Mutex::new(()));

        let job = Job::new_async_tz(cron, tz, move |_, _| {
            let job = job_body.clone();
            let running = running.clone();
            Box::pin(async move {
                let Ok(_guard) = running.try_lock() else {
                    warn!("Previous reminder firing still running; skipping this trigger");
                    return;
                };

                let now = Utc::now().with_timezone(&tz);
                if let Err(e) = job.run(now).await {
                    error!("Reminder firing failed: {}", e);
                }
            })
        })?;

        scheduler.add(job).await?;
        scheduler.start().await?;

        info!("Scheduled evening reminders ({} in {})", cron, tz);
        Ok(scheduler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Kolkata;

    // 2024-01-05 is a Friday, 2024-01-06 a Saturday, 2024-01-07 a Sunday.

    #[test]
    fn friday_fires_and_targets_saturday() {
        let friday_evening = Kolkata.with_ymd_and_hms(2024, 1, 5, 18, 0, 0).unwrap();
        assert!(gate_allows(true, friday_evening));
        assert_eq!(
            target_date(friday_evening),
            NaiveDate::from_ymd_opt(2024, 1, 6).unwrap()
        );
    }

    #[test]
    fn saturday_is_suppressed() {
        let saturday_evening = Kolkata.with_ymd_and_hms(2024, 1, 6, 18, 0, 0).unwrap();
        assert!(!gate_allows(true, saturday_evening));
    }

    #[test]
    fn sunday_is_suppressed() {
        let sunday_evening = Kolkata.with_ymd_and_hms(2024, 1, 7, 18, 0, 0).unwrap();
        assert!(!gate_allows(true, sunday_evening));
    }

    #[test]
    fn weekend_fires_when_skip_disabled() {
        let saturday_evening = Kolkata.with_ymd_and_hms(2024, 1, 6, 18, 0, 0).unwrap();
        assert!(gate_allows(false, saturday_evening));
        assert_eq!(
            target_date(saturday_evening),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
        );
    }

    #[test]
    fn gate_uses_the_configured_timezone() {
        // Friday 20:00 UTC is already Saturday 01:30 in Kolkata.
        let utc_friday = Utc.with_ymd_and_hms(2024, 1, 5, 20, 0, 0).unwrap();
        let local = utc_friday.with_timezone(&Kolkata);
        assert!(!gate_allows(true, local));
    }

    #[test]
    fn target_crosses_month_boundaries() {
        let eve = Kolkata.with_ymd_and_hms(2024, 1, 31, 18, 0, 0).unwrap();
        assert_eq!(
            target_date(eve),
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
        );
    }
}
