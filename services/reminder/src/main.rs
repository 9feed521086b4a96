use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

mod database;
mod job;
mod notifier;
mod settings;

use common::database::{DatabaseConfig, init_pool};

use crate::database::Database;
use crate::job::ReminderJob;
use crate::notifier::EmailNotifier;
use crate::settings::ReminderSettings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_max_level(Level::INFO)
        .init();

    info!("Starting reminder service");

    // Load schedule settings once; they are passed explicitly from here on
    let settings = ReminderSettings::load()?;
    let tz = settings.tz()?;
    let cron = settings.cron_expression()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    let database = Database::new(pool);
    let notifier = EmailNotifier::new(&settings);
    let job = ReminderJob::new(database, notifier, settings.skip_weekends);

    let _scheduler = job.start(tz, &cron).await?;

    info!(
        "Reminder service started; evening reminders at {} {}",
        settings.evening_reminder, settings.timezone
    );

    // Keep the service running
    tokio::signal::ctrl_c().await?;
    info!("Shutting down reminder service");

    Ok(())
}
