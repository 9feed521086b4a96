//! Focused queries for the reminder scan
//!
//! The scan needs only two things from storage: the active users still
//! missing a response for the target date, and the append-only notification
//! log. The log is advisory and never read back here.

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use std::collections::HashSet;
use uuid::Uuid;

/// An active user owed a reminder for the target date
#[derive(Debug, Clone)]
pub struct PendingUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active users with no response for `date`, sorted by name. Computed
    /// as a set difference over the fetched rows, not as an SQL anti-join.
    pub async fn users_without_response(&self, date: NaiveDate) -> Result<Vec<PendingUser>> {
        let active: Vec<PendingUser> =
            sqlx::query("SELECT id, email, name FROM users WHERE is_active = TRUE")
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|row| PendingUser {
                    id: row.get("id"),
                    email: row.get("email"),
                    name: row.get("name"),
                })
                .collect();

        let responded: HashSet<Uuid> =
            sqlx::query("SELECT user_id FROM responses WHERE date = $1")
                .bind(date)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|row| row.get("user_id"))
                .collect();

        let mut pending: Vec<PendingUser> = active
            .into_iter()
            .filter(|user| !responded.contains(&user.id))
            .collect();
        pending.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(pending)
    }

    /// Append one notification log entry. Duplicate entries across repeated
    /// firings are acceptable.
    pub async fn log_notification(&self, user_id: Uuid, kind: &str) -> Result<()> {
        sqlx::query("INSERT INTO notifications (user_id, kind) VALUES ($1, $2)")
            .bind(user_id)
            .bind(kind)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
