//! Response store
//!
//! One attendance fact per (user, date) pair. The table carries
//! `UNIQUE (user_id, date)` and every write goes through a single
//! `INSERT ... ON CONFLICT ... DO UPDATE`, so concurrent writes to the same
//! key serialize in the database and the later commit wins. Absence from a
//! lookup is a normal outcome, never an error.

use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::error::{TrackerError, TrackerResult};
use crate::models::Response;

/// Response repository
#[derive(Clone)]
pub struct ResponseRepository {
    pool: PgPool,
}

impl ResponseRepository {
    /// Create a new response repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a user's location for a date: insert on first choice,
    /// replace location and refresh the timestamp on any later choice for
    /// the same date. Returns the post-upsert row. Unknown user or location
    /// ids are validation errors; the location may be deactivated, which
    /// allows correcting history.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        location_id: Uuid,
        date: NaiveDate,
    ) -> TrackerResult<Response> {
        info!("Upserting response for user {} on {}", user_id, date);

        let row = sqlx::query(
            r#"
            INSERT INTO responses (user_id, location_id, date)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, date)
            DO UPDATE SET location_id = EXCLUDED.location_id, updated_at = NOW()
            RETURNING id, user_id, location_id, date, updated_at
            "#,
        )
        .bind(user_id)
        .bind(location_id)
        .bind(date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23503") => {
                TrackerError::Validation("Unknown user or location".to_string())
            }
            _ => TrackerError::Database(e),
        })?;

        Ok(response_from_row(row))
    }

    /// Point lookup for one (user, date) pair
    pub async fn get(&self, user_id: Uuid, date: NaiveDate) -> TrackerResult<Option<Response>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, location_id, date, updated_at
            FROM responses
            WHERE user_id = $1 AND date = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(response_from_row))
    }

    /// A user's responses within a date range, ordered by date ascending
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> TrackerResult<Vec<Response>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, location_id, date, updated_at
            FROM responses
            WHERE user_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date
            "#,
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(response_from_row).collect())
    }

    /// All responses for one date, unordered (aggregation input)
    pub async fn list_for_date(&self, date: NaiveDate) -> TrackerResult<Vec<Response>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, location_id, date, updated_at
            FROM responses
            WHERE date = $1
            "#,
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(response_from_row).collect())
    }
}

fn response_from_row(row: sqlx::postgres::PgRow) -> Response {
    Response {
        id: row.get("id"),
        user_id: row.get("user_id"),
        location_id: row.get("location_id"),
        date: row.get("date"),
        updated_at: row.get("updated_at"),
    }
}
