//! Location registry repository
//!
//! The catalog is fixed reference data: seeding an existing name is a no-op
//! (first writer wins) and locations are only ever deactivated.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::error::TrackerResult;
use crate::models::Location;

/// Location repository
#[derive(Clone)]
pub struct LocationRepository {
    pool: PgPool,
}

impl LocationRepository {
    /// Create a new location repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a location unless the name is already taken
    pub async fn seed(&self, name: &str, emoji: &str, color: &str) -> TrackerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO locations (name, emoji, color)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(emoji)
        .bind(color)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Active locations ordered by name
    pub async fn list_active(&self) -> TrackerResult<Vec<Location>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, emoji, color, is_active
            FROM locations
            WHERE is_active = TRUE
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(location_from_row).collect())
    }

    /// All locations ordered by name, deactivated included
    pub async fn list_all(&self) -> TrackerResult<Vec<Location>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, emoji, color, is_active
            FROM locations
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(location_from_row).collect())
    }

    /// Find a location by ID
    pub async fn find_by_id(&self, id: Uuid) -> TrackerResult<Option<Location>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, emoji, color, is_active
            FROM locations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(location_from_row))
    }

    /// Activate or deactivate a location. Returns false when it does not
    /// exist. Deactivated locations stay referenced by historical responses.
    pub async fn set_active(&self, id: Uuid, active: bool) -> TrackerResult<bool> {
        let result = sqlx::query("UPDATE locations SET is_active = $1 WHERE id = $2")
            .bind(active)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn location_from_row(row: sqlx::postgres::PgRow) -> Location {
    Location {
        id: row.get("id"),
        name: row.get("name"),
        emoji: row.get("emoji"),
        color: row.get("color"),
        is_active: row.get("is_active"),
    }
}
