//! Response model and related payloads
//!
//! A Response is one user's declared location for one calendar date. The
//! store keeps at most one row per (user, date) pair.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Response entity as stored
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Response {
    pub id: Uuid,
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub date: NaiveDate,
    pub updated_at: DateTime<Utc>,
}

/// Request for the "set my location" action. The date arrives as
/// `YYYY-MM-DD` and is validated before it reaches the store.
#[derive(Debug, Clone, Deserialize)]
pub struct SetLocationRequest {
    pub user_id: Uuid,
    pub location_id: Uuid,
    pub date: String,
}
