//! Location model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One entry of the fixed location catalog. Locations are deactivated,
/// never deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub emoji: String,
    pub color: String,
    pub is_active: bool,
}
