//! Application state shared across handlers

use sqlx::PgPool;

use crate::repositories::{
    LocationRepository, ResponseRepository, SummaryRepository, UserRepository,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub user_repository: UserRepository,
    pub location_repository: LocationRepository,
    pub response_repository: ResponseRepository,
    pub summary_repository: SummaryRepository,
}
