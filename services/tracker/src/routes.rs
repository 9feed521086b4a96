//! Tracker service routes
//!
//! The JSON surface over the attendance core: the "set my location" upsert,
//! the read-only summary/calendar queries, and the user directory. Login
//! and admin guards belong to the surrounding web layer; handlers here
//! never inspect session state.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateUserRequest, SetActiveRequest, SetLocationRequest},
    state::AppState,
    validation,
};

/// Query range for the personal calendar; defaults to thirty days either
/// side of today
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Create the router for the tracker service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/locations", get(get_locations))
        .route("/api/responses", post(set_location))
        .route("/api/responses/:user_id/:date", get(get_response))
        .route("/api/calendar/:user_id", get(get_calendar))
        .route("/api/summary/:date", get(get_summary))
        .route("/api/summary/:date/roster", get(get_roster))
        .route("/api/summary/:date/missing", get(get_non_responders))
        .route("/api/users", get(get_users).post(create_user))
        .route("/api/users/:id/active", post(set_user_active))
        .with_state(state)
}

fn parse_date_param(date: &str) -> Result<NaiveDate, ApiError> {
    validation::parse_date(date).map_err(ApiError::BadRequest)
}

/// Health check endpoint probing database connectivity
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let healthy = common::database::health_check(&state.db_pool)
        .await
        .unwrap_or(false);

    if healthy {
        (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
            })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "status": "unhealthy",
                "database": "unreachable",
            })),
        )
    }
}

/// Active locations
pub async fn get_locations(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let locations = state.location_repository.list_active().await?;
    Ok(Json(locations))
}

/// Set a user's location for a date (idempotent upsert)
pub async fn set_location(
    State(state): State<AppState>,
    Json(payload): Json<SetLocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let date = parse_date_param(&payload.date)?;

    let response = state
        .response_repository
        .upsert(payload.user_id, payload.location_id, date)
        .await?;

    Ok(Json(response))
}

/// Point lookup of one user's response for one date
pub async fn get_response(
    State(state): State<AppState>,
    Path((user_id, date)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let date = parse_date_param(&date)?;

    let response = state
        .response_repository
        .get(user_id, date)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No response for {}", date)))?;

    Ok(Json(response))
}

/// A user's calendar window
pub async fn get_calendar(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(range): Query<CalendarQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let today = Utc::now().date_naive();
    let start = match &range.start {
        Some(date) => parse_date_param(date)?,
        None => today - Duration::days(30),
    };
    let end = match &range.end {
        Some(date) => parse_date_param(date)?,
        None => today + Duration::days(30),
    };

    let entries = state
        .summary_repository
        .user_calendar(user_id, start, end)
        .await?;

    Ok(Json(entries))
}

/// Counts by location for a date
pub async fn get_summary(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let date = parse_date_param(&date)?;
    let summary = state.summary_repository.summary_by_location(date).await?;
    Ok(Json(summary))
}

/// Detailed roster for a date
pub async fn get_roster(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let date = parse_date_param(&date)?;
    let roster = state.summary_repository.detailed_roster(date).await?;
    Ok(Json(roster))
}

/// Active users with no response for a date
pub async fn get_non_responders(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let date = parse_date_param(&date)?;
    let missing = state.summary_repository.non_responders(date).await?;
    Ok(Json(missing))
}

/// Register a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validation::validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    validation::validate_password(&payload.password).map_err(ApiError::BadRequest)?;

    let user = state.user_repository.create(&payload, false).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Directory listing
pub async fn get_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.user_repository.list_all().await?;
    Ok(Json(users))
}

/// Activate or deactivate a user (admin capability; the guard lives in the
/// surrounding web layer)
pub async fn set_user_active(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetActiveRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let updated = state.user_repository.set_active(id, payload.active).await?;

    if updated {
        Ok(Json(json!({"message": "User status updated"})))
    } else {
        Err(ApiError::NotFound(format!("User not found: {}", id)))
    }
}
