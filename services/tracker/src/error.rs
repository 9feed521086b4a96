//! Custom error types for the tracker service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Core error type for attendance operations
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Input failed validation: malformed date, unknown user or location,
    /// duplicate email
    #[error("Validation error: {0}")]
    Validation(String),

    /// Password hashing failed
    #[error("Password hashing error: {0}")]
    Hashing(String),

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Type alias for core results
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Custom error type for the HTTP surface
#[derive(Error, Debug)]
pub enum ApiError {
    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Lookup target does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl From<TrackerError> for ApiError {
    fn from(err: TrackerError) -> Self {
        match err {
            TrackerError::Validation(msg) => ApiError::BadRequest(msg),
            TrackerError::Hashing(msg) => {
                tracing::error!("Password hashing failed: {}", msg);
                ApiError::InternalServerError
            }
            TrackerError::Database(e) => {
                tracing::error!("Database operation failed: {}", e);
                ApiError::InternalServerError
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
