//! Error types for biblio-api
//!
//! Every failure a handler can produce maps onto exactly one HTTP
//! status: validation failures are 400, missing records are 404, and
//! persistence failures are 500. The response body is always the shared
//! error envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use biblio_common::api::types::{ErrorEnvelope, Violation};
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Request body failed validation (400)
    #[error("Validation failed")]
    Validation(Vec<Violation>),

    /// Malformed request parameter (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Database failure (500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, envelope) = match self {
            ApiError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorEnvelope::new("NOT_FOUND", msg),
            ),
            ApiError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                ErrorEnvelope::with_violations(
                    "VALIDATION_FAILED",
                    "Validation failed",
                    violations,
                ),
            ),
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorEnvelope::new("BAD_REQUEST", msg),
            ),
            ApiError::Database(ref err) => {
                error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorEnvelope::new("DATABASE_ERROR", err.to_string()),
                )
            }
        };

        (status, Json(envelope)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = ApiError::NotFound("Article 7 not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_validation_maps_to_400() {
        let response = ApiError::Validation(vec![Violation::new(
            "articleTitle",
            "must be at least 5 characters",
        )])
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_request_maps_to_400() {
        let response = ApiError::BadRequest("page must be a non-negative integer".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_database_maps_to_500() {
        let response = ApiError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
