//! API error taxonomy
//!
//! Every handler returns `Result<_, ApiError>`; the variants map one-to-one
//! onto HTTP status codes and serialize to the `ErrorResponse` body shape.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use thiserror::Error;
use tracing::error;

use crate::models::ErrorResponse;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or semantically invalid input (400)
    #[error("{0}")]
    Validation(String),

    /// Missing or failed credentials (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    #[error("{0}")]
    Forbidden(String),

    /// Target resource does not exist (404)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Referential-integrity conflict, e.g. deleting reference data still
    /// in use (409)
    #[error("{0}")]
    Conflict(String),

    /// Store failure, surfaced to the client as a generic message (500)
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Non-database internal failure, also surfaced as a generic message
    /// (500)
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Database(_) | ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            StoreError::Conflict(msg) => ApiError::Conflict(msg),
            StoreError::InvalidInput(msg) => ApiError::Validation(msg),
            StoreError::Database(e) => ApiError::Database(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Store internals never reach the client.
        let message = match &self {
            ApiError::Database(e) => {
                error!("database error: {}", e);
                "Internal server error".to_string()
            }
            ApiError::Internal(e) => {
                error!("internal error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: message,
            code: Some(self.code().to_string()),
        };

        (self.status(), Json(body)).into_response()
    }
}
