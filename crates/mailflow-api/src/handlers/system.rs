//! Health and statistics endpoints

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::error::ApiError;
use crate::models::{ErrorResponse, HealthResponse, Statistics};
use crate::AppState;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Mail volume statistics
#[utoipa::path(
    get,
    path = "/api/statistics",
    responses(
        (status = 200, description = "Mail counters", body = Statistics),
        (status = 401, description = "Missing credentials", body = ErrorResponse)
    ),
    tag = "system"
)]
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Statistics>, ApiError> {
    let statistics = state.store.statistics().await?;
    Ok(Json(statistics))
}
