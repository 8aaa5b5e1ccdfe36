//! Application settings endpoints

use axum::{extract::State, Json};
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::models::{AppSettings, ErrorResponse};
use crate::AppState;

/// Get the application settings
///
/// Keys never written yet come back with their defaults.
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Current settings", body = AppSettings),
        (status = 401, description = "Missing credentials", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn get_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AppSettings>, ApiError> {
    let settings = state.store.load_settings().await?;
    Ok(Json(settings))
}

/// Replace the application settings
#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = AppSettings,
    responses(
        (status = 200, description = "Persisted settings", body = AppSettings),
        (status = 400, description = "Invalid settings document", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<AppSettings>,
) -> Result<Json<AppSettings>, ApiError> {
    let saved = state.store.save_settings(&settings).await?;
    info!("application settings updated");
    Ok(Json(saved))
}
