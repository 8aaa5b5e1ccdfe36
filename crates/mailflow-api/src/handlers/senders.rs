//! Sender endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{CreateSenderRequest, ErrorResponse, Sender, UpdateSenderRequest};
use crate::AppState;

/// List all senders
#[utoipa::path(
    get,
    path = "/api/senders",
    responses(
        (status = 200, description = "List of senders", body = Vec<Sender>),
        (status = 401, description = "Missing credentials", body = ErrorResponse)
    ),
    tag = "senders"
)]
pub async fn list_senders(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Sender>>, ApiError> {
    let senders = state.store.list_senders().await?;
    Ok(Json(senders))
}

/// Create a sender
#[utoipa::path(
    post,
    path = "/api/senders",
    request_body = CreateSenderRequest,
    responses(
        (status = 201, description = "Sender created", body = Sender),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "senders"
)]
pub async fn create_sender(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateSenderRequest>,
) -> Result<(StatusCode, Json<Sender>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }
    let sender = state.store.create_sender(&req, Some(auth.user_id)).await?;
    info!("sender {} created", sender.id);
    Ok((StatusCode::CREATED, Json(sender)))
}

/// Update a sender
#[utoipa::path(
    put,
    path = "/api/senders/{id}",
    params(("id" = Uuid, Path, description = "Sender UUID")),
    request_body = UpdateSenderRequest,
    responses(
        (status = 200, description = "Updated sender", body = Sender),
        (status = 404, description = "Sender not found", body = ErrorResponse)
    ),
    tag = "senders"
)]
pub async fn update_sender(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSenderRequest>,
) -> Result<Json<Sender>, ApiError> {
    let sender = state.store.update_sender(id, &req).await?;
    Ok(Json(sender))
}

/// Delete a sender
///
/// Refused while any incoming mail still references the sender.
#[utoipa::path(
    delete,
    path = "/api/senders/{id}",
    params(("id" = Uuid, Path, description = "Sender UUID")),
    responses(
        (status = 204, description = "Sender deleted"),
        (status = 404, description = "Sender not found", body = ErrorResponse),
        (status = 409, description = "Sender still referenced by mail", body = ErrorResponse)
    ),
    tag = "senders"
)]
pub async fn delete_sender(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_sender(id).await?;
    info!("sender {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
