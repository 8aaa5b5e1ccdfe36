//! Tag endpoints

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
use crate::models::{CreateTagRequest, ErrorResponse, Tag, UpdateTagRequest};
use crate::AppState;

/// List all tags
#[utoipa::path(
    get,
    path = "/api/tags",
    responses(
        (status = 200, description = "List of tags", body = Vec<Tag>),
        (status = 401, description = "Missing credentials", body = ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn list_tags(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Tag>>, ApiError> {
    let tags = state.store.list_tags().await?;
    Ok(Json(tags))
}

/// Create a tag
#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = CreateTagRequest,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::Validation("name is required".to_string()));
    }
    let tag = state.store.create_tag(&req, Some(auth.user_id)).await?;
    info!("tag {} created", tag.id);
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Update a tag
#[utoipa::path(
    put,
    path = "/api/tags/{id}",
    params(("id" = Uuid, Path, description = "Tag UUID")),
    request_body = UpdateTagRequest,
    responses(
        (status = 200, description = "Updated tag", body = Tag),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn update_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTagRequest>,
) -> Result<Json<Tag>, ApiError> {
    let tag = state.store.update_tag(id, &req).await?;
    Ok(Json(tag))
}

/// Delete a tag
///
/// The tag is first detached from every mail record, then removed.
#[utoipa::path(
    delete,
    path = "/api/tags/{id}",
    params(("id" = Uuid, Path, description = "Tag UUID")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    ),
    tag = "tags"
)]
pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_tag(id).await?;
    info!("tag {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
