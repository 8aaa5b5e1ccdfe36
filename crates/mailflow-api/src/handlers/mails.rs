//! Incoming and outgoing mail endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{
    CreateIncomingMailRequest, CreateOutgoingMailRequest, ErrorResponse, IncomingMail,
    OutgoingMail, UpdateIncomingMailRequest, UpdateOutgoingMailRequest,
};
use crate::AppState;

fn validate_mail_fields(reference: &str, subject: &str) -> Result<(), ApiError> {
    if reference.trim().is_empty() {
        return Err(ApiError::Validation("reference is required".to_string()));
    }
    if subject.trim().is_empty() {
        return Err(ApiError::Validation("subject is required".to_string()));
    }
    Ok(())
}

/// List incoming mail, newest arrival first
#[utoipa::path(
    get,
    path = "/api/incoming-mails",
    responses(
        (status = 200, description = "List of incoming mail", body = Vec<IncomingMail>),
        (status = 401, description = "Missing credentials", body = ErrorResponse)
    ),
    tag = "incoming-mails"
)]
pub async fn list_incoming_mails(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<IncomingMail>>, ApiError> {
    debug!("listing incoming mail");
    let mails = state.store.list_incoming_mails().await?;
    Ok(Json(mails))
}

/// Register an incoming mail
#[utoipa::path(
    post,
    path = "/api/incoming-mails",
    request_body = CreateIncomingMailRequest,
    responses(
        (status = 201, description = "Mail registered", body = IncomingMail),
        (status = 400, description = "Invalid request or unknown references", body = ErrorResponse)
    ),
    tag = "incoming-mails"
)]
pub async fn create_incoming_mail(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateIncomingMailRequest>,
) -> Result<(StatusCode, Json<IncomingMail>), ApiError> {
    validate_mail_fields(&req.reference, &req.subject)?;
    let mail = state
        .store
        .create_incoming_mail(&req, Some(auth.user_id))
        .await?;
    info!("incoming mail {} registered ({})", mail.id, mail.reference);
    Ok((StatusCode::CREATED, Json(mail)))
}

/// Update an incoming mail
///
/// Including `tags` replaces the whole tag set; omitting it leaves the
/// existing tags untouched.
#[utoipa::path(
    put,
    path = "/api/incoming-mails/{id}",
    params(("id" = Uuid, Path, description = "Mail UUID")),
    request_body = UpdateIncomingMailRequest,
    responses(
        (status = 200, description = "Updated mail", body = IncomingMail),
        (status = 400, description = "Invalid request or unknown references", body = ErrorResponse),
        (status = 404, description = "Mail not found", body = ErrorResponse)
    ),
    tag = "incoming-mails"
)]
pub async fn update_incoming_mail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateIncomingMailRequest>,
) -> Result<Json<IncomingMail>, ApiError> {
    let mail = state.store.update_incoming_mail(id, &req).await?;
    Ok(Json(mail))
}

/// Delete an incoming mail and its tag assignments
#[utoipa::path(
    delete,
    path = "/api/incoming-mails/{id}",
    params(("id" = Uuid, Path, description = "Mail UUID")),
    responses(
        (status = 204, description = "Mail deleted"),
        (status = 404, description = "Mail not found", body = ErrorResponse)
    ),
    tag = "incoming-mails"
)]
pub async fn delete_incoming_mail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_incoming_mail(id).await?;
    info!("incoming mail {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

/// List outgoing mail, newest send date first
#[utoipa::path(
    get,
    path = "/api/outgoing-mails",
    responses(
        (status = 200, description = "List of outgoing mail", body = Vec<OutgoingMail>),
        (status = 401, description = "Missing credentials", body = ErrorResponse)
    ),
    tag = "outgoing-mails"
)]
pub async fn list_outgoing_mails(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<OutgoingMail>>, ApiError> {
    debug!("listing outgoing mail");
    let mails = state.store.list_outgoing_mails().await?;
    Ok(Json(mails))
}

/// Register an outgoing mail
#[utoipa::path(
    post,
    path = "/api/outgoing-mails",
    request_body = CreateOutgoingMailRequest,
    responses(
        (status = 201, description = "Mail registered", body = OutgoingMail),
        (status = 400, description = "Invalid request or unknown references", body = ErrorResponse)
    ),
    tag = "outgoing-mails"
)]
pub async fn create_outgoing_mail(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateOutgoingMailRequest>,
) -> Result<(StatusCode, Json<OutgoingMail>), ApiError> {
    validate_mail_fields(&req.reference, &req.subject)?;
    let mail = state
        .store
        .create_outgoing_mail(&req, Some(auth.user_id))
        .await?;
    info!("outgoing mail {} registered ({})", mail.id, mail.reference);
    Ok((StatusCode::CREATED, Json(mail)))
}

/// Update an outgoing mail; same tag-replacement contract as incoming mail
#[utoipa::path(
    put,
    path = "/api/outgoing-mails/{id}",
    params(("id" = Uuid, Path, description = "Mail UUID")),
    request_body = UpdateOutgoingMailRequest,
    responses(
        (status = 200, description = "Updated mail", body = OutgoingMail),
        (status = 400, description = "Invalid request or unknown references", body = ErrorResponse),
        (status = 404, description = "Mail not found", body = ErrorResponse)
    ),
    tag = "outgoing-mails"
)]
pub async fn update_outgoing_mail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateOutgoingMailRequest>,
) -> Result<Json<OutgoingMail>, ApiError> {
    let mail = state.store.update_outgoing_mail(id, &req).await?;
    Ok(Json(mail))
}

/// Delete an outgoing mail and its tag assignments
#[utoipa::path(
    delete,
    path = "/api/outgoing-mails/{id}",
    params(("id" = Uuid, Path, description = "Mail UUID")),
    responses(
        (status = 204, description = "Mail deleted"),
        (status = 404, description = "Mail not found", body = ErrorResponse)
    ),
    tag = "outgoing-mails"
)]
pub async fn delete_outgoing_mail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.store.delete_outgoing_mail(id).await?;
    info!("outgoing mail {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
