//! User management endpoints (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use mailflow_auth::hash_password;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{CreateUserRequest, ErrorResponse, UpdateUserRequest, User, UserRole};
use crate::AppState;

const MIN_PASSWORD_LEN: usize = 8;

fn require_admin(auth: &AuthUser) -> Result<(), ApiError> {
    if auth.role != UserRole::Admin {
        return Err(ApiError::Forbidden(
            "administrator role required".to_string(),
        ));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// List all users
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "List of users", body = Vec<User>),
        (status = 403, description = "Not an administrator", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<Vec<User>>, ApiError> {
    require_admin(&auth)?;
    let users = state.store.list_users().await?;
    Ok(Json(users))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    require_admin(&auth)?;

    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(ApiError::Validation("a valid email is required".to_string()));
    }
    if req.display_name.trim().is_empty() {
        return Err(ApiError::Validation("display_name is required".to_string()));
    }
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?;
    let user = state.store.create_user(&req, password_hash).await?;

    info!("user {} created by {}", user.id, auth.user_id);

    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    require_admin(&auth)?;

    let password_hash = match &req.password {
        Some(password) => {
            validate_password(password)?;
            Some(
                hash_password(password)
                    .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))?,
            )
        }
        None => None,
    };

    let user = state.store.update_user(id, &req, password_hash).await?;
    Ok(Json(user))
}

/// Delete a user
///
/// Hard delete; the normal removal path is deactivation via update.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User UUID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 400, description = "Cannot delete yourself", body = ErrorResponse),
        (status = 403, description = "Not an administrator", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    require_admin(&auth)?;
    if id == auth.user_id {
        return Err(ApiError::Validation(
            "cannot delete the account you are logged in with".to_string(),
        ));
    }

    state.store.delete_user(id).await?;
    info!("user {} deleted by {}", id, auth.user_id);
    Ok(StatusCode::NO_CONTENT)
}
