//! Login and session endpoints

use axum::{extract::State, Extension, Json};
use std::sync::Arc;
use tracing::{info, warn};

use mailflow_auth::{token_validity, verify_password, JwtClaims, JwtValidator};

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::models::{ErrorResponse, LoginRequest, LoginResponse, User};
use crate::AppState;

/// Log in with email and password
///
/// Issues a bearer token valid for 24 hours. Unknown emails, wrong passwords
/// and deactivated accounts all produce the same 401 so the response does
/// not leak which emails exist.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    const BAD_CREDENTIALS: &str = "Invalid email or password";

    let found = state.store.find_user_for_login(&req.email).await?;
    let Some(found) = found else {
        warn!("login failed: unknown email");
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };

    let password_ok = verify_password(&req.password, &found.password_hash)
        .map_err(|e| ApiError::Internal(format!("password verification failed: {e}")))?;
    if !password_ok || !found.user.is_active {
        warn!("login failed for {}", found.user.id);
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let user = found.user;
    state.store.touch_last_login(user.id).await?;

    let claims = JwtClaims::new(
        user.id.to_string(),
        user.email.clone(),
        user.role.as_str().to_string(),
        user.display_name.clone(),
        token_validity(),
    );
    let token = JwtValidator::encode(state.jwt_secret.as_bytes(), &claims)
        .map_err(|e| ApiError::Internal(format!("token signing failed: {e}")))?;

    info!("user {} logged in", user.id);

    Ok(Json(LoginResponse { user, token }))
}

/// Get the currently authenticated user
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing credentials", body = ErrorResponse),
        (status = 403, description = "Invalid or expired token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<User>, ApiError> {
    let user = state.store.get_user(auth.user_id).await?;
    Ok(Json(user))
}
