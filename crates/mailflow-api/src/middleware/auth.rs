//! JWT Authentication Middleware
//!
//! Extracts the bearer token from the Authorization header, validates it,
//! and makes the user context available to handlers via request extensions.
//!
//! Status codes follow the session contract: a missing header is 401
//! (no credentials), while a malformed, invalid or expired token is 403
//! (credentials presented but rejected).

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use mailflow_auth::JwtValidator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::{ErrorResponse, UserRole};

/// Authenticated user context extracted from the token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    /// User UUID
    pub user_id: Uuid,
    /// User email
    pub email: String,
    /// User role (admin, manager, user)
    pub role: UserRole,
    /// Name shown in clients
    pub display_name: String,
}

/// JWT validation state shared across middleware instances
#[derive(Clone)]
pub struct JwtState {
    pub validator: Arc<JwtValidator>,
}

impl JwtState {
    /// Create new JWT state with the given secret
    pub fn new(secret: &[u8]) -> Self {
        Self {
            validator: Arc::new(JwtValidator::new(secret)),
        }
    }
}

fn reject(
    status: StatusCode,
    message: &str,
    code: &str,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
            code: Some(code.to_string()),
        }),
    )
}

/// Authentication middleware that validates JWT session tokens
///
/// # Errors
/// - 401 if the Authorization header is missing
/// - 403 if the header is not `Bearer <token>`, the signature is invalid,
///   the token is expired, or the claims are unusable
pub async fn require_auth(
    state: axum::extract::State<Arc<JwtState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            reject(
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header",
                "MISSING_AUTH",
            )
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        reject(
            StatusCode::FORBIDDEN,
            "Invalid Authorization header format. Expected 'Bearer <token>'",
            "INVALID_AUTH_FORMAT",
        )
    })?;

    let claims = state.validator.validate(token).map_err(|e| {
        reject(
            StatusCode::FORBIDDEN,
            &format!("Invalid or expired token: {}", e),
            "INVALID_TOKEN",
        )
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
        reject(
            StatusCode::FORBIDDEN,
            "Token subject is not a valid user id",
            "INVALID_TOKEN",
        )
    })?;

    let role = UserRole::from_claim(&claims.role).ok_or_else(|| {
        reject(
            StatusCode::FORBIDDEN,
            "Token carries an unknown role",
            "INVALID_TOKEN",
        )
    })?;

    let auth_user = AuthUser {
        user_id,
        email: claims.email,
        role,
        display_name: claims.display_name,
    };

    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, middleware, routing::get, Router};
    use chrono::Duration;
    use mailflow_auth::JwtClaims;
    use tower::ServiceExt; // For oneshot()

    // Test handler that returns the authenticated user
    async fn protected_handler(axum::Extension(user): axum::Extension<AuthUser>) -> Json<AuthUser> {
        Json(user)
    }

    fn create_test_app(jwt_secret: &[u8]) -> Router {
        let jwt_state = Arc::new(JwtState::new(jwt_secret));

        Router::new()
            .route("/protected", get(protected_handler))
            .layer(middleware::from_fn_with_state(
                jwt_state.clone(),
                require_auth,
            ))
            .with_state(jwt_state)
    }

    fn session_claims(validity: Duration) -> JwtClaims {
        JwtClaims::new(
            Uuid::new_v4().to_string(),
            "clerk@example.com".to_string(),
            "manager".to_string(),
            "Mail Clerk".to_string(),
            validity,
        )
    }

    #[tokio::test]
    async fn test_auth_middleware_valid_token() {
        let jwt_secret = b"test-secret-key";
        let app = create_test_app(jwt_secret);

        let claims = session_claims(Duration::hours(1));
        let token = JwtValidator::encode(jwt_secret, &claims).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let auth_user: AuthUser = serde_json::from_slice(&body).unwrap();

        assert_eq!(auth_user.user_id.to_string(), claims.sub);
        assert_eq!(auth_user.role, UserRole::Manager);
        assert_eq!(auth_user.display_name, "Mail Clerk");
    }

    #[tokio::test]
    async fn test_auth_middleware_missing_authorization_header() {
        let app = create_test_app(b"test-secret-key");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(error.code.as_deref(), Some("MISSING_AUTH"));
    }

    #[tokio::test]
    async fn test_auth_middleware_invalid_bearer_format() {
        let app = create_test_app(b"test-secret-key");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", "InvalidFormat token123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert!(error.error.contains("Invalid Authorization header format"));
    }

    #[tokio::test]
    async fn test_auth_middleware_expired_token() {
        let jwt_secret = b"test-secret-key";
        let app = create_test_app(jwt_secret);

        // Already expired
        let claims = session_claims(Duration::seconds(-10));
        let token = JwtValidator::encode(jwt_secret, &claims).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(error.code.as_deref(), Some("INVALID_TOKEN"));
    }

    #[tokio::test]
    async fn test_auth_middleware_wrong_secret() {
        let app = create_test_app(b"test-secret-key");

        let claims = session_claims(Duration::hours(1));
        let token = JwtValidator::encode(b"wrong-secret-key", &claims).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_auth_middleware_rejects_non_uuid_subject() {
        let jwt_secret = b"test-secret-key";
        let app = create_test_app(jwt_secret);

        let claims = JwtClaims::new(
            "not-a-uuid".to_string(),
            "clerk@example.com".to_string(),
            "user".to_string(),
            "Mail Clerk".to_string(),
            Duration::hours(1),
        );
        let token = JwtValidator::encode(jwt_secret, &claims).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert!(error.error.contains("not a valid user id"));
    }

    #[tokio::test]
    async fn test_auth_middleware_rejects_unknown_role() {
        let jwt_secret = b"test-secret-key";
        let app = create_test_app(jwt_secret);

        let claims = JwtClaims::new(
            Uuid::new_v4().to_string(),
            "clerk@example.com".to_string(),
            "superuser".to_string(),
            "Mail Clerk".to_string(),
            Duration::hours(1),
        );
        let token = JwtValidator::encode(jwt_secret, &claims).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header("Authorization", format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
