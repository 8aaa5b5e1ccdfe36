//! Shared helpers for API integration tests
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
    Router,
};
use sea_orm::Database;
use sea_orm_migration::MigratorTrait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt; // For `oneshot` method

use mailflow_api::models::{CreateUserRequest, LoginResponse, User, UserRole};
use mailflow_api::store::{MailStore, SqlStore};
use mailflow_api::{ApiServer, ApiServerConfig};
use mailflow_auth::hash_password;

pub const JWT_SECRET: &str = "test-secret";

/// Build a router backed by a fresh in-memory database, plus direct store
/// access for seeding.
pub async fn test_app() -> (Router, Arc<dyn MailStore>) {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database");
    mailflow_db::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let store: Arc<dyn MailStore> = Arc::new(SqlStore::new(db));
    let config = ApiServerConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        enable_cors: true,
        jwt_secret: JWT_SECRET.to_string(),
        request_timeout: Duration::from_secs(5),
    };
    let app = ApiServer::new(config, store.clone()).build_router();

    (app, store)
}

/// Seed a user directly through the store, bypassing the admin-only
/// endpoint.
pub async fn seed_user(store: &dyn MailStore, email: &str, password: &str, role: UserRole) -> User {
    let req = CreateUserRequest {
        email: email.to_string(),
        password: password.to_string(),
        display_name: "Test User".to_string(),
        role,
        permissions: None,
    };
    let password_hash = hash_password(password).expect("Failed to hash password");
    store
        .create_user(&req, password_hash)
        .await
        .expect("Failed to seed user")
}

/// Log in over HTTP and return the bearer token.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            serde_json::json!({ "email": email, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login failed");

    let login: LoginResponse = body_json(response).await;
    login.token
}

/// Seed a manager account and return its token. Most tests only need an
/// authenticated session, not a particular role.
pub async fn seed_and_login(app: &Router, store: &dyn MailStore) -> String {
    seed_user(store, "clerk@example.com", "password123", UserRole::Manager).await;
    login(app, "clerk@example.com", "password123").await
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("bad body ({}): {}", e, String::from_utf8_lossy(&body)))
}
