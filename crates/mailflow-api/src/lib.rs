pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod search;
pub mod store;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::store::MailStore;

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<dyn MailStore>,
    pub jwt_secret: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "MailFlow API",
        version = "0.1.0",
        description = "REST API for tracking incoming and outgoing correspondence",
        contact(
            name = "MailFlow Team",
            email = "team@mailflow.io"
        )
    ),
    paths(
        handlers::login,
        handlers::get_current_user,
        handlers::list_users,
        handlers::create_user,
        handlers::update_user,
        handlers::delete_user,
        handlers::list_categories,
        handlers::create_category,
        handlers::update_category,
        handlers::delete_category,
        handlers::list_tags,
        handlers::create_tag,
        handlers::update_tag,
        handlers::delete_tag,
        handlers::list_senders,
        handlers::create_sender,
        handlers::update_sender,
        handlers::delete_sender,
        handlers::list_incoming_mails,
        handlers::create_incoming_mail,
        handlers::update_incoming_mail,
        handlers::delete_incoming_mail,
        handlers::list_outgoing_mails,
        handlers::create_outgoing_mail,
        handlers::update_outgoing_mail,
        handlers::delete_outgoing_mail,
        handlers::search_mails,
        handlers::get_settings,
        handlers::update_settings,
        handlers::get_statistics,
        handlers::health_check,
    ),
    components(
        schemas(
            models::ErrorResponse,
            models::HealthResponse,
            models::UserRole,
            models::PermissionAction,
            models::Permission,
            models::User,
            models::LoginRequest,
            models::LoginResponse,
            models::CreateUserRequest,
            models::UpdateUserRequest,
            models::Category,
            models::CreateCategoryRequest,
            models::UpdateCategoryRequest,
            models::TagKind,
            models::Tag,
            models::CreateTagRequest,
            models::UpdateTagRequest,
            models::TagRef,
            models::Sender,
            models::CreateSenderRequest,
            models::UpdateSenderRequest,
            models::MailPriority,
            models::MailKind,
            models::IncomingMail,
            models::OutgoingMail,
            models::CreateIncomingMailRequest,
            models::UpdateIncomingMailRequest,
            models::CreateOutgoingMailRequest,
            models::UpdateOutgoingMailRequest,
            models::Statistics,
            models::StorageFolders,
            models::NotificationSettings,
            models::AppSettings,
            search::MailScope,
            search::SearchFilter,
            search::CategoryRef,
            search::SenderRef,
            search::SearchHit,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User management endpoints (admin only)"),
        (name = "categories", description = "Category management endpoints"),
        (name = "tags", description = "Tag management endpoints"),
        (name = "senders", description = "Sender management endpoints"),
        (name = "incoming-mails", description = "Incoming mail endpoints"),
        (name = "outgoing-mails", description = "Outgoing mail endpoints"),
        (name = "search", description = "Unified mail search"),
        (name = "settings", description = "Application settings endpoints"),
        (name = "system", description = "System health and statistics endpoints")
    )
)]
struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS (for development)
    pub enable_cors: bool,
    /// JWT secret for signing session tokens
    pub jwt_secret: String,
    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().unwrap(),
            enable_cors: true,
            jwt_secret: String::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, store: Arc<dyn MailStore>) -> Self {
        let state = Arc::new(AppState {
            store,
            jwt_secret: config.jwt_secret.clone(),
        });

        Self { config, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let api_doc = ApiDoc::openapi();

        let jwt_state = Arc::new(middleware::JwtState::new(
            self.config.jwt_secret.as_bytes(),
        ));

        // PUBLIC routes (no authentication required)
        let public_router = Router::new()
            .route("/api/health", get(handlers::health_check))
            .route("/api/auth/login", post(handlers::login))
            .with_state(self.state.clone());

        // PROTECTED routes (require a session token)
        let protected_router = Router::new()
            .route("/api/auth/me", get(handlers::get_current_user))
            .route(
                "/api/users",
                get(handlers::list_users).post(handlers::create_user),
            )
            .route(
                "/api/users/{id}",
                axum::routing::put(handlers::update_user).delete(handlers::delete_user),
            )
            .route(
                "/api/categories",
                get(handlers::list_categories).post(handlers::create_category),
            )
            .route(
                "/api/categories/{id}",
                axum::routing::put(handlers::update_category).delete(handlers::delete_category),
            )
            .route(
                "/api/tags",
                get(handlers::list_tags).post(handlers::create_tag),
            )
            .route(
                "/api/tags/{id}",
                axum::routing::put(handlers::update_tag).delete(handlers::delete_tag),
            )
            .route(
                "/api/senders",
                get(handlers::list_senders).post(handlers::create_sender),
            )
            .route(
                "/api/senders/{id}",
                axum::routing::put(handlers::update_sender).delete(handlers::delete_sender),
            )
            .route(
                "/api/incoming-mails",
                get(handlers::list_incoming_mails).post(handlers::create_incoming_mail),
            )
            .route(
                "/api/incoming-mails/{id}",
                axum::routing::put(handlers::update_incoming_mail)
                    .delete(handlers::delete_incoming_mail),
            )
            .route(
                "/api/outgoing-mails",
                get(handlers::list_outgoing_mails).post(handlers::create_outgoing_mail),
            )
            .route(
                "/api/outgoing-mails/{id}",
                axum::routing::put(handlers::update_outgoing_mail)
                    .delete(handlers::delete_outgoing_mail),
            )
            .route("/api/search", post(handlers::search_mails))
            .route("/api/statistics", get(handlers::get_statistics))
            .route(
                "/api/settings",
                get(handlers::get_settings).put(handlers::update_settings),
            )
            .with_state(self.state.clone())
            .layer(axum_middleware::from_fn_with_state(
                jwt_state.clone(),
                middleware::require_auth,
            ));

        let api_router = public_router.merge(protected_router);

        // SwaggerUi automatically creates a route for /api/openapi.json
        let router = Router::new()
            .merge(SwaggerUi::new("/swagger-ui").url("/api/openapi.json", api_doc))
            .merge(api_router);

        let cors = if self.config.enable_cors {
            use tower_http::cors::AllowOrigin;

            let cors_layer = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_origin(AllowOrigin::predicate(|origin: &HeaderValue, _| {
                    // Allow common development origins
                    let origin_str = origin.to_str().unwrap_or("");
                    origin_str.starts_with("http://localhost:")
                        || origin_str.starts_with("http://127.0.0.1:")
                        || origin_str.starts_with("https://localhost:")
                        || origin_str.starts_with("https://127.0.0.1:")
                }));

            Some(cors_layer)
        } else {
            None
        };

        let mut router = router
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.config.request_timeout));

        if let Some(cors) = cors {
            router = router.layer(cors);
        }

        router
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let bind_addr = self.config.bind_addr;
        let router = self.build_router();

        info!("Starting API server on {}", bind_addr);
        info!("OpenAPI spec: http://{}/api/openapi.json", bind_addr);
        info!("Swagger UI: http://{}/swagger-ui", bind_addr);

        let listener = tokio::net::TcpListener::bind(bind_addr).await?;

        axum::serve(listener, router)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        // Ensure OpenAPI spec can be generated without panics
        let _api_doc = ApiDoc::openapi();
    }
}
