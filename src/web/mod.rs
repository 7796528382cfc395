use axum::{
    Router,
    http::Method,
    middleware as axum_middleware,
    routing::get,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::ingest::ContentIngestor;
use crate::server::config::ServerConfig;
use crate::services::auth_service;

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

use routes::{auth_routes, content_routes, share_routes};

pub struct AppState {
    pub db: DatabaseConnection,
    pub ingestor: Arc<ContentIngestor>,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(
    db: DatabaseConnection,
    ingestor: Arc<ContentIngestor>,
    config: Arc<ServerConfig>,
) -> Router {
    let app_state = Arc::new(AppState {
        db,
        ingestor,
        config,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .route(
            "/api/auth/me",
            get(auth_service::me).route_layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                middleware::auth::auth,
            )),
        )
        .nest("/api/auth", auth_routes::create_auth_router())
        .nest(
            "/api/content",
            content_routes::create_content_router().route_layer(
                axum_middleware::from_fn_with_state(app_state.clone(), middleware::auth::auth),
            ),
        )
        .nest("/api/brain", share_routes::create_share_router())
        .with_state(app_state)
        .layer(cors)
}
