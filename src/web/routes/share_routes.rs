use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;

use crate::db::services::share_service;
use crate::web::{
    AppState,
    error::AppError,
    models::{ApiResponse, ContentResponse, ShareViewResponse},
};

/// Public read-only access to a published collection. No auth layer: the
/// hash token is the capability.
pub fn create_share_router() -> Router<Arc<AppState>> {
    Router::new().route("/{hash}", get(resolve_share_handler))
}

async fn resolve_share_handler(
    State(app_state): State<Arc<AppState>>,
    Path(hash): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = share_service::resolve_share(&app_state.db, &hash)
        .await?
        .map(|(link, owner, contents)| ShareViewResponse {
            hash: link.hash,
            user: owner.into(),
            contents: contents
                .into_iter()
                .map(|(content, tags)| ContentResponse::from_active(content, tags))
                .collect(),
        });

    // An unknown hash and an unpublished link look identical to the caller.
    Ok(Json(ApiResponse::new("Data retrieved successfully", view)))
}
