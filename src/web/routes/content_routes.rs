use axum::{
    Json, Router,
    extract::{Extension, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;

use crate::db::services::{content_service, share_service};
use crate::web::{
    AppState,
    error::AppError,
    models::{
        ApiResponse, AuthenticatedUser, ContentResponse, CreateContentRequest,
        DeleteContentRequest, ListContentQuery, ShareLinkResponse, ShareToggleRequest,
    },
};

pub fn create_content_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/all", get(list_content_handler))
        .route("/deleted", get(list_deleted_handler))
        .route("/create", post(create_content_handler))
        .route("/delete", post(delete_content_handler))
        .route("/share", post(share_toggle_handler))
}

async fn list_content_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<ListContentQuery>,
) -> Result<impl IntoResponse, AppError> {
    let contents = content_service::list_active(&app_state.db, auth_user.id, query.content_type)
        .await?
        .into_iter()
        .map(|(content, tags)| ContentResponse::from_active(content, tags))
        .collect::<Vec<_>>();

    Ok(Json(ApiResponse::new(
        "contents fetched successfully",
        contents,
    )))
}

async fn list_deleted_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let contents = content_service::list_deleted(&app_state.db, auth_user.id)
        .await?
        .into_iter()
        .map(|(content, tags)| ContentResponse::from_deleted(content, tags))
        .collect::<Vec<_>>();

    Ok(Json(ApiResponse::new(
        "contents fetched successfully",
        contents,
    )))
}

async fn create_content_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateContentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (content, tags) = app_state
        .ingestor
        .ingest(&app_state.db, auth_user.id, payload)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            "New content created successfully",
            ContentResponse::from_active(content, tags),
        )),
    ))
}

async fn delete_content_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<DeleteContentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = content_service::soft_delete(&app_state.db, auth_user.id, payload.content_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Content not found".to_string()))?;

    let (content, tags) = deleted;
    Ok(Json(ApiResponse::new(
        "Content deleted successfully",
        ContentResponse::from_deleted(content, tags),
    )))
}

async fn share_toggle_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ShareToggleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let link = share_service::set_shareable(&app_state.db, auth_user.id, payload.shareable).await?;

    Ok(Json(ApiResponse::new(
        "Shareable link updated",
        ShareLinkResponse {
            link_hash: link.hash,
        },
    )))
}
