use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;

use crate::services::auth_service;
use crate::web::{
    AppState,
    error::AppError,
    models::{ApiResponse, LoginRequest, RegisterRequest},
};

pub fn create_auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/signin", post(signin_handler))
}

async fn signup_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = auth_service::register_user(&app_state.db, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("User created successfully", user)),
    ))
}

async fn signin_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let login =
        auth_service::login_user(&app_state.db, payload, &app_state.config.jwt_secret).await?;

    let auth_cookie = Cookie::build(("token", login.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();

    let mut response = Json(ApiResponse::new("User signed in successfully", login)).into_response();
    response.headers_mut().insert(
        axum::http::header::SET_COOKIE,
        auth_cookie
            .to_string()
            .parse()
            .map_err(|_| AppError::InternalServerError("invalid cookie header".to_string()))?,
    );

    Ok(response)
}
