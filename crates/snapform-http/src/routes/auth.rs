//! `/api/auth/*`: sign-up, login, logout.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;
use snapform_auth::{LoginRequest, SignupRequest};

use crate::error::ApiResult;
use crate::extract::{ApiJson, BearerToken};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(handle_signup))
        .route("/api/auth/login", post(handle_login))
        .route("/api/auth/logout", post(handle_logout))
}

/// `POST /api/auth/signup` - create an account and open a session.
async fn handle_signup(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    let session = state.auth.signup(request).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /api/auth/login` - exchange credentials for a bearer token.
async fn handle_login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let session = state.auth.login(request).await?;
    Ok(Json(session))
}

/// `POST /api/auth/logout` - end the session behind the bearer token.
async fn handle_logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> ApiResult<impl IntoResponse> {
    state.auth.logout(&token).await?;
    Ok(Json(json!({ "success": true })))
}
