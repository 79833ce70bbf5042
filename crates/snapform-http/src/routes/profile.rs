//! `/api/profile*`: the signed-in user's account.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use serde_json::{json, Value};
use snapform_auth::{PasswordChange, ProfileUpdate};
use snapform_db::User;

use crate::error::ApiResult;
use crate::extract::{ApiJson, CurrentUser};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile", get(handle_profile))
        .route("/api/profile/update", patch(handle_update_profile))
        .route("/api/profile/password", patch(handle_change_password))
}

fn profile_json(user: &User) -> Value {
    let mut value = serde_json::to_value(user).unwrap_or_default();
    if let Some(map) = value.as_object_mut() {
        map.insert("role".to_string(), json!("user"));
    }
    value
}

async fn handle_profile(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(json!({ "user": profile_json(&user) }))
}

async fn handle_update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> ApiResult<impl IntoResponse> {
    let user = state.auth.update_profile(&user.id, update).await?;
    Ok(Json(json!({
        "message": "Profile updated successfully",
        "user": profile_json(&user),
    })))
}

async fn handle_change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(change): ApiJson<PasswordChange>,
) -> ApiResult<impl IntoResponse> {
    state.auth.change_password(&user.id, change).await?;
    Ok(Json(json!({ "message": "Password updated successfully" })))
}
