//! Respondent-facing endpoints. None of them require a session.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use snapform_forms::{FormGateway, SubmissionPayload};

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::gateway::LocalGateway;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/public-forms/{id}", get(handle_public_form))
        .route("/api/public-forms/{id}/basic", get(handle_public_form_basic))
        .route("/api/forms/{id}/submit", post(handle_submit))
}

/// `GET /api/public-forms/{id}` - an active form with ordered fields and theme.
async fn handle_public_form(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let form = LocalGateway::new(state.store.clone()).fetch_form(&id).await?;
    Ok(Json(form))
}

/// `GET /api/public-forms/{id}/basic` - name, description and theme in any status.
async fn handle_public_form_basic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let basic = state
        .store
        .get_form_basic(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Form not found"))?;
    Ok(Json(basic))
}

/// `POST /api/forms/{id}/submit` - record a response.
async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<SubmissionPayload>,
) -> ApiResult<impl IntoResponse> {
    let receipt = LocalGateway::new(state.store.clone())
        .submit(&id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}
