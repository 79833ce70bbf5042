//! `/api/forms*`: the designer's owner-scoped form management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use snapform_db::{FormStatus, FormUpdate, NewForm};
use snapform_forms::designer::{validate_form_update, validate_new_form};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, CurrentUser};
use crate::pagination::{PageQuery, Pagination};
use crate::state::AppState;

const FORM_NOT_FOUND: &str = "Form not found";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/forms", get(handle_list).post(handle_create))
        .route(
            "/api/forms/{id}",
            get(handle_detail).put(handle_update).delete(handle_delete),
        )
        .route("/api/forms/{id}/publish", put(handle_publish))
        .route("/api/forms/{id}/duplicate", post(handle_duplicate))
        .route("/api/forms/{id}/responses", get(handle_responses))
}

#[derive(Debug, Deserialize)]
struct FormListQuery {
    status: Option<String>,
    page: Option<usize>,
    limit: Option<usize>,
}

/// Rejects a theme the user can neither own nor see.
async fn check_theme(state: &AppState, user_id: &str, theme_id: Option<&str>) -> ApiResult<()> {
    let Some(theme_id) = theme_id else {
        return Ok(());
    };
    match state.store.get_theme(theme_id).await? {
        Some(theme) if theme.is_visible_to(Some(user_id)) => Ok(()),
        _ => Err(ApiError::bad_request("Theme not found")),
    }
}

/// `GET /api/forms` - the user's forms, most recently updated first.
async fn handle_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<FormListQuery>,
) -> ApiResult<impl IntoResponse> {
    // Unknown status values list every form.
    let status = query
        .status
        .as_deref()
        .and_then(|s| s.parse::<FormStatus>().ok());
    let page = state.page(query.page, query.limit);
    let result = state.store.list_forms(&user.id, status, page).await?;
    Ok(Json(json!({
        "forms": result.items,
        "pagination": Pagination::new(result.total, page),
    })))
}

/// `POST /api/forms` - create a form with its fields.
async fn handle_create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(new): ApiJson<NewForm>,
) -> ApiResult<impl IntoResponse> {
    validate_new_form(&new)?;
    check_theme(&state, &user.id, new.theme_id.as_deref()).await?;
    let form = state.store.create_form(&user.id, new).await?;
    tracing::info!(form_id = %form.form.id, user_id = %user.id, "Form created");
    Ok((StatusCode::CREATED, Json(form)))
}

async fn handle_detail(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let form = state
        .store
        .get_form(&user.id, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(FORM_NOT_FOUND))?;
    Ok(Json(form))
}

/// `PUT /api/forms/{id}` - scalar changes plus `_action` field operations.
async fn handle_update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<FormUpdate>,
) -> ApiResult<impl IntoResponse> {
    validate_form_update(&update)?;
    if let Some(theme_id) = &update.theme_id {
        check_theme(&state, &user.id, theme_id.as_deref()).await?;
    }
    let form = state
        .store
        .update_form(&user.id, &id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(FORM_NOT_FOUND))?;
    Ok(Json(form))
}

async fn handle_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if !state.store.delete_form(&user.id, &id).await? {
        return Err(ApiError::not_found(FORM_NOT_FOUND));
    }
    tracing::info!(form_id = %id, "Form deleted");
    Ok(Json(json!({ "success": true })))
}

/// `PUT /api/forms/{id}/publish` - make the form accept responses.
async fn handle_publish(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let form = state
        .store
        .publish_form(&user.id, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(FORM_NOT_FOUND))?;
    Ok(Json(json!({
        "success": true,
        "message": "Form published successfully",
        "data": form,
    })))
}

/// `POST /api/forms/{id}/duplicate` - copy the form as a new draft.
async fn handle_duplicate(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let copy = state
        .store
        .duplicate_form(&user.id, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(FORM_NOT_FOUND))?;
    Ok(Json(json!({
        "success": true,
        "message": "Form duplicated successfully",
        "data": copy,
    })))
}

/// `GET /api/forms/{id}/responses` - responses newest first, answers keyed by label.
async fn handle_responses(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    if state.store.get_form(&user.id, &id).await?.is_none() {
        return Err(ApiError::not_found(FORM_NOT_FOUND));
    }
    let page = state.page(query.page, query.limit);
    let result = state.store.list_responses(&id, page).await?;
    Ok(Json(json!({
        "responses": result.items,
        "pagination": Pagination::new(result.total, page),
    })))
}
