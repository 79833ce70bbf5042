//! `/api/themes*`: theme library management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use snapform_db::{NewTheme, Theme, ThemeUpdate};
use snapform_forms::theme::{validate_new_theme, validate_theme_update};

use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, CurrentUser, MaybeUser};
use crate::pagination::Pagination;
use crate::state::AppState;

const THEME_NOT_FOUND: &str = "Theme not found";
const THEME_IN_USE: &str =
    "This theme is currently in use by forms. Update the forms to use another theme before deleting.";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/themes", get(handle_list).post(handle_create))
        .route("/api/themes/default", get(handle_available))
        .route(
            "/api/themes/{id}",
            get(handle_detail).put(handle_update).delete(handle_delete),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeListQuery {
    include_public: Option<String>,
    page: Option<usize>,
    limit: Option<usize>,
}

async fn load_theme(state: &AppState, id: &str) -> ApiResult<Theme> {
    state
        .store
        .get_theme(id)
        .await?
        .ok_or_else(|| ApiError::not_found(THEME_NOT_FOUND))
}

/// `GET /api/themes` - own themes, plus public ones with `includePublic=true`.
async fn handle_list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<ThemeListQuery>,
) -> ApiResult<impl IntoResponse> {
    let include_public = query.include_public.as_deref() == Some("true");
    let page = state.page(query.page, query.limit);
    let result = state.store.list_themes(&user.id, include_public, page).await?;
    Ok(Json(json!({
        "themes": result.items,
        "pagination": Pagination::new(result.total, page),
    })))
}

async fn handle_create(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(new): ApiJson<NewTheme>,
) -> ApiResult<impl IntoResponse> {
    validate_new_theme(&new)?;
    let theme = state.store.create_theme(&user.id, new).await?;
    tracing::info!(theme_id = %theme.id, user_id = %user.id, "Theme created");
    Ok((StatusCode::CREATED, Json(theme)))
}

/// `GET /api/themes/default` - every public theme followed by the user's own.
async fn handle_available(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<impl IntoResponse> {
    let themes = state.store.available_themes(&user.id).await?;
    Ok(Json(json!({ "themes": themes })))
}

/// `GET /api/themes/{id}` - public themes for anyone, private ones for their owner.
async fn handle_detail(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let theme = load_theme(&state, &id).await?;
    if !theme.is_visible_to(user.as_ref().map(|u| u.id.as_str())) {
        return Err(ApiError::forbidden("Unauthorized access to theme"));
    }
    Ok(Json(theme))
}

async fn handle_update(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ThemeUpdate>,
) -> ApiResult<impl IntoResponse> {
    let theme = load_theme(&state, &id).await?;
    if !theme.is_owned_by(&user.id) {
        return Err(ApiError::forbidden("You don't have permission to update this theme"));
    }
    validate_theme_update(&update)?;
    let theme = state
        .store
        .update_theme(&id, update)
        .await?
        .ok_or_else(|| ApiError::not_found(THEME_NOT_FOUND))?;
    Ok(Json(theme))
}

/// `DELETE /api/themes/{id}` - refused while any form still uses the theme.
async fn handle_delete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let theme = load_theme(&state, &id).await?;
    if !theme.is_owned_by(&user.id) {
        return Err(ApiError::forbidden("You don't have permission to delete this theme"));
    }
    let in_use = state.store.count_forms_using_theme(&id).await?;
    if in_use > 0 {
        return Err(ApiError(snapform_core::SnapformError::Conflict(THEME_IN_USE.to_string())));
    }
    state.store.delete_theme(&id).await?;
    tracing::info!(theme_id = %id, "Theme deleted");
    Ok(Json(json!({ "success": "Theme deleted successfully" })))
}
