//! Route tables, one module per API area.

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod forms;
pub mod profile;
pub mod public;
pub mod themes;

/// Every `/api` route.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::routes())
        .merge(profile::routes())
        .merge(public::routes())
        .merge(forms::routes())
        .merge(themes::routes())
}
