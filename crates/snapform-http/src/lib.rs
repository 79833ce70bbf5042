//! # snapform-http
//!
//! The snapform JSON API on axum.
//!
//! ## Modules
//!
//! - [`state`] - [`AppState`] shared by every handler
//! - [`error`] - [`ApiError`] and its JSON rendering
//! - [`extract`] - Bearer-token user extractors and JSON bodies
//! - [`pagination`] - List pagination metadata
//! - [`gateway`] - [`LocalGateway`], the in-process form gateway
//! - [`routes`] - Route tables per API area

pub mod error;
pub mod extract;
pub mod gateway;
pub mod pagination;
pub mod routes;
pub mod state;

use axum::body::Body;
use axum::Router;
use http::{HeaderValue, Request};
use snapform_core::logging::request_span;
use snapform_core::SnapformResult;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ApiResult};
pub use gateway::LocalGateway;
pub use state::AppState;

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.allowed_origins);
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
        let id = uuid::Uuid::new_v4().to_string();
        request_span(&id, req.method().as_str(), req.uri().path())
    });
    routes::api_routes()
        .layer(ServiceBuilder::new().layer(trace).layer(cors))
        .with_state(state)
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn serve(state: AppState) -> SnapformResult<()> {
    let address = state.settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, "Listening");
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Shutting down");
        })
        .await?;
    Ok(())
}
