//! Mapping of [`SnapformError`] onto JSON error responses.
//!
//! Every error body has an `error` message. Missing required fields add
//! `missingRequiredFields`; validation failures add per-field `errors`.
//! Server-side failures are logged and answered with a generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use snapform_core::{SnapformError, ValidationError};

/// Handler error type.
#[derive(Debug)]
pub struct ApiError(pub SnapformError);

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(SnapformError::NotFound(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(SnapformError::PermissionDenied(message.into()))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(SnapformError::BadRequest(message.into()))
    }

    pub fn body(&self) -> Value {
        match &self.0 {
            SnapformError::MissingRequiredFields { message, field_ids } => json!({
                "error": message,
                "missingRequiredFields": field_ids,
            }),
            SnapformError::ValidationError(err) => validation_body(err),
            err if err.is_server_error() => json!({ "error": "Internal server error" }),
            err => json!({ "error": err.to_string() }),
        }
    }
}

fn validation_body(err: &ValidationError) -> Value {
    let message = if err.message.is_empty() {
        err.field_errors
            .values()
            .flatten()
            .next()
            .cloned()
            .unwrap_or_else(|| "Invalid input".to_string())
    } else {
        err.message.clone()
    };
    json!({ "error": message, "errors": err.field_errors })
}

impl From<SnapformError> for ApiError {
    fn from(err: SnapformError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(SnapformError::ValidationError(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }
        (status, Json(self.body())).into_response()
    }
}
