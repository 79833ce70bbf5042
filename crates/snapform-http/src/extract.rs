//! Request extractors: the authenticated user and JSON bodies.

use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use snapform_auth::bearer_token;
use snapform_core::SnapformError;
use snapform_db::User;

use crate::error::ApiError;
use crate::state::AppState;

fn token_from(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
}

async fn resolve_user(parts: &Parts, state: &AppState) -> Result<Option<User>, ApiError> {
    match token_from(parts) {
        Some(token) => Ok(state.auth.authenticate(token).await?),
        None => Ok(None),
    }
}

/// The user behind a valid bearer token. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state)
            .await?
            .map(Self)
            .ok_or_else(|| ApiError(SnapformError::Unauthorized("Unauthorized".to_string())))
    }
}

/// The user behind a bearer token, if any.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_user(parts, state).await.map(Self)
    }
}

/// The bearer token itself, for logout.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from(parts)
            .map(|token| Self(token.to_string()))
            .ok_or_else(|| ApiError(SnapformError::Unauthorized("Unauthorized".to_string())))
    }
}

/// A JSON body whose rejections use the API's `{ "error": ... }` shape.
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}
