//! In-memory application fixtures.
//!
//! Every call builds a fresh migrated SQLite database with the system themes
//! seeded, so tests never share state.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use snapform_auth::{AuthService, AuthSession, PasswordHasher, SignupRequest};
use snapform_core::{Settings, SnapformError};
use snapform_db::{FormStore, SqliteStore};
use snapform_http::{build_router, AppState};

use crate::client::TestClient;

/// Password used by [`signed_in_client`].
pub const TEST_PASSWORD: &str = "password123";

/// Stores passwords in clear text behind a `plain$` prefix.
///
/// Test use only.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextHasher;

#[async_trait]
impl PasswordHasher for PlainTextHasher {
    fn algorithm(&self) -> &'static str {
        "plain"
    }

    async fn hash(&self, password: &str) -> Result<String, SnapformError> {
        Ok(format!("plain${password}"))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, SnapformError> {
        Ok(hash.strip_prefix("plain$") == Some(password))
    }
}

/// Settings for an in-memory database.
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.database.path = ":memory:".to_string();
    settings
}

/// A fresh application state over an in-memory store.
///
/// # Panics
///
/// Panics if the in-memory database cannot be created or migrated.
pub async fn test_state() -> AppState {
    let settings = test_settings();
    let store = SqliteStore::memory().expect("Failed to create in-memory SQLite database");
    store.migrate().await.expect("Failed to migrate test database");
    store
        .seed_system_themes()
        .await
        .expect("Failed to seed system themes");

    let store: Arc<dyn FormStore> = Arc::new(store);
    let auth = AuthService::with_hasher(
        store.clone(),
        Arc::new(PlainTextHasher),
        settings.session_ttl_hours,
    );
    AppState::new(store, settings).with_auth(auth)
}

/// The full router over a fresh [`test_state`].
pub async fn test_app() -> Router {
    build_router(test_state().await)
}

/// Signs up `email` directly through the account service.
///
/// # Panics
///
/// Panics if sign-up fails, e.g. because the email is already taken.
pub async fn sign_up(state: &AppState, email: &str) -> AuthSession {
    state
        .auth
        .signup(SignupRequest {
            name: Some("Test User".to_string()),
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
        })
        .await
        .expect("test sign-up should succeed")
}

/// A client for `state`'s router, already carrying a fresh account's token.
pub async fn signed_in_client(state: &AppState, email: &str) -> (TestClient, AuthSession) {
    let session = sign_up(state, email).await;
    let mut client = TestClient::new(build_router(state.clone()));
    client.set_token(session.token.clone());
    (client, session)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_hasher() {
        let hasher = PlainTextHasher;
        let hash = hasher.hash("secret").await.unwrap();
        assert!(hasher.verify("secret", &hash).await.unwrap());
        assert!(!hasher.verify("other", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_state_is_seeded() {
        let state = test_state().await;
        let session = sign_up(&state, "seed@example.com").await;
        let themes = state.store.available_themes(&session.user.id).await.unwrap();
        assert!(!themes.is_empty());
    }

    #[tokio::test]
    async fn test_signed_in_client_reaches_protected_routes() {
        let state = test_state().await;
        let (mut client, _) = signed_in_client(&state, "client@example.com").await;
        assert_eq!(client.get("/api/forms").await.status_code(), 200);

        client.clear_token();
        assert_eq!(client.get("/api/forms").await.status_code(), 401);
    }
}
