//! Account operations over a [`FormStore`].

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use snapform_core::{SnapformError, SnapformResult};
use snapform_db::{FormStore, NewUser, User};

use crate::hashers::{Argon2Hasher, PasswordHasher};
use crate::tokens::{generate_token, hash_token};
use crate::validators::{LoginRequest, PasswordChange, ProfileUpdate, SignupRequest};

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// A freshly issued session.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn FormStore>,
    hasher: Arc<dyn PasswordHasher>,
    session_ttl: Duration,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("hasher", &self.hasher.algorithm())
            .field("session_ttl", &self.session_ttl)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    /// Argon2 hashing and sessions that live `session_ttl_hours`.
    pub fn new(store: Arc<dyn FormStore>, session_ttl_hours: i64) -> Self {
        Self::with_hasher(store, Arc::new(Argon2Hasher), session_ttl_hours)
    }

    pub fn with_hasher(
        store: Arc<dyn FormStore>,
        hasher: Arc<dyn PasswordHasher>,
        session_ttl_hours: i64,
    ) -> Self {
        Self {
            store,
            hasher,
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    /// Creates an account without opening a session.
    pub async fn create_user(&self, request: SignupRequest) -> SnapformResult<User> {
        request.validate()?;
        let password_hash = self.hasher.hash(&request.password).await?;
        let name = request
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        let user = self
            .store
            .create_user(NewUser {
                name,
                email: request.email.trim().to_string(),
                password_hash,
            })
            .await?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user)
    }

    /// Creates an account and logs it in.
    pub async fn signup(&self, request: SignupRequest) -> SnapformResult<AuthSession> {
        let user = self.create_user(request).await?;
        self.open_session(user).await
    }

    pub async fn login(&self, request: LoginRequest) -> SnapformResult<AuthSession> {
        let user = self
            .store
            .find_user_by_email(request.email.trim())
            .await?
            .ok_or_else(|| SnapformError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;
        if !self.hasher.verify(&request.password, &user.password_hash).await? {
            tracing::warn!(user_id = %user.id, "Failed login");
            return Err(SnapformError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        self.open_session(user).await
    }

    async fn open_session(&self, user: User) -> SnapformResult<AuthSession> {
        let token = generate_token();
        let expires_at = Utc::now() + self.session_ttl;
        self.store
            .create_session(hash_token(&token), &user.id, expires_at)
            .await?;
        tracing::debug!(user_id = %user.id, %expires_at, "Session opened");
        Ok(AuthSession { token, user })
    }

    pub async fn logout(&self, token: &str) -> SnapformResult<()> {
        self.store.delete_session(&hash_token(token)).await
    }

    /// Returns the user behind an unexpired bearer token.
    pub async fn authenticate(&self, token: &str) -> SnapformResult<Option<User>> {
        self.store.session_user(&hash_token(token), Utc::now()).await
    }

    pub async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> SnapformResult<User> {
        update.validate()?;
        self.store
            .update_user_profile(
                user_id,
                Some(update.name.trim().to_string()),
                update.email.trim().to_string(),
            )
            .await?
            .ok_or_else(|| SnapformError::NotFound("User not found".to_string()))
    }

    pub async fn change_password(&self, user_id: &str, change: PasswordChange) -> SnapformResult<()> {
        change.validate()?;
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| SnapformError::NotFound("User not found".to_string()))?;
        if !self
            .hasher
            .verify(&change.current_password, &user.password_hash)
            .await?
        {
            return Err(SnapformError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }
        let hash = self.hasher.hash(&change.new_password).await?;
        self.store.set_password_hash(user_id, hash).await?;
        tracing::info!(user_id, "Password changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use snapform_db::SqliteStore;

    /// Fast reversible stand-in for tests.
    struct PlainHasher;

    #[async_trait]
    impl PasswordHasher for PlainHasher {
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

    async fn service() -> AuthService {
        let store = SqliteStore::memory().unwrap();
        store.migrate().await.unwrap();
        AuthService::with_hasher(Arc::new(store), Arc::new(PlainHasher), 168)
    }

    fn signup(email: &str) -> SignupRequest {
        SignupRequest {
            name: Some(" Ada ".into()),
            email: email.into(),
            password: "password123".into(),
        }
    }

    #[tokio::test]
    async fn test_signup_then_authenticate() {
        let auth = service().await;
        let session = auth.signup(signup("ada@example.com")).await.unwrap();
        assert_eq!(session.user.name.as_deref(), Some("Ada"));

        let user = auth.authenticate(&session.token).await.unwrap().unwrap();
        assert_eq!(user.id, session.user.id);
        assert!(auth.authenticate("bogus").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let auth = service().await;
        auth.signup(signup("ada@example.com")).await.unwrap();
        let err = auth.signup(signup("ada@example.com")).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_login_and_logout() {
        let auth = service().await;
        auth.signup(signup("ada@example.com")).await.unwrap();

        let bad = auth
            .login(LoginRequest {
                email: "ada@example.com".into(),
                password: "nope-nope".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(bad.to_string(), INVALID_CREDENTIALS);

        let session = auth
            .login(LoginRequest {
                email: "ada@example.com".into(),
                password: "password123".into(),
            })
            .await
            .unwrap();
        auth.logout(&session.token).await.unwrap();
        assert!(auth.authenticate(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_ignored() {
        let store = SqliteStore::memory().unwrap();
        store.migrate().await.unwrap();
        let auth = AuthService::with_hasher(Arc::new(store), Arc::new(PlainHasher), -1);
        let session = auth.signup(signup("ada@example.com")).await.unwrap();
        assert!(auth.authenticate(&session.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_change_password() {
        let auth = service().await;
        let session = auth.signup(signup("ada@example.com")).await.unwrap();
        let user_id = session.user.id;

        let wrong = PasswordChange {
            current_password: "not-the-password".into(),
            new_password: "brand-new-pw".into(),
            confirm_password: "brand-new-pw".into(),
        };
        let err = auth.change_password(&user_id, wrong).await.unwrap_err();
        assert_eq!(err.to_string(), "Current password is incorrect");

        let change = PasswordChange {
            current_password: "password123".into(),
            new_password: "brand-new-pw".into(),
            confirm_password: "brand-new-pw".into(),
        };
        auth.change_password(&user_id, change).await.unwrap();
        auth.login(LoginRequest {
            email: "ada@example.com".into(),
            password: "brand-new-pw".into(),
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_update_profile_email_taken() {
        let auth = service().await;
        auth.signup(signup("ada@example.com")).await.unwrap();
        let bob = auth.signup(signup("bob@example.com")).await.unwrap();

        let err = auth
            .update_profile(
                &bob.user.id,
                ProfileUpdate {
                    name: "Bob".into(),
                    email: "ada@example.com".into(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already in use");

        let user = auth
            .update_profile(
                &bob.user.id,
                ProfileUpdate {
                    name: "Bobby".into(),
                    email: "bobby@example.com".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(user.email, "bobby@example.com");
    }
}
