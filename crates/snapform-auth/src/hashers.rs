//! Password hashing.
//!
//! Hashing and verification are CPU-bound, so both run on the blocking pool
//! through `tokio::task::spawn_blocking`.

use async_trait::async_trait;
use snapform_core::SnapformError;

/// A password hashing backend.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Returns the algorithm identifier.
    fn algorithm(&self) -> &str;

    /// Hashes a password into a self-describing encoded string.
    async fn hash(&self, password: &str) -> Result<String, SnapformError>;

    /// Returns `true` if `password` matches the encoded `hash`.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, SnapformError>;
}

/// Argon2id with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Hasher;

#[async_trait]
impl PasswordHasher for Argon2Hasher {
    fn algorithm(&self) -> &'static str {
        "argon2"
    }

    async fn hash(&self, password: &str) -> Result<String, SnapformError> {
        let password = password.to_string();
        tokio::task::spawn_blocking(move || {
            use argon2::password_hash::{rand_core::OsRng, PasswordHasher as _, SaltString};
            use argon2::Argon2;

            let salt = SaltString::generate(&mut OsRng);
            let hash = Argon2::default()
                .hash_password(password.as_bytes(), &salt)
                .map_err(|e| SnapformError::InternalServerError(format!("Argon2 hash error: {e}")))?;
            Ok(hash.to_string())
        })
        .await
        .map_err(|e| SnapformError::InternalServerError(format!("Task join error: {e}")))?
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, SnapformError> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || {
            use argon2::password_hash::{PasswordHash, PasswordVerifier};
            use argon2::Argon2;

            let parsed = PasswordHash::new(&hash)
                .map_err(|e| SnapformError::InternalServerError(format!("Invalid hash: {e}")))?;
            Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok())
        })
        .await
        .map_err(|e| SnapformError::InternalServerError(format!("Task join error: {e}")))?
    }
}
