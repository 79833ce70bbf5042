//! # snapform-auth
//!
//! Accounts for snapform.
//!
//! ## Modules
//!
//! - [`hashers`] - Argon2id password hashing on the blocking pool
//! - [`tokens`] - Bearer token generation and digests
//! - [`validators`] - Sign-up, profile, and password-change rules
//! - [`service`] - [`AuthService`], account operations over a store

pub mod hashers;
pub mod service;
pub mod tokens;
pub mod validators;

pub use hashers::{Argon2Hasher, PasswordHasher};
pub use service::{AuthService, AuthSession};
pub use tokens::{bearer_token, generate_token, hash_token};
pub use validators::{LoginRequest, PasswordChange, ProfileUpdate, SignupRequest};
