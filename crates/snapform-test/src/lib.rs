//! # snapform-test
//!
//! Testing support for snapform. Provides [`TestClient`] for driving the JSON
//! API in-process, and fixtures that build a fresh application over an
//! in-memory SQLite store.
//!
//! ## Modules
//!
//! - [`client`] - [`TestClient`] and [`TestResponse`]
//! - [`fixtures`] - In-memory [`AppState`](snapform_http::AppState) builders and account helpers

pub mod client;
pub mod fixtures;

pub use client::{TestClient, TestResponse};
pub use fixtures::{sign_up, signed_in_client, test_app, test_settings, test_state, PlainTextHasher, TEST_PASSWORD};
