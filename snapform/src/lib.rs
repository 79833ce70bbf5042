//! # snapform
//!
//! A multi-tenant form builder: accounts design forms, publish them, and
//! collect responses from anonymous respondents.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on
//! `snapform` for everything, or on individual crates for finer control.

/// Error types, settings, and logging.
pub use snapform_core as core;

/// Data model, the `FormStore` trait, and the SQLite store.
pub use snapform_db as db;

/// Form filling, intake rules, theming, designer drafts, and CSV export.
pub use snapform_forms as forms;

/// Password hashing and session tokens.
pub use snapform_auth as auth;

/// The JSON API on axum.
#[cfg(feature = "http")]
pub use snapform_http as http;

/// Management commands.
#[cfg(feature = "cli")]
pub use snapform_cli as cli;

/// In-process API client and fixtures.
#[cfg(feature = "testing")]
pub use snapform_test as test;

/// Commonly used items.
pub mod prelude {
    pub use snapform_core::{Settings, SnapformError, SnapformResult, ValidationError};
    pub use snapform_db::{
        Field, FieldKind, Form, FormStatus, FormStore, PublicForm, SqliteStore, Theme,
    };
    pub use snapform_forms::{
        FieldKey, FieldValue, FormDraft, FormGateway, FormSession, SubmissionPayload,
    };

    #[cfg(feature = "http")]
    pub use snapform_http::{build_router, AppState, LocalGateway};

    // Third-party re-exports
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}

pub use axum;
pub use chrono;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tracing;
