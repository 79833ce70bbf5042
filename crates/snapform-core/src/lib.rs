//! # snapform-core
//!
//! Core error types, settings, and logging shared by every snapform crate.
//! This crate depends on no other snapform crate.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Server, database, and session configuration
//! - [`settings_loader`] - Loading settings from TOML files and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{SnapformError, SnapformResult, ValidationError};
pub use settings::Settings;
