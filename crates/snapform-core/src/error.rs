//! Core error types for snapform.
//!
//! [`SnapformError`] covers HTTP-facing failures, storage failures, validation
//! failures, and configuration problems. Every variant maps to an HTTP status
//! code via [`SnapformError::status_code`], which the HTTP layer uses when
//! turning an error into a JSON response.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// A validation error with optional per-field messages.
///
/// Simple errors carry a single message; compound errors carry messages keyed
/// by field name (for example `"name"` or `"fields[2].label"`).
///
/// # Examples
///
/// ```
/// use snapform_core::error::ValidationError;
///
/// let err = ValidationError::new("Form name must be at least 3 characters", "min_length");
/// assert_eq!(err.to_string(), "Form name must be at least 3 characters");
///
/// let err = ValidationError::default()
///     .with_field_error("primaryColor", "Invalid hex color");
/// assert!(err.to_string().contains("primaryColor: Invalid hex color"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    /// The primary error message.
    pub message: String,
    /// A short code identifying the failure (e.g. "required", "invalid").
    pub code: String,
    /// Per-field messages, keyed by field name.
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a message and code.
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Adds a message for the given field.
    #[must_use]
    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.push(field, message);
        self
    }

    /// Adds a message for the given field in place.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Returns `true` if there is neither a message nor any field error.
    pub fn is_empty(&self) -> bool {
        self.message.is_empty() && self.field_errors.is_empty()
    }

    /// Returns `Ok(())` when empty, otherwise this error.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            return write!(f, "{}", self.message);
        }
        let mut first = true;
        for (field, messages) in &self.field_errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// The primary error type for snapform.
#[derive(Error, Debug)]
pub enum SnapformError {
    // ── HTTP errors ──────────────────────────────────────────────────

    /// HTTP 400 Bad Request.
    #[error("{0}")]
    BadRequest(String),

    /// HTTP 401 Unauthorized.
    #[error("{0}")]
    Unauthorized(String),

    /// HTTP 403 Forbidden.
    #[error("{0}")]
    PermissionDenied(String),

    /// HTTP 404 Not Found.
    #[error("{0}")]
    NotFound(String),

    /// HTTP 409 Conflict.
    #[error("{0}")]
    Conflict(String),

    /// A submission omitted one or more required fields.
    #[error("{message}")]
    MissingRequiredFields {
        /// The user-facing message.
        message: String,
        /// Ids of the required fields that were not submitted.
        field_ids: Vec<String>,
    },

    /// HTTP 500 Internal Server Error.
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    // ── Storage errors ───────────────────────────────────────────────

    /// A generic database error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// A database integrity constraint was violated.
    #[error("Integrity error: {0}")]
    IntegrityError(String),

    // ── Validation ───────────────────────────────────────────────────

    /// One or more input fields failed validation.
    #[error("{0}")]
    ValidationError(ValidationError),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SnapformError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// - `BadRequest`, `ValidationError`, `MissingRequiredFields` -> 400
    /// - `Unauthorized` -> 401
    /// - `PermissionDenied` -> 403
    /// - `NotFound` -> 404
    /// - `Conflict` -> 409
    /// - Everything else -> 500
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::ValidationError(_) | Self::MissingRequiredFields { .. } => {
                400
            }
            Self::Unauthorized(_) => 401,
            Self::PermissionDenied(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::InternalServerError(_)
            | Self::DatabaseError(_)
            | Self::IntegrityError(_)
            | Self::ConfigurationError(_)
            | Self::SerializationError(_)
            | Self::IoError(_) => 500,
        }
    }

    /// Returns `true` for errors that indicate a server-side fault.
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

impl From<ValidationError> for SnapformError {
    fn from(err: ValidationError) -> Self {
        Self::ValidationError(err)
    }
}

impl From<serde_json::Error> for SnapformError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// A convenience type alias for `Result<T, SnapformError>`.
pub type SnapformResult<T> = Result<T, SnapformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_simple() {
        let err = ValidationError::new("Field label is required", "required");
        assert_eq!(err.to_string(), "Field label is required");
    }

    #[test]
    fn test_validation_error_display_field_errors() {
        let err = ValidationError::default()
            .with_field_error("name", "Too short")
            .with_field_error("textColor", "Invalid hex color");
        assert_eq!(err.to_string(), "name: Too short; textColor: Invalid hex color");
    }

    #[test]
    fn test_validation_error_into_result() {
        assert!(ValidationError::default().into_result().is_ok());
        let err = ValidationError::default().with_field_error("name", "bad");
        assert!(err.into_result().is_err());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(SnapformError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(SnapformError::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(SnapformError::PermissionDenied("x".into()).status_code(), 403);
        assert_eq!(SnapformError::NotFound("x".into()).status_code(), 404);
        assert_eq!(SnapformError::Conflict("x".into()).status_code(), 409);
        assert_eq!(
            SnapformError::MissingRequiredFields {
                message: "m".into(),
                field_ids: vec!["a".into()],
            }
            .status_code(),
            400
        );
        assert_eq!(SnapformError::DatabaseError("x".into()).status_code(), 500);
        assert_eq!(
            SnapformError::ValidationError(ValidationError::new("x", "y")).status_code(),
            400
        );
        assert!(SnapformError::InternalServerError("x".into()).is_server_error());
        assert!(!SnapformError::NotFound("x".into()).is_server_error());
    }

    #[test]
    fn test_http_errors_display_bare_message() {
        let err = SnapformError::NotFound("Form not found".into());
        assert_eq!(err.to_string(), "Form not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SnapformError = io_err.into();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("file missing"));
    }
}
