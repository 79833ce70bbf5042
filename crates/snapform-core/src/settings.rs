//! Settings for the snapform server.
//!
//! [`Settings`] holds everything the server, store, and session layer need.
//! Defaults are suitable for local development; see
//! [`settings_loader`](crate::settings_loader) for loading from files and the
//! environment.

use serde::{Deserialize, Serialize};

/// Database configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// Path to the SQLite file, or `:memory:`.
    pub path: String,
    /// Whether the system themes are inserted on `migrate`.
    pub seed_system_themes: bool,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: "snapform.sqlite3".to_string(),
            seed_system_themes: true,
        }
    }
}

/// The complete set of snapform settings.
///
/// # Examples
///
/// ```
/// use snapform_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.bind_address(), "127.0.0.1:3000");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled (pretty logs instead of JSON).
    pub debug: bool,
    /// Host the HTTP server binds to.
    pub host: String,
    /// Port the HTTP server binds to.
    pub port: u16,

    // ── Database ─────────────────────────────────────────────────────

    /// Database configuration.
    pub database: DatabaseSettings,

    // ── Sessions ─────────────────────────────────────────────────────

    /// Lifetime of a login session, in hours.
    pub session_ttl_hours: i64,

    // ── HTTP ─────────────────────────────────────────────────────────

    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,
    /// Page size used when a list request has no `limit`.
    pub default_page_size: usize,
    /// Upper bound applied to any requested `limit`.
    pub max_page_size: usize,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log filter (e.g. "info", "snapform_http=debug").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            host: "127.0.0.1".to_string(),
            port: 3000,
            database: DatabaseSettings::default(),
            session_ttl_hours: 24 * 7,
            allowed_origins: Vec::new(),
            default_page_size: 10,
            max_page_size: 100,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Returns the `host:port` string the server should bind to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Clamps a requested page size into `1..=max_page_size`, falling back
    /// to the default page size when none was requested.
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}
