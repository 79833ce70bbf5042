//! Settings loading from configuration files and the environment.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML file (overriding defaults, table by table).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `SNAPFORM_DEBUG` | `debug` |
//! | `SNAPFORM_HOST` | `host` |
//! | `SNAPFORM_PORT` | `port` |
//! | `SNAPFORM_DATABASE_PATH` | `database.path` |
//! | `SNAPFORM_LOG_LEVEL` | `log_level` |
//! | `SNAPFORM_SESSION_TTL_HOURS` | `session_ttl_hours` |
//! | `SNAPFORM_ALLOWED_ORIGINS` | `allowed_origins` (comma-separated) |
//! | `SNAPFORM_DEFAULT_PAGE_SIZE` | `default_page_size` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use snapform_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("snapform.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::SnapformError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys missing from the TOML keep their default values, including keys of
/// nested tables such as `[database]`.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, SnapformError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| SnapformError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    let json_value = toml_to_json(toml_value);
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        SnapformError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, json_value);
    serde_json::from_value(merged).map_err(|e| {
        SnapformError::ConfigurationError(format!("Failed to deserialize settings from TOML: {e}"))
    })
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, SnapformError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        SnapformError::ConfigurationError(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, SnapformError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Loads settings from environment variables only, starting from defaults.
pub fn from_env() -> Result<Settings, SnapformError> {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Applies `SNAPFORM_*` environment variable overrides to `settings`.
pub fn apply_env_overrides(settings: &mut Settings) -> Result<(), SnapformError> {
    apply_overrides_from(settings, |key| std::env::var(key).ok())
}

/// Applies overrides using `lookup` to resolve variable names.
///
/// Numeric variables that fail to parse are reported as configuration errors
/// rather than silently ignored.
pub fn apply_overrides_from<F>(settings: &mut Settings, lookup: F) -> Result<(), SnapformError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("SNAPFORM_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("SNAPFORM_HOST") {
        settings.host = val;
    }

    if let Some(val) = lookup("SNAPFORM_PORT") {
        settings.port = parse_number("SNAPFORM_PORT", &val)?;
    }

    if let Some(val) = lookup("SNAPFORM_DATABASE_PATH") {
        settings.database.path = val;
    }

    if let Some(val) = lookup("SNAPFORM_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("SNAPFORM_SESSION_TTL_HOURS") {
        settings.session_ttl_hours = parse_number("SNAPFORM_SESSION_TTL_HOURS", &val)?;
    }

    if let Some(val) = lookup("SNAPFORM_ALLOWED_ORIGINS") {
        settings.allowed_origins = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(val) = lookup("SNAPFORM_DEFAULT_PAGE_SIZE") {
        settings.default_page_size = parse_number("SNAPFORM_DEFAULT_PAGE_SIZE", &val)?;
    }

    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, SnapformError> {
    raw.trim()
        .parse()
        .map_err(|_| SnapformError::ConfigurationError(format!("{key} must be a number, got '{raw}'")))
}

// ============================================================
// Helpers
// ============================================================

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
