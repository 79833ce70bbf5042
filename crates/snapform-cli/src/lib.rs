//! # snapform-cli
//!
//! Management commands for snapform and the `snapform` binary.
//!
//! ## Quick Start
//!
//! ```rust
//! use snapform_cli::command::CommandRegistry;
//! use snapform_cli::commands::register_builtin_commands;
//!
//! let mut registry = CommandRegistry::new();
//! register_builtin_commands(&mut registry);
//!
//! let names = registry.list_commands();
//! assert!(names.contains(&"runserver"));
//! assert!(names.contains(&"exportresponses"));
//! ```

pub mod command;
pub mod commands;

use std::path::Path;

use snapform_core::settings_loader;
use snapform_core::{Settings, SnapformResult};

/// Settings file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "snapform.toml";

/// Loads settings from `config`, else from [`DEFAULT_CONFIG_FILE`] when
/// present, else from defaults. `SNAPFORM_*` variables apply on top.
pub fn load_settings(config: Option<&Path>) -> SnapformResult<Settings> {
    match config {
        Some(path) => settings_loader::from_toml_file_with_env(path),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            settings_loader::from_toml_file_with_env(DEFAULT_CONFIG_FILE)
        }
        None => settings_loader::from_env(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("site.toml");
        std::fs::write(&path, "port = 8080\n[database]\npath = \"site.sqlite3\"\n").unwrap();

        let settings = load_settings(Some(&path)).unwrap();
        assert_eq!(settings.database.path, "site.sqlite3");
        assert!(settings.database.seed_system_themes);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_settings(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
