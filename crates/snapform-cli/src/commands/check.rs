//! The `check` management command.
//!
//! Inspects the loaded settings for mistakes that would break or weaken a
//! running server.

use async_trait::async_trait;
use snapform_core::{Settings, SnapformError};

use crate::command::ManagementCommand;

/// Runs the configuration checks.
pub struct CheckCommand;

/// The result of a single check.
#[derive(Debug, Clone)]
pub struct CheckMessage {
    pub level: CheckLevel,
    pub msg: String,
    pub hint: Option<String>,
    /// A stable identifier such as `"http.W001"`.
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckLevel {
    Warning,
    Error,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

fn message(level: CheckLevel, id: &str, msg: &str, hint: Option<&str>) -> CheckMessage {
    CheckMessage {
        level,
        msg: msg.to_string(),
        hint: hint.map(str::to_string),
        id: id.to_string(),
    }
}

/// Checks `settings` and returns every issue found.
pub fn run_checks(settings: &Settings) -> Vec<CheckMessage> {
    let mut messages = Vec::new();

    if settings.port == 0 {
        messages.push(message(
            CheckLevel::Error,
            "core.E001",
            "Port is 0",
            Some("Set SNAPFORM_PORT or `port` to a fixed port"),
        ));
    }

    if settings.session_ttl_hours <= 0 {
        messages.push(message(
            CheckLevel::Error,
            "auth.E001",
            "Sessions expire immediately",
            Some("Set session_ttl_hours to a positive number of hours"),
        ));
    }

    if settings.max_page_size == 0 {
        messages.push(message(
            CheckLevel::Error,
            "http.E001",
            "max_page_size is 0",
            None,
        ));
    } else if settings.default_page_size > settings.max_page_size {
        messages.push(message(
            CheckLevel::Warning,
            "http.W002",
            "default_page_size exceeds max_page_size and will be clamped",
            None,
        ));
    }

    for origin in &settings.allowed_origins {
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            messages.push(CheckMessage {
                level: CheckLevel::Error,
                msg: format!("Allowed origin '{origin}' is not an http(s) origin"),
                hint: Some("Origins look like https://forms.example.com".to_string()),
                id: "http.E002".to_string(),
            });
        }
    }

    if !settings.debug && settings.allowed_origins.is_empty() {
        messages.push(message(
            CheckLevel::Warning,
            "http.W001",
            "CORS allows any origin with debug disabled",
            Some("List the front-end origins in allowed_origins"),
        ));
    }

    if settings.database.path == ":memory:" && !settings.debug {
        messages.push(message(
            CheckLevel::Warning,
            "database.W001",
            "The database is in memory; data is lost on restart",
            None,
        ));
    }

    messages
}

#[async_trait]
impl ManagementCommand for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Check the configuration for problems"
    }

    async fn handle(&self, _matches: &clap::ArgMatches, settings: &Settings) -> Result<(), SnapformError> {
        let messages = run_checks(settings);

        if messages.is_empty() {
            tracing::info!("System check identified no issues");
            return Ok(());
        }

        let errors = messages.iter().filter(|m| m.level == CheckLevel::Error).count();
        let warnings = messages.len() - errors;

        for msg in &messages {
            let hint_text = msg
                .hint
                .as_ref()
                .map_or(String::new(), |h| format!("\n\tHINT: {h}"));
            tracing::warn!("{} ({}): {}{}", msg.level, msg.id, msg.msg, hint_text);
        }

        tracing::info!(
            "System check identified {} issue(s) ({} error(s), {} warning(s))",
            messages.len(),
            errors,
            warnings
        );

        if errors > 0 {
            return Err(SnapformError::ConfigurationError(format!(
                "System check found {errors} error(s)"
            )));
        }

        Ok(())
    }
}
