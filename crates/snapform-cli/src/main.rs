use std::path::PathBuf;

use anyhow::Context;
use snapform_cli::command::CommandRegistry;
use snapform_cli::commands::register_builtin_commands;
use snapform_cli::load_settings;
use snapform_core::logging::setup_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    let config = matches.get_one::<PathBuf>("config");
    let settings = load_settings(config.map(PathBuf::as_path)).context("Failed to load settings")?;
    setup_logging(&settings);

    let command = matches.subcommand_name().unwrap_or_default().to_string();
    registry
        .execute(&matches, &settings)
        .await
        .with_context(|| format!("`{command}` failed"))
}
