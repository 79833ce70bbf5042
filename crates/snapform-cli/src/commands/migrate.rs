//! The `migrate` management command.

use async_trait::async_trait;
use snapform_core::{Settings, SnapformError};
use snapform_db::FormStore;

use crate::command::ManagementCommand;

/// Creates missing tables, then seeds the system themes unless told not to.
pub struct MigrateCommand;

#[async_trait]
impl ManagementCommand for MigrateCommand {
    fn name(&self) -> &'static str {
        "migrate"
    }

    fn help(&self) -> &'static str {
        "Create the database schema"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("no-seed")
                .long("no-seed")
                .action(clap::ArgAction::SetTrue)
                .help("Skip inserting the system themes"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), SnapformError> {
        let store = super::open_store(settings).await?;
        tracing::info!(database = %settings.database.path, "Schema is up to date");

        if settings.database.seed_system_themes && !matches.get_flag("no-seed") {
            let seeded = store.seed_system_themes().await?;
            tracing::info!(seeded, "System themes ensured");
        }
        Ok(())
    }
}
