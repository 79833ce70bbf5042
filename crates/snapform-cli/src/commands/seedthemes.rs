//! The `seedthemes` management command.

use async_trait::async_trait;
use snapform_core::{Settings, SnapformError};
use snapform_db::FormStore;

use crate::command::ManagementCommand;

/// Inserts any missing system themes.
pub struct SeedthemesCommand;

#[async_trait]
impl ManagementCommand for SeedthemesCommand {
    fn name(&self) -> &'static str {
        "seedthemes"
    }

    fn help(&self) -> &'static str {
        "Insert the built-in public themes"
    }

    async fn handle(&self, _matches: &clap::ArgMatches, settings: &Settings) -> Result<(), SnapformError> {
        let store = super::open_store(settings).await?;
        let seeded = store.seed_system_themes().await?;
        println!("System themes written: {seeded}");
        Ok(())
    }
}
