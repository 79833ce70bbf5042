//! Built-in management commands.

pub mod check;
pub mod createuser;
pub mod exportresponses;
pub mod migrate;
pub mod runserver;
pub mod seedthemes;

pub use check::CheckCommand;
pub use createuser::CreateuserCommand;
pub use exportresponses::ExportresponsesCommand;
pub use migrate::MigrateCommand;
pub use runserver::RunserverCommand;
pub use seedthemes::SeedthemesCommand;

use snapform_core::{Settings, SnapformResult};
use snapform_db::SqliteStore;

use crate::command::CommandRegistry;

/// Registers every built-in command.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(RunserverCommand));
    registry.register(Box::new(MigrateCommand));
    registry.register(Box::new(SeedthemesCommand));
    registry.register(Box::new(CreateuserCommand));
    registry.register(Box::new(ExportresponsesCommand));
    registry.register(Box::new(CheckCommand));
}

/// Opens the configured database and makes sure its tables exist.
pub(crate) async fn open_store(settings: &Settings) -> SnapformResult<SqliteStore> {
    let store = SqliteStore::open(&settings.database.path)?;
    store.migrate().await?;
    Ok(store)
}
