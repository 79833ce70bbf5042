//! The `runserver` management command.

use async_trait::async_trait;
use snapform_core::{Settings, SnapformError};
use snapform_http::AppState;

use crate::command::ManagementCommand;

/// Serves the JSON API until Ctrl-C.
///
/// `--host` and `--port` override the configured bind address.
pub struct RunserverCommand;

#[async_trait]
impl ManagementCommand for RunserverCommand {
    fn name(&self) -> &'static str {
        "runserver"
    }

    fn help(&self) -> &'static str {
        "Start the HTTP API server"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(clap::Arg::new("host").long("host").help("Host to bind to"))
            .arg(
                clap::Arg::new("port")
                    .long("port")
                    .value_parser(clap::value_parser!(u16))
                    .help("Port to bind to"),
            )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), SnapformError> {
        let mut settings = settings.clone();
        if let Some(host) = matches.get_one::<String>("host") {
            settings.host.clone_from(host);
        }
        if let Some(port) = matches.get_one::<u16>("port") {
            settings.port = *port;
        }

        tracing::info!(
            address = %settings.bind_address(),
            database = %settings.database.path,
            debug = settings.debug,
            "Starting server"
        );
        let state = AppState::open(settings).await?;
        snapform_http::serve(state).await
    }
}
