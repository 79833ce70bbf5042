//! The `createuser` management command.

use std::sync::Arc;

use async_trait::async_trait;
use snapform_auth::{AuthService, SignupRequest};
use snapform_core::{SnapformError, Settings};

use crate::command::ManagementCommand;

/// Creates an account without going through the sign-up endpoint.
pub struct CreateuserCommand;

#[async_trait]
impl ManagementCommand for CreateuserCommand {
    fn name(&self) -> &'static str {
        "createuser"
    }

    fn help(&self) -> &'static str {
        "Create a user account"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("email")
                .long("email")
                .required(true)
                .help("Email address of the new account"),
        )
        .arg(
            clap::Arg::new("password")
                .long("password")
                .required(true)
                .help("Password, at least 8 characters"),
        )
        .arg(clap::Arg::new("name").long("name").help("Display name"))
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), SnapformError> {
        let arg = |name: &str| matches.get_one::<String>(name).cloned();
        let request = SignupRequest {
            name: arg("name"),
            email: arg("email").unwrap_or_default(),
            password: arg("password").unwrap_or_default(),
        };

        let store = super::open_store(settings).await?;
        let auth = AuthService::new(Arc::new(store), settings.session_ttl_hours);
        let user = auth.create_user(request).await?;

        println!("Created user {} ({})", user.email, user.id);
        Ok(())
    }
}
