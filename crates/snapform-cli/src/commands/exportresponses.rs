//! The `exportresponses` management command.

use std::path::PathBuf;

use async_trait::async_trait;
use snapform_core::{SnapformError, Settings};
use snapform_db::{FormStore, PageRequest};
use snapform_forms::export::{export_responses, CsvExport};

use crate::command::ManagementCommand;

/// Writes every response of a form to a CSV file.
///
/// The form is looked up within the account given by `--owner`. Without
/// `--output` the file is named after the form in the working directory;
/// `--output -` prints to stdout.
pub struct ExportresponsesCommand;

/// Builds the export for `form_id` as seen by the owner `owner_email`.
pub async fn build_export(
    store: &dyn FormStore,
    owner_email: &str,
    form_id: &str,
) -> Result<CsvExport, SnapformError> {
    let owner = store
        .find_user_by_email(owner_email)
        .await?
        .ok_or_else(|| SnapformError::NotFound("User not found".to_string()))?;
    let form = store
        .get_form(&owner.id, form_id)
        .await?
        .ok_or_else(|| SnapformError::NotFound("Form not found".to_string()))?;
    let responses = store.list_responses(form_id, PageRequest::all()).await?;
    Ok(export_responses(&form.form.name, &responses.items))
}

#[async_trait]
impl ManagementCommand for ExportresponsesCommand {
    fn name(&self) -> &'static str {
        "exportresponses"
    }

    fn help(&self) -> &'static str {
        "Export a form's responses as CSV"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("form_id")
                .required(true)
                .help("Id of the form to export"),
        )
        .arg(
            clap::Arg::new("owner")
                .long("owner")
                .required(true)
                .help("Email of the account that owns the form"),
        )
        .arg(
            clap::Arg::new("output")
                .long("output")
                .short('o')
                .value_parser(clap::value_parser!(PathBuf))
                .help("Destination file, or - for stdout"),
        )
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> Result<(), SnapformError> {
        let form_id = matches
            .get_one::<String>("form_id")
            .ok_or_else(|| SnapformError::BadRequest("A form id is required".to_string()))?;
        let owner = matches
            .get_one::<String>("owner")
            .ok_or_else(|| SnapformError::BadRequest("--owner is required".to_string()))?;

        let store = super::open_store(settings).await?;
        let export = build_export(&store, owner, form_id).await?;

        let path = matches
            .get_one::<PathBuf>("output")
            .cloned()
            .unwrap_or_else(|| PathBuf::from(&export.filename));
        if path.as_os_str() == "-" {
            print!("{}", export.content);
            return Ok(());
        }

        tokio::fs::write(&path, export.content.as_bytes()).await?;
        tracing::info!(form_id = %form_id, path = %path.display(), "Responses exported");
        println!("Wrote {}", path.display());
        Ok(())
    }
}
