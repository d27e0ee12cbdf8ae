//! `scribe new` command implementation.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use scribe_server::{AuthoringService, manifest_from_config, store_from_config};
use scribe_storage::DocumentDraft;

use crate::commands::common::ProjectArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the new command.
#[derive(Args)]
pub(crate) struct NewArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Document title.
    #[arg(short, long)]
    title: String,

    /// Category (default: uncategorized).
    #[arg(long)]
    category: Option<String>,

    /// Markdown body file, `-` for stdin.
    #[arg(short, long)]
    file: PathBuf,
}

impl NewArgs {
    /// Execute the new command.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is not configured or the submission fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.project.load(None, None)?;

        let body = if self.file.as_os_str() == "-" {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            body
        } else {
            std::fs::read_to_string(&self.file)?
        };

        let store = store_from_config(&config)?;
        let service = AuthoringService::new(
            Some(store),
            Arc::new(manifest_from_config(&config)),
            &config.docs_resolved.content_root,
            &config.docs_resolved.extension,
        );

        let report = service.submit(&DocumentDraft {
            category: self.category,
            title: self.title,
            body,
        })?;

        if report.created {
            output.success(&format!("Created {}", report.file));
        } else {
            output.success(&format!("Updated {}", report.file));
        }
        if let Some(url) = &report.commit_url {
            output.field("Commit", url);
        }
        match (&report.registration, &report.manifest_error) {
            (Some(registration), _) if registration.inserted => output.info(&format!(
                "Registered in manifest as {}",
                service
                    .manifest()
                    .format()
                    .binding_ident(registration.binding)
            )),
            (Some(_), _) => output.info("Already registered in manifest"),
            (None, error) => {
                output.warning(&format!(
                    "Manifest not updated: {}",
                    error.as_deref().unwrap_or("unknown error")
                ));
                output.warning("Run `scribe reconcile` to rebuild it from the store.");
            }
        }

        Ok(())
    }
}
