//! `scribe reconcile` command implementation.

use clap::Args;
use scribe_server::{manifest_from_config, store_from_config};

use crate::commands::common::ProjectArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the reconcile command.
#[derive(Args)]
pub(crate) struct ReconcileArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Print the generated manifest instead of writing it.
    #[arg(long)]
    dry_run: bool,
}

impl ReconcileArgs {
    /// Execute the reconcile command.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be listed or the manifest cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.project.load(None, None)?;

        let store = store_from_config(&config)?;
        let manifest_file = manifest_from_config(&config);

        output.info(&format!("Scanning {} store...", store.backend()));
        let paths = store.scan()?;
        tracing::info!(backend = store.backend(), count = paths.len(), "Scanned store");

        if self.dry_run {
            let format = manifest_file.format();
            let manifest = scribe_manifest::rebuild(&paths, format);
            output.print(&scribe_manifest::serialize(&manifest, format));
            output.highlight(&format!(
                "\n[DRY RUN] {} documents, manifest not written.",
                manifest.len()
            ));
            return Ok(());
        }

        let before = manifest_file.load()?.len();
        let manifest = manifest_file.rebuild(&paths)?;

        output.success(&format!(
            "Manifest rebuilt: {} documents (was {before})",
            manifest.len()
        ));
        output.info(&format!("Written to {}", manifest_file.path().display()));
        Ok(())
    }
}
