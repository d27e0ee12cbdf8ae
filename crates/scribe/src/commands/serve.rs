//! `scribe serve` command implementation.

use std::sync::Arc;

use clap::Args;
use scribe_config::StoreBackend;
use scribe_server::{
    ServerConfig, authoring_from_config, manifest_from_config, run_server,
    site_loader_from_config, store_from_config,
};

use crate::commands::common::ProjectArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    #[command(flatten)]
    project: ProjectArgs,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Enable verbose output (request and timing logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.project.load(self.host, self.port)?;

        // Fail early instead of serving an endpoint that rejects every submission
        if config.store.backend == StoreBackend::Github {
            store_from_config(&config)?;
        }

        output.highlight(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.field(
            "Directory",
            &config.docs_resolved.content_dir().display().to_string(),
        );
        output.field(
            "Manifest",
            &config.manifest_resolved.path.display().to_string(),
        );
        match config.store.backend {
            StoreBackend::Fs => output.field("Store", "local filesystem"),
            StoreBackend::Github => output.field(
                "Store",
                &format!(
                    "GitHub {} ({})",
                    config.github.repo.as_deref().unwrap_or_default(),
                    config.github.branch
                ),
            ),
        }

        let manifest = Arc::new(manifest_from_config(&config));
        let authoring = Arc::new(authoring_from_config(&config, Arc::clone(&manifest)));
        let site_loader = Arc::new(site_loader_from_config(&config, manifest));

        run_server(ServerConfig::from(&config), authoring, site_loader)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
