//! HTTP server for the Scribe documentation engine.
//!
//! This crate provides the authoring side of a Scribe site:
//! - [`AuthoringService`]: validates drafts, writes them to a document store
//!   and registers them in the generated manifest
//! - An axum router serving `POST /api/docs`, `GET /api/docs` and the
//!   embedded authoring form
//! - Builders turning a [`scribe_config::Config`] into stores and services
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use scribe_server::{ServerConfig, authoring_from_config, site_loader_from_config, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = scribe_config::Config::load(None, None).unwrap();
//!     let manifest = Arc::new(scribe_server::manifest_from_config(&config));
//!     let authoring = Arc::new(authoring_from_config(&config, Arc::clone(&manifest)));
//!     let site_loader = Arc::new(site_loader_from_config(&config, manifest));
//!
//!     run_server(ServerConfig::from(&config), authoring, site_loader).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (scribe-server)
//!                        │
//!                        ├─► POST /api/docs ──► AuthoringService (spawn_blocking)
//!                        │                          ├─► DocumentStore (fs | GitHub)
//!                        │                          └─► ManifestFile (single writer)
//!                        │
//!                        ├─► GET /api/docs ──► SiteLoader
//!                        │
//!                        └─► Embedded form (rust-embed)
//! ```

mod app;
mod authoring;
mod error;
mod handlers;
mod middleware;
mod state;
mod static_files;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use scribe_config::{Config, ConfigError, Duplicates, StoreBackend};
use scribe_manifest::{DuplicatePolicy, ManifestFile, ManifestFormat};
use scribe_site::{SiteLoader, SiteLoaderConfig};
use scribe_storage::DocumentStore;
use scribe_storage_fs::FsStore;
use scribe_storage_github::{Committer, GithubClient, GithubStore, Repository};
use state::AppState;

pub use authoring::{AuthoringError, AuthoringService, SubmitReport};

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 7979,
        }
    }
}

impl From<&Config> for ServerConfig {
    fn from(config: &Config) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Arguments
///
/// * `config` - Bind address
/// * `authoring` - Write path for submissions
/// * `site_loader` - Document index
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(
    config: ServerConfig,
    authoring: Arc<AuthoringService>,
    site_loader: Arc<SiteLoader>,
) -> Result<(), Box<dyn std::error::Error>> {
    match authoring.backend() {
        Some(backend) => tracing::info!(backend, "Document store ready"),
        None => tracing::warn!("No usable document store; submissions will fail"),
    }

    let state = Arc::new(AppState {
        authoring,
        site_loader,
    });
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Manifest format described by the configuration.
#[must_use]
pub fn manifest_format(config: &Config) -> ManifestFormat {
    let manifest = &config.manifest_resolved;
    ManifestFormat {
        binding_prefix: format!("{}_", manifest.collection),
        collection: manifest.collection.clone(),
        module_prefix: manifest.module_prefix.clone(),
        content_root: config.docs_resolved.content_root.clone(),
        full_path_separator: manifest.full_path_separator,
        runtime_module: manifest.runtime_module.clone(),
        source_config_module: manifest.source_config_module.clone(),
        ..ManifestFormat::default()
    }
}

/// Manifest file described by the configuration.
#[must_use]
pub fn manifest_from_config(config: &Config) -> ManifestFile {
    let policy = match config.manifest_resolved.duplicates {
        Duplicates::KeepExisting => DuplicatePolicy::KeepExisting,
        Duplicates::Append => DuplicatePolicy::Append,
    };
    ManifestFile::new(
        config.manifest_resolved.path.clone(),
        manifest_format(config),
    )
    .with_policy(policy)
}

/// Document store selected by the configuration.
///
/// # Errors
///
/// Returns [`ConfigError::Validation`] if the GitHub backend is selected
/// without a valid repository and token.
pub fn store_from_config(config: &Config) -> Result<Arc<dyn DocumentStore>, ConfigError> {
    let docs = &config.docs_resolved;
    match config.store.backend {
        StoreBackend::Fs => Ok(Arc::new(FsStore::new(docs.content_dir(), &docs.extension))),
        StoreBackend::Github => {
            let github = config.require_github()?;
            let repo = github.repo.as_deref().unwrap_or_default();
            let repository =
                Repository::parse(repo).map_err(|e| ConfigError::Validation(e.to_string()))?;
            let token = github.token.as_deref().unwrap_or_default();
            let client = GithubClient::new(&github.api_url, token, repository);

            let store = GithubStore::new(client, &github.branch, &docs.content_root, &docs.extension)
                .with_committer(Committer {
                    name: github.committer_name.clone(),
                    email: github.committer_email.clone(),
                });
            Ok(Arc::new(store))
        }
    }
}

/// Authoring service for the configuration.
///
/// A store that cannot be built is logged and left unset, so the server
/// still starts and submissions fail with "Missing store configuration".
#[must_use]
pub fn authoring_from_config(config: &Config, manifest: Arc<ManifestFile>) -> AuthoringService {
    let store = match store_from_config(config) {
        Ok(store) => Some(store),
        Err(e) => {
            tracing::warn!(error = %e, "Document store is not configured");
            None
        }
    };
    AuthoringService::new(
        store,
        manifest,
        &config.docs_resolved.content_root,
        &config.docs_resolved.extension,
    )
}

/// Site loader for the configuration.
#[must_use]
pub fn site_loader_from_config(config: &Config, manifest: Arc<ManifestFile>) -> SiteLoader {
    SiteLoader::new(
        SiteLoaderConfig {
            content_dir: config.docs_resolved.content_dir(),
            base_url: config.docs_resolved.base_url.clone(),
        },
        manifest,
    )
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use scribe_config::CliSettings;

    use super::*;

    fn load(dir: &Path, toml: &str, settings: Option<&CliSettings>) -> Config {
        let path = dir.join("scribe.toml");
        std::fs::write(&path, toml).unwrap();
        Config::load(Some(&path), settings).unwrap()
    }

    #[test]
    fn test_manifest_format_defaults_match() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = load(temp_dir.path(), "", None);

        assert_eq!(manifest_format(&config), ManifestFormat::default());
    }

    #[test]
    fn test_manifest_from_config_resolves_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = load(
            temp_dir.path(),
            "[manifest]\npath = \"gen/index.ts\"\nduplicates = \"append\"\n",
            None,
        );

        let manifest = manifest_from_config(&config);

        assert_eq!(manifest.path(), temp_dir.path().join("gen/index.ts"));
    }

    #[test]
    fn test_fs_store_from_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = load(temp_dir.path(), "", None);

        let store = store_from_config(&config).unwrap();

        assert_eq!(store.backend(), "Fs");
    }

    #[test]
    fn test_github_store_requires_credentials() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = load(temp_dir.path(), "[store]\nbackend = \"github\"\n", None);

        assert!(store_from_config(&config).is_err());

        let manifest = Arc::new(manifest_from_config(&config));
        let authoring = authoring_from_config(&config, manifest);
        assert_eq!(authoring.backend(), None);
    }

    #[test]
    fn test_github_store_from_cli_settings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = CliSettings {
            store: Some(StoreBackend::Github),
            repo: Some("acme/site".to_owned()),
            token: Some("secret".to_owned()),
            ..CliSettings::default()
        };
        let config = load(temp_dir.path(), "", Some(&settings));

        let store = store_from_config(&config).unwrap();

        assert_eq!(store.backend(), "GitHub");
    }
}
