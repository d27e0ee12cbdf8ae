//! CLI error types.

use scribe_config::ConfigError;
use scribe_manifest::ManifestFileError;
use scribe_server::AuthoringError;
use scribe_storage::StoreError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{0}")]
    Manifest(#[from] ManifestFileError),

    #[error("{0}")]
    Authoring(#[from] AuthoringError),

    #[error("{0}")]
    Server(String),
}
