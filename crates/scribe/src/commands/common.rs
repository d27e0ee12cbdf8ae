//! Arguments shared by every command that touches a project.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use scribe_config::{CliSettings, Config, StoreBackend};

use crate::error::CliError;

/// Store backend selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum StoreArg {
    /// Local filesystem, create-only.
    Fs,
    /// GitHub contents API.
    Github,
}

impl From<StoreArg> for StoreBackend {
    fn from(arg: StoreArg) -> Self {
        match arg {
            StoreArg::Fs => Self::Fs,
            StoreArg::Github => Self::Github,
        }
    }
}

/// Configuration and store arguments.
#[derive(Args, Debug, Default)]
pub(crate) struct ProjectArgs {
    /// Path to configuration file (default: auto-discover scribe.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Site root containing the manifest and content (overrides config).
    #[arg(long)]
    pub(crate) project_dir: Option<PathBuf>,

    /// Document store backend (overrides config).
    #[arg(long, value_enum, env = "STORE_BACKEND")]
    pub(crate) store: Option<StoreArg>,

    /// GitHub repository in owner/name form.
    #[arg(long, env = "STORE_REPO")]
    pub(crate) repo: Option<String>,

    /// Branch to commit to.
    #[arg(long, env = "STORE_BRANCH")]
    pub(crate) branch: Option<String>,

    /// Token with write access to repository contents.
    #[arg(long, env = "STORE_TOKEN", hide_env_values = true)]
    pub(crate) token: Option<String>,

    /// Commit author name.
    #[arg(long, env = "COMMITTER_NAME")]
    pub(crate) committer_name: Option<String>,

    /// Commit author email.
    #[arg(long, env = "COMMITTER_EMAIL")]
    pub(crate) committer_email: Option<String>,
}

impl ProjectArgs {
    /// Load configuration with these arguments applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is missing or invalid.
    pub(crate) fn load(&self, host: Option<String>, port: Option<u16>) -> Result<Config, CliError> {
        let settings = CliSettings {
            host,
            port,
            project_dir: self.project_dir.clone(),
            store: self.store.map(StoreBackend::from),
            repo: self.repo.clone(),
            branch: self.branch.clone(),
            token: self.token.clone(),
            committer_name: self.committer_name.clone(),
            committer_email: self.committer_email.clone(),
        };
        Ok(Config::load(self.config.as_deref(), Some(&settings))?)
    }
}
