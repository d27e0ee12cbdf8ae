//! Configuration management for Scribe.
//!
//! Parses `scribe.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings (including the `STORE_*` / `COMMITTER_*` environment
//! variables read by the CLI) are applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `docs.base_url`
//! - `github.repo`, `github.token`, `github.branch`
//! - `github.committer_name`, `github.committer_email`, `github.api_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override project directory.
    pub project_dir: Option<PathBuf>,
    /// Override store backend.
    pub store: Option<StoreBackend>,
    /// Override GitHub repository (`owner/name`).
    pub repo: Option<String>,
    /// Override GitHub branch.
    pub branch: Option<String>,
    /// Override GitHub token.
    pub token: Option<String>,
    /// Override committer name.
    pub committer_name: Option<String>,
    /// Override committer email.
    pub committer_email: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "scribe.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Documentation configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Manifest configuration (paths are relative strings from TOML).
    manifest: ManifestConfigRaw,
    /// Store selection.
    pub store: StoreConfig,
    /// GitHub store settings.
    pub github: GithubConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Resolved manifest configuration (set after loading).
    #[serde(skip)]
    pub manifest_resolved: ManifestConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
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

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    project_dir: Option<String>,
    content_dir: Option<String>,
    extension: Option<String>,
    base_url: Option<String>,
}

/// Resolved documentation configuration.
#[derive(Debug, Default)]
pub struct DocsConfig {
    /// Site root; manifest and content paths are relative to it.
    pub project_dir: PathBuf,
    /// Documents root relative to the project, with `/` separators.
    ///
    /// Also the path prefix inside the GitHub repository.
    pub content_root: String,
    /// Content extension without the dot.
    pub extension: String,
    /// URL prefix of document pages.
    pub base_url: String,
}

impl DocsConfig {
    /// Absolute documents root.
    #[must_use]
    pub fn content_dir(&self) -> PathBuf {
        self.project_dir.join(&self.content_root)
    }
}

/// What to do when a registered path is registered again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Duplicates {
    /// Keep the existing entry.
    #[default]
    KeepExisting,
    /// Append another entry.
    Append,
}

/// Raw manifest configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ManifestConfigRaw {
    path: Option<String>,
    duplicates: Option<Duplicates>,
    collection: Option<String>,
    module_prefix: Option<String>,
    runtime_module: Option<String>,
    source_config_module: Option<String>,
    full_path_separator: Option<char>,
}

/// Resolved manifest configuration.
#[derive(Debug)]
pub struct ManifestConfig {
    /// Absolute manifest path.
    pub path: PathBuf,
    /// Duplicate policy.
    pub duplicates: Duplicates,
    /// Collection name.
    pub collection: String,
    /// Import specifier of the documents root, relative to the manifest.
    pub module_prefix: String,
    /// Module providing `_runtime`.
    pub runtime_module: String,
    /// Module providing the collection schema.
    pub source_config_module: String,
    /// Separator used in `fullPath`.
    pub full_path_separator: char,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            duplicates: Duplicates::default(),
            collection: "docs".to_owned(),
            module_prefix: module_prefix(DEFAULT_MANIFEST_PATH, DEFAULT_CONTENT_ROOT),
            runtime_module: "fumadocs-mdx/runtime/next".to_owned(),
            source_config_module: "../source.config".to_owned(),
            full_path_separator: '\\',
        }
    }
}

const DEFAULT_MANIFEST_PATH: &str = ".source/index.ts";
const DEFAULT_CONTENT_ROOT: &str = "content/docs";

/// Store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Local filesystem, create-only.
    #[default]
    Fs,
    /// GitHub contents API, create or update.
    Github,
}

/// Store selection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend used by the authoring endpoint.
    pub backend: StoreBackend,
}

/// GitHub store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Repository in `owner/name` form.
    pub repo: Option<String>,
    /// Token with write access to repository contents.
    pub token: Option<String>,
    /// Branch to commit to.
    pub branch: String,
    /// Commit author name.
    pub committer_name: String,
    /// Commit author email.
    pub committer_email: String,
    /// API base URL.
    pub api_url: String,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            repo: None,
            token: None,
            branch: "main".to_owned(),
            committer_name: "Scribe Bot".to_owned(),
            committer_email: "bot@scribe.invalid".to_owned(),
            api_url: "https://api.github.com".to_owned(),
        }
    }
}

impl GithubConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if repo or token is missing or invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let repo = self.repo.as_deref().unwrap_or_default();
        require_non_empty(repo, "github.repo")?;
        if repo.split('/').filter(|p| !p.is_empty()).count() != 2 || repo.matches('/').count() != 1 {
            return Err(ConfigError::Validation(
                "github.repo must be in owner/name form".to_owned(),
            ));
        }
        require_non_empty(self.token.as_deref().unwrap_or_default(), "github.token")?;
        require_non_empty(&self.branch, "github.branch")?;
        require_http_url(&self.api_url, "github.api_url")?;
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`github.token`").
        field: String,
        /// Error message (e.g., "${`STORE_TOKEN`}: environment variable not found").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Import specifier of `content_root` as seen from the manifest's directory.
///
/// `.source/index.ts` and `content/docs` give `../content/docs`.
fn module_prefix(manifest_path: &str, content_root: &str) -> String {
    let depth = Path::new(manifest_path)
        .parent()
        .map_or(0, |dir| dir.components().count());
    let content_root = content_root.trim_matches('/');
    if depth == 0 {
        format!("./{content_root}")
    } else {
        format!("{}{content_root}", "../".repeat(depth))
    }
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `scribe.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(project_dir) = &settings.project_dir {
            let manifest_rel = self
                .manifest_resolved
                .path
                .strip_prefix(&self.docs_resolved.project_dir)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_MANIFEST_PATH));
            self.docs_resolved.project_dir.clone_from(project_dir);
            self.manifest_resolved.path = project_dir.join(manifest_rel);
        }
        if let Some(store) = settings.store {
            self.store.backend = store;
        }
        if let Some(repo) = &settings.repo {
            self.github.repo = Some(repo.clone());
        }
        if let Some(branch) = &settings.branch {
            self.github.branch.clone_from(branch);
        }
        if let Some(token) = &settings.token {
            self.github.token = Some(token.clone());
        }
        if let Some(name) = &settings.committer_name {
            self.github.committer_name.clone_from(name);
        }
        if let Some(email) = &settings.committer_email {
            self.github.committer_email.clone_from(email);
        }
    }

    /// Get validated GitHub configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if repo or token is missing or invalid.
    pub fn require_github(&self) -> Result<&GithubConfig, ConfigError> {
        self.github.validate()?;
        Ok(&self.github)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            server: ServerConfig::default(),
            docs: DocsConfigRaw::default(),
            manifest: ManifestConfigRaw::default(),
            store: StoreConfig::default(),
            github: GithubConfig::default(),
            docs_resolved: DocsConfig {
                project_dir: base.to_path_buf(),
                content_root: DEFAULT_CONTENT_ROOT.to_owned(),
                extension: "mdx".to_owned(),
                base_url: "/blog".to_owned(),
            },
            manifest_resolved: ManifestConfig {
                path: base.join(DEFAULT_MANIFEST_PATH),
                ..ManifestConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading and resolution
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// GitHub settings are only checked by [`require_github`](Self::require_github),
    /// since they may come from CLI flags applied after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_docs()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate docs and manifest configuration.
    fn validate_docs(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.docs_resolved.extension, "docs.extension")?;
        if self.docs_resolved.content_root.split('/').any(|p| p == "..") {
            return Err(ConfigError::Validation(
                "docs.content_dir must stay inside docs.project_dir".to_owned(),
            ));
        }
        require_non_empty(&self.manifest_resolved.collection, "manifest.collection")?;
        if !self
            .manifest_resolved
            .collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::Validation(
                "manifest.collection must be a plain identifier".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.docs.base_url = expand::expand_opt(self.docs.base_url.as_deref(), "docs.base_url")?;

        let github = &mut self.github;
        github.repo = expand::expand_opt(github.repo.as_deref(), "github.repo")?;
        github.token = expand::expand_opt(github.token.as_deref(), "github.token")?;
        github.branch = expand::expand_env(&github.branch, "github.branch")?;
        github.committer_name = expand::expand_env(&github.committer_name, "github.committer_name")?;
        github.committer_email =
            expand::expand_env(&github.committer_email, "github.committer_email")?;
        github.api_url = expand::expand_env(&github.api_url, "github.api_url")?;

        // Empty after expansion (e.g. `${STORE_TOKEN:-}`) means unset
        if github.repo.as_deref().is_some_and(str::is_empty) {
            github.repo = None;
        }
        if github.token.as_deref().is_some_and(str::is_empty) {
            github.token = None;
        }

        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let project_dir = config_dir.join(self.docs.project_dir.as_deref().unwrap_or("."));
        let content_root = self
            .docs
            .content_dir
            .as_deref()
            .unwrap_or(DEFAULT_CONTENT_ROOT)
            .replace('\\', "/")
            .trim_matches('/')
            .to_owned();

        self.docs_resolved = DocsConfig {
            project_dir: project_dir.clone(),
            extension: self
                .docs
                .extension
                .as_deref()
                .unwrap_or("mdx")
                .trim_start_matches('.')
                .to_owned(),
            base_url: self.docs.base_url.clone().unwrap_or_else(|| "/blog".to_owned()),
            content_root,
        };

        let manifest = &self.manifest;
        let manifest_rel = manifest.path.as_deref().unwrap_or(DEFAULT_MANIFEST_PATH);
        let defaults = ManifestConfig::default();
        self.manifest_resolved = ManifestConfig {
            path: project_dir.join(manifest_rel),
            duplicates: manifest.duplicates.unwrap_or_default(),
            collection: manifest.collection.clone().unwrap_or(defaults.collection),
            module_prefix: manifest.module_prefix.clone().unwrap_or_else(|| {
                module_prefix(manifest_rel, &self.docs_resolved.content_root)
            }),
            runtime_module: manifest.runtime_module.clone().unwrap_or(defaults.runtime_module),
            source_config_module: manifest
                .source_config_module
                .clone()
                .unwrap_or(defaults.source_config_module),
            full_path_separator: manifest
                .full_path_separator
                .unwrap_or(defaults.full_path_separator),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.docs_resolved.project_dir, PathBuf::from("/test"));
        assert_eq!(
            config.docs_resolved.content_dir(),
            PathBuf::from("/test/content/docs")
        );
        assert_eq!(config.docs_resolved.extension, "mdx");
        assert_eq!(config.docs_resolved.base_url, "/blog");
        assert_eq!(
            config.manifest_resolved.path,
            PathBuf::from("/test/.source/index.ts")
        );
        assert_eq!(config.manifest_resolved.module_prefix, "../content/docs");
        assert_eq!(config.manifest_resolved.duplicates, Duplicates::KeepExisting);
        assert_eq!(config.store.backend, StoreBackend::Fs);
        assert_eq!(config.github.branch, "main");
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 7979);
        assert_eq!(config.store.backend, StoreBackend::Fs);
    }

    #[test]
    fn test_parse_server_config() {
        let toml = r#"
[server]
host = "0.0.0.0"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_parse_store_and_github() {
        let toml = r#"
[store]
backend = "github"

[github]
repo = "octo/blog"
token = "ghp_x"
branch = "drafts"
committer_name = "Docs Bot"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Github);
        assert_eq!(config.github.repo.as_deref(), Some("octo/blog"));
        assert_eq!(config.github.branch, "drafts");
        assert_eq!(config.github.committer_name, "Docs Bot");
        assert_eq!(config.github.committer_email, "bot@scribe.invalid");
        config.require_github().unwrap();
    }

    #[test]
    fn test_parse_duplicates_policy() {
        let toml = r#"
[manifest]
duplicates = "append"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.manifest_resolved.duplicates, Duplicates::Append);
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
project_dir = "site"
content_dir = "/content/guides/"
extension = ".md"

[manifest]
path = "generated/source/index.ts"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.project_dir,
            PathBuf::from("/project/site")
        );
        assert_eq!(config.docs_resolved.content_root, "content/guides");
        assert_eq!(
            config.docs_resolved.content_dir(),
            PathBuf::from("/project/site/content/guides")
        );
        assert_eq!(config.docs_resolved.extension, "md");
        assert_eq!(
            config.manifest_resolved.path,
            PathBuf::from("/project/site/generated/source/index.ts")
        );
        assert_eq!(config.manifest_resolved.module_prefix, "../../content/guides");
    }

    #[test]
    fn test_module_prefix() {
        assert_eq!(module_prefix(".source/index.ts", "content/docs"), "../content/docs");
        assert_eq!(module_prefix("index.ts", "content/docs"), "./content/docs");
    }

    #[test]
    fn test_validate_rejects_escaping_content_dir() {
        let toml = r#"
[docs]
content_dir = "../elsewhere"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("docs.content_dir"));
    }

    #[test]
    fn test_require_github_missing_token() {
        let config = Config::default_with_base(Path::new("/test"));

        let err = config.require_github().unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("github.repo"));
    }

    #[test]
    fn test_require_github_malformed_repo() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.github.repo = Some("octo".to_owned());
        config.github.token = Some("t".to_owned());

        let err = config.require_github().unwrap_err();

        assert!(err.to_string().contains("owner/name"));
    }

    #[test]
    fn test_apply_cli_settings_store() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            store: Some(StoreBackend::Github),
            repo: Some("octo/blog".to_owned()),
            token: Some("ghp_x".to_owned()),
            branch: Some("drafts".to_owned()),
            committer_email: Some("docs@example.com".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.store.backend, StoreBackend::Github);
        assert_eq!(config.github.branch, "drafts");
        assert_eq!(config.github.committer_email, "docs@example.com");
        assert_eq!(config.github.committer_name, "Scribe Bot"); // Unchanged
        config.require_github().unwrap();
    }

    #[test]
    fn test_apply_cli_settings_project_dir_moves_manifest() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            project_dir: Some(PathBuf::from("/site")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.content_dir(),
            PathBuf::from("/site/content/docs")
        );
        assert_eq!(
            config.manifest_resolved.path,
            PathBuf::from("/site/.source/index.ts")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let config_before = Config::default_with_base(Path::new("/test"));
        let mut config = Config::default_with_base(Path::new("/test"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.server.host, config_before.server.host);
        assert_eq!(config.server.port, config_before.server.port);
        assert_eq!(
            config.docs_resolved.project_dir,
            config_before.docs_resolved.project_dir
        );
    }

    #[test]
    fn test_expand_env_vars_github() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_SCRIBE_REPO", "octo/blog");
            std::env::set_var("TEST_SCRIBE_TOKEN", "ghp_secret");
            std::env::remove_var("TEST_SCRIBE_BRANCH");
        }

        let toml = r#"
[github]
repo = "${TEST_SCRIBE_REPO}"
token = "${TEST_SCRIBE_TOKEN}"
branch = "${TEST_SCRIBE_BRANCH:-main}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert_eq!(config.github.repo.as_deref(), Some("octo/blog"));
        assert_eq!(config.github.token.as_deref(), Some("ghp_secret"));
        assert_eq!(config.github.branch, "main");

        unsafe {
            std::env::remove_var("TEST_SCRIBE_REPO");
            std::env::remove_var("TEST_SCRIBE_TOKEN");
        }
    }

    #[test]
    fn test_expand_env_vars_empty_default_is_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TEST_SCRIBE_UNSET_TOKEN");
        }

        let toml = r#"
[github]
token = "${TEST_SCRIBE_UNSET_TOKEN:-}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();

        assert!(config.github.token.is_none());
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_VAR_SCRIBE_TEST");
        }

        let toml = r#"
[github]
token = "${MISSING_VAR_SCRIBE_TEST}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_SCRIBE_TEST"));
        assert!(err.to_string().contains("github.token"));
    }

    #[test]
    fn test_load_explicit_path_not_found() {
        let result = Config::load(Some(Path::new("/nonexistent/scribe.toml")), None);

        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("scribe.toml");
        std::fs::write(
            &config_path,
            r#"
[server]
port = 8080

[docs]
base_url = "/docs"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&config_path), None).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.docs_resolved.base_url, "/docs");
        assert_eq!(config.docs_resolved.project_dir, temp_dir.path().join("."));
        assert_eq!(config.config_path, Some(config_path));
    }

    #[test]
    fn test_load_invalid_port() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("scribe.toml");
        std::fs::write(&config_path, "[server]\nport = 0\n").unwrap();

        let err = Config::load(Some(&config_path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
