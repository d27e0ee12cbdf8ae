//! GitHub REST API client.
//!
//! Provides a sync HTTP client for the repository contents and git trees
//! endpoints, authenticated with a bearer token.

use std::time::Duration;

use scribe_storage::{StoreError, StoreErrorKind};
use ureq::Agent;

use crate::BACKEND;
use crate::types::{ContentsFile, PutFileRequest, PutFileResponse, TreeResponse};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Default API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub REST API version header value.
const API_VERSION: &str = "2022-11-28";

/// Repository identifier in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub name: String,
}

/// Error parsing a repository identifier.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("repository {0:?} is not in owner/name form")]
pub struct RepositoryError(String);

impl Repository {
    /// Parse `owner/name`.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] when either part is missing or there are
    /// more than two parts.
    pub fn parse(value: &str) -> Result<Self, RepositoryError> {
        let mut parts = value.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(name), None) if !owner.is_empty() && !name.is_empty() => {
                Ok(Self {
                    owner: owner.to_owned(),
                    name: name.to_owned(),
                })
            }
            _ => Err(RepositoryError(value.to_owned())),
        }
    }
}

impl std::fmt::Display for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Contents operations the store needs from the provider.
///
/// [`GithubClient`] is the production implementation. Tests substitute an
/// in-memory one to exercise the create/update decision without a network.
pub trait ContentsApi: Send + Sync {
    /// Current metadata of a file, or `None` if it does not exist (HTTP 404).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] for any failure other than a missing file.
    fn get_file(&self, path: &str, branch: &str) -> Result<Option<ContentsFile>, StoreError>;

    /// Create or update a file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] classified by HTTP status.
    fn put_file(&self, path: &str, request: &PutFileRequest)
    -> Result<PutFileResponse, StoreError>;

    /// Recursive tree listing of a branch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] classified by HTTP status.
    fn list_tree(&self, branch: &str) -> Result<TreeResponse, StoreError>;
}

/// GitHub REST API client.
pub struct GithubClient {
    agent: Agent,
    api_url: String,
    token: String,
    repository: Repository,
}

impl GithubClient {
    /// Create a client.
    ///
    /// # Arguments
    /// * `api_url` - API base URL (e.g. [`DEFAULT_API_URL`])
    /// * `token` - Token with `contents: write` on the repository
    /// * `repository` - Target repository
    #[must_use]
    pub fn new(api_url: &str, token: &str, repository: Repository) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: api_url.trim_end_matches('/').to_owned(),
            token: token.to_owned(),
            repository,
        }
    }

    fn repo_url(&self) -> String {
        format!(
            "{}/repos/{}/{}",
            self.api_url, self.repository.owner, self.repository.name
        )
    }

    fn contents_url(&self, path: &str) -> String {
        format!("{}/contents/{}", self.repo_url(), path.trim_start_matches('/'))
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl ContentsApi for GithubClient {
    fn get_file(&self, path: &str, branch: &str) -> Result<Option<ContentsFile>, StoreError> {
        let url = self.contents_url(path);
        tracing::debug!(path, branch, "Reading file metadata");

        let response = self
            .agent
            .get(&url)
            .query("ref", branch)
            .header("Authorization", &self.authorization())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", "scribe")
            .call()
            .map_err(|e| transport_error(e, path))?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status == 404 {
            return Ok(None);
        }
        if status >= 400 {
            return Err(status_error(status, &mut body_reader, path));
        }

        let file: ContentsFile = body_reader
            .read_json()
            .map_err(|e| transport_error(e, path))?;
        Ok(Some(file))
    }

    fn put_file(
        &self,
        path: &str,
        request: &PutFileRequest,
    ) -> Result<PutFileResponse, StoreError> {
        let url = self.contents_url(path);
        tracing::debug!(path, branch = %request.branch, update = request.sha.is_some(), "Writing file");

        let body = serde_json::to_vec(request).map_err(|e| {
            StoreError::new(StoreErrorKind::Other)
                .with_backend(BACKEND)
                .with_path(path)
                .with_source(e)
        })?;

        let response = self
            .agent
            .put(&url)
            .header("Authorization", &self.authorization())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", "scribe")
            .header("Content-Type", "application/json")
            .send(&body[..])
            .map_err(|e| transport_error(e, path))?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            return Err(status_error(status, &mut body_reader, path));
        }

        body_reader
            .read_json()
            .map_err(|e| transport_error(e, path))
    }

    fn list_tree(&self, branch: &str) -> Result<TreeResponse, StoreError> {
        let url = format!("{}/git/trees/{branch}", self.repo_url());
        tracing::debug!(branch, "Listing repository tree");

        let response = self
            .agent
            .get(&url)
            .query("recursive", "1")
            .header("Authorization", &self.authorization())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", "scribe")
            .call()
            .map_err(|e| transport_error(e, branch))?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            return Err(status_error(status, &mut body_reader, branch));
        }

        body_reader
            .read_json()
            .map_err(|e| transport_error(e, branch))
    }
}

/// Build an error from a non-success response, keeping the provider's message.
fn status_error(status: u16, body_reader: &mut ureq::Body, path: &str) -> StoreError {
    let error_body = body_reader
        .read_to_string()
        .unwrap_or_else(|_| "(unable to read error body)".to_owned());
    StoreError::http(status, provider_message(&error_body))
        .with_backend(BACKEND)
        .with_path(path)
}

/// Extract `message` from a GitHub error body, falling back to the raw body.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| body.to_owned())
}

fn transport_error(err: ureq::Error, path: &str) -> StoreError {
    let kind = match err {
        ureq::Error::Timeout(_) => StoreErrorKind::Timeout,
        ureq::Error::Io(_) | ureq::Error::ConnectionFailed | ureq::Error::HostNotFound => {
            StoreErrorKind::Unavailable
        }
        _ => StoreErrorKind::Other,
    };
    StoreError::new(kind)
        .with_backend(BACKEND)
        .with_path(path)
        .with_source(err)
}
