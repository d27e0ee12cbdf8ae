//! [`DocumentStore`] implementation over the GitHub contents API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use scribe_storage::{DocumentPath, DocumentStore, PutOutcome, StoreError};

use crate::BACKEND;
use crate::client::{ContentsApi, GithubClient};
use crate::types::{Committer, PutFileRequest};

/// A document's location in the repository and its current blob sha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Repository path.
    pub path: String,
    /// Current blob sha, `None` if the file does not exist yet.
    pub sha: Option<String>,
    /// Branch the sha was read from.
    pub branch: String,
}

impl RemoteFile {
    /// True if the file already exists on the branch.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.sha.is_some()
    }
}

/// Create-or-update document store backed by a GitHub repository.
///
/// Every `put` is one commit. The store reads the file's current sha first
/// and sends it back with the update; a file that does not exist is created.
/// There is no locking between the read and the write, so two concurrent
/// submissions for the same path race at the provider.
pub struct GithubStore<C: ContentsApi = GithubClient> {
    api: C,
    branch: String,
    content_dir: String,
    extension: String,
    committer: Committer,
}

impl<C: ContentsApi> GithubStore<C> {
    /// Create a store.
    ///
    /// # Arguments
    /// * `api` - Contents API implementation
    /// * `branch` - Branch to read from and commit to
    /// * `content_dir` - Documents root inside the repository (e.g. `content/docs`)
    /// * `extension` - Content extension without the dot
    pub fn new(api: C, branch: &str, content_dir: &str, extension: &str) -> Self {
        Self {
            api,
            branch: branch.to_owned(),
            content_dir: content_dir.trim_matches('/').to_owned(),
            extension: extension.trim_start_matches('.').to_owned(),
            committer: Committer::default(),
        }
    }

    /// Set the commit identity.
    #[must_use]
    pub fn with_committer(mut self, committer: Committer) -> Self {
        self.committer = committer;
        self
    }

    /// Look up the current state of a document on the branch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails for any reason other than
    /// the file not existing.
    pub fn resolve(&self, path: &DocumentPath) -> Result<RemoteFile, StoreError> {
        let repo_path = path.repo_path(&self.content_dir);
        let sha = self.api.get_file(&repo_path, &self.branch)?.map(|f| f.sha);
        Ok(RemoteFile {
            path: repo_path,
            sha,
            branch: self.branch.clone(),
        })
    }
}

/// Commit message for a document write.
fn commit_message(path: &DocumentPath, update: bool) -> String {
    if update {
        format!("Update doc: {}", path.relative())
    } else {
        format!("Add doc: {}", path.relative())
    }
}

impl<C: ContentsApi> DocumentStore for GithubStore<C> {
    fn put(&self, path: &DocumentPath, content: &str) -> Result<PutOutcome, StoreError> {
        let remote = self.resolve(path)?;
        let update = remote.exists();

        let request = PutFileRequest {
            message: commit_message(path, update),
            content: STANDARD.encode(content.as_bytes()),
            branch: remote.branch,
            sha: remote.sha,
            committer: self.committer.clone(),
        };

        let response = self.api.put_file(&remote.path, &request)?;
        let commit_url = response.commit.and_then(|c| c.html_url);

        tracing::info!(
            path = %remote.path,
            branch = %self.branch,
            update,
            commit_url = commit_url.as_deref().unwrap_or(""),
            "Committed document"
        );

        Ok(PutOutcome {
            created: !update,
            revision: response.content.map(|c| c.sha),
            commit_url,
        })
    }

    fn scan(&self) -> Result<Vec<String>, StoreError> {
        let listing = self.api.list_tree(&self.branch)?;
        if listing.truncated {
            tracing::warn!(branch = %self.branch, "Repository tree listing was truncated");
        }

        let prefix = if self.content_dir.is_empty() {
            String::new()
        } else {
            format!("{}/", self.content_dir)
        };
        let suffix = format!(".{}", self.extension);

        Ok(listing
            .tree
            .into_iter()
            .filter(|entry| entry.is_file())
            .filter_map(|entry| {
                let rel = entry.path.strip_prefix(&prefix)?;
                rel.ends_with(&suffix).then(|| rel.to_owned())
            })
            .collect())
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}
