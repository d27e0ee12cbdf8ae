//! Document authoring.
//!
//! [`AuthoringService::submit`] is the single write path: validate the draft,
//! derive its path, write it to the configured store, then register it in the
//! manifest. The two writes are not transactional. If the store write succeeds
//! and the manifest update fails, the report says so and `scribe reconcile`
//! repairs the manifest later.

use std::sync::Arc;

use scribe_manifest::{ManifestFile, NewEntry, Registration};
use scribe_storage::{
    DocumentDraft, DocumentPath, DocumentStore, PathError, StoreError, StoreErrorKind,
    render_document,
};

/// Outcome of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// Document key.
    pub path: DocumentPath,
    /// Project-relative file path (`content/docs/dsa/3sum.mdx`).
    pub file: String,
    /// True if the store created the file, false if it updated it.
    pub created: bool,
    /// Link to the commit, for versioned stores.
    pub commit_url: Option<String>,
    /// Manifest registration, `None` when the manifest update failed.
    pub registration: Option<Registration>,
    /// Why the manifest update failed.
    pub manifest_error: Option<String>,
}

impl SubmitReport {
    /// True if the manifest lists the document after this submission.
    #[must_use]
    pub fn manifest_updated(&self) -> bool {
        self.registration.is_some()
    }
}

/// Submission failure. Nothing was written when this is returned.
#[derive(Debug, thiserror::Error)]
pub enum AuthoringError {
    /// Draft is incomplete or unusable.
    #[error("{0}")]
    Validation(String),
    /// Create-only store already holds the document.
    #[error("Document already exists: {0}")]
    Conflict(String),
    /// No usable store is configured.
    #[error("Missing store configuration")]
    Configuration,
    /// Store rejected the credentials.
    #[error("Store authentication failed: {0}")]
    StoreAuth(#[source] StoreError),
    /// Store credentials lack write access.
    #[error("Store permission denied: {0}")]
    StorePermission(#[source] StoreError),
    /// Repository, branch or path not found at the store.
    #[error("Store target not found: {0}")]
    StoreNotFound(#[source] StoreError),
    /// Any other store failure.
    #[error("Store error: {0}")]
    Store(#[source] StoreError),
    /// Failure outside the store (e.g. a worker task panicked).
    #[error("Internal error: {0}")]
    Unclassified(String),
}

impl From<StoreError> for AuthoringError {
    fn from(err: StoreError) -> Self {
        match err.kind {
            StoreErrorKind::AlreadyExists => {
                let path = err
                    .path
                    .as_ref()
                    .map_or_else(String::new, |p| p.display().to_string());
                Self::Conflict(path)
            }
            StoreErrorKind::Unauthorized => Self::StoreAuth(err),
            StoreErrorKind::PermissionDenied => Self::StorePermission(err),
            StoreErrorKind::NotFound => Self::StoreNotFound(err),
            _ => Self::Store(err),
        }
    }
}

impl From<PathError> for AuthoringError {
    fn from(err: PathError) -> Self {
        match err {
            PathError::EmptyTitle(_) => {
                Self::Validation("Title must contain at least one letter or digit".to_owned())
            }
        }
    }
}

/// Writes drafts to a store and registers them in the manifest.
pub struct AuthoringService {
    store: Option<Arc<dyn DocumentStore>>,
    manifest: Arc<ManifestFile>,
    content_root: String,
    extension: String,
}

impl AuthoringService {
    /// Create a service.
    ///
    /// # Arguments
    ///
    /// * `store` - Document store, `None` if the configured store is unusable
    /// * `manifest` - Manifest file
    /// * `content_root` - Documents root relative to the project (for reports)
    /// * `extension` - Content extension without the dot
    #[must_use]
    pub fn new(
        store: Option<Arc<dyn DocumentStore>>,
        manifest: Arc<ManifestFile>,
        content_root: &str,
        extension: &str,
    ) -> Self {
        Self {
            store,
            manifest,
            content_root: content_root.trim_matches('/').to_owned(),
            extension: extension.trim_start_matches('.').to_owned(),
        }
    }

    /// Manifest shared with the site loader.
    #[must_use]
    pub fn manifest(&self) -> &Arc<ManifestFile> {
        &self.manifest
    }

    /// Backend identifier of the configured store.
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.store.as_deref().map(DocumentStore::backend)
    }

    /// Submit a draft. Blocking; async callers use `spawn_blocking`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthoringError`] if validation fails or the store write
    /// fails. A manifest failure after a successful store write is reported
    /// in [`SubmitReport::manifest_error`] instead.
    pub fn submit(&self, draft: &DocumentDraft) -> Result<SubmitReport, AuthoringError> {
        if draft.title.trim().is_empty() || draft.body.trim().is_empty() {
            return Err(AuthoringError::Validation(
                "Title and markdown are required".to_owned(),
            ));
        }

        let path = DocumentPath::derive(draft.category.as_deref(), &draft.title, &self.extension)?;
        let store = self.store.as_ref().ok_or(AuthoringError::Configuration)?;

        let content = render_document(&draft.front_matter(), &draft.body);
        let outcome = store.put(&path, &content).map_err(|e| {
            tracing::warn!(path = %path, backend = store.backend(), error = %e, "Store write failed");
            match e.kind {
                StoreErrorKind::AlreadyExists => {
                    AuthoringError::Conflict(path.repo_path(&self.content_root))
                }
                _ => AuthoringError::from(e),
            }
        })?;

        let entry = NewEntry::for_document(&path, self.manifest.format());
        let (registration, manifest_error) = match self.manifest.register(&entry) {
            Ok(registration) => (Some(registration), None),
            Err(e) => {
                tracing::error!(
                    path = %path,
                    error = %e,
                    "Document stored but manifest update failed; run `scribe reconcile`"
                );
                (None, Some(e.to_string()))
            }
        };

        Ok(SubmitReport {
            file: path.repo_path(&self.content_root),
            path,
            created: outcome.created,
            commit_url: outcome.commit_url,
            registration,
            manifest_error,
        })
    }
}
