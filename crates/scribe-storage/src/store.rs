//! Document store trait and error types.
//!
//! Provides the core [`DocumentStore`] trait implemented by each backend,
//! along with [`StoreError`] for unified error handling across backends.

use std::path::PathBuf;

use crate::path::DocumentPath;

/// Result of a successful [`DocumentStore::put`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PutOutcome {
    /// True if the document did not exist before this write.
    pub created: bool,
    /// Backend revision of the new content (e.g. a git blob sha).
    pub revision: Option<String>,
    /// Link to the change at the provider (e.g. a commit page).
    pub commit_url: Option<String>,
}

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorKind {
    /// Resource does not exist (repository, branch or path).
    NotFound,
    /// Credentials missing, invalid or expired.
    Unauthorized,
    /// Credentials valid but insufficient (or branch protected).
    PermissionDenied,
    /// Document already exists (create-only backends).
    AlreadyExists,
    /// Invalid path or identifier.
    InvalidPath,
    /// Backend is temporarily unavailable.
    Unavailable,
    /// Too many requests.
    RateLimited,
    /// Operation timed out.
    Timeout,
    /// Other/unknown error category.
    Other,
}

impl StoreErrorKind {
    /// Classify an HTTP status code returned by a remote backend.
    #[must_use]
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthorized,
            403 => Self::PermissionDenied,
            404 => Self::NotFound,
            408 | 504 => Self::Timeout,
            429 => Self::RateLimited,
            500..=599 => Self::Unavailable,
            _ => Self::Other,
        }
    }
}

/// Store error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StoreError {
    /// Semantic error category.
    pub kind: StoreErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "GitHub", "Mock").
    pub backend: Option<&'static str>,
    /// HTTP status returned by a remote backend.
    pub http_status: Option<u16>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Create a new store error.
    #[must_use]
    pub fn new(kind: StoreErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            http_status: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach a plain message as the error source.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        let message: String = message.into();
        self.source = Some(message.into());
        self
    }

    /// Create an error from an HTTP error response.
    #[must_use]
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        let mut error = Self::new(StoreErrorKind::from_http_status(status)).with_message(body);
        error.http_status = Some(status);
        error
    }

    /// Create a store error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StoreErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StoreErrorKind::PermissionDenied,
            std::io::ErrorKind::AlreadyExists => StoreErrorKind::AlreadyExists,
            std::io::ErrorKind::TimedOut => StoreErrorKind::Timeout,
            _ => StoreErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind (HTTP 403): message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StoreErrorKind::NotFound => "Not found",
            StoreErrorKind::Unauthorized => "Unauthorized",
            StoreErrorKind::PermissionDenied => "Permission denied",
            StoreErrorKind::AlreadyExists => "Already exists",
            StoreErrorKind::InvalidPath => "Invalid path",
            StoreErrorKind::Unavailable => "Unavailable",
            StoreErrorKind::RateLimited => "Rate limited",
            StoreErrorKind::Timeout => "Timeout",
            StoreErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(status) = self.http_status {
            write!(f, " (HTTP {status})")?;
        }

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Backend that persists document content.
///
/// Implementations are blocking; async callers run them on a blocking pool.
pub trait DocumentStore: Send + Sync {
    /// Write a document.
    ///
    /// Create-only backends fail with [`StoreErrorKind::AlreadyExists`] when
    /// the document exists. Versioned backends update it in place.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] classified by cause (auth, permission, conflict...).
    fn put(&self, path: &DocumentPath, content: &str) -> Result<PutOutcome, StoreError>;

    /// List every document below the documents root.
    ///
    /// Paths are relative to the root with `/` separators, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be listed.
    fn scan(&self) -> Result<Vec<String>, StoreError>;

    /// Backend identifier used in logs and error messages.
    fn backend(&self) -> &'static str;
}
