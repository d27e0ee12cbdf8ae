//! Mock store implementation for testing.
//!
//! Provides [`MockStore`] for unit testing without filesystem or network access.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::path::DocumentPath;
use crate::store::{DocumentStore, PutOutcome, StoreError, StoreErrorKind};

const BACKEND: &str = "Mock";

/// Mock store for testing.
///
/// Stores documents in memory keyed by their relative path. By default it
/// behaves like a versioned backend (create or update); [`exclusive`](Self::exclusive)
/// switches it to create-only semantics like the filesystem backend.
///
/// # Example
///
/// ```ignore
/// use scribe_storage::{MockStore, DocumentStore};
///
/// let store = MockStore::new()
///     .exclusive()
///     .with_file("dsa/3sum.mdx", "---\ntitle: 3Sum\n---\n\n# 3Sum");
///
/// assert!(store.put(&path, "content").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockStore {
    files: RwLock<HashMap<String, String>>,
    exclusive: bool,
    failure: RwLock<Option<StoreErrorKind>>,
    writes: RwLock<Vec<String>>,
}

impl MockStore {
    /// Create a new empty versioned mock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the store create-only: `put` on an existing path fails.
    #[must_use]
    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    /// Add an existing document.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Make every subsequent `put` and `scan` fail with `kind`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn fail_with(&self, kind: StoreErrorKind) {
        *self.failure.write().unwrap() = Some(kind);
    }

    /// Content stored at a relative path.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn content(&self, path: &str) -> Option<String> {
        self.files.read().unwrap().get(path).cloned()
    }

    /// Relative paths of successful writes, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes.read().unwrap().clone()
    }

    fn check_failure(&self, path: Option<&str>) -> Result<(), StoreError> {
        if let Some(kind) = *self.failure.read().unwrap() {
            let mut err = StoreError::new(kind).with_backend(BACKEND);
            if let Some(path) = path {
                err = err.with_path(path);
            }
            return Err(err);
        }
        Ok(())
    }
}

impl DocumentStore for MockStore {
    fn put(&self, path: &DocumentPath, content: &str) -> Result<PutOutcome, StoreError> {
        let key = path.relative();
        self.check_failure(Some(&key))?;

        let mut files = self.files.write().unwrap();
        let existed = files.contains_key(&key);
        if existed && self.exclusive {
            return Err(StoreError::new(StoreErrorKind::AlreadyExists)
                .with_backend(BACKEND)
                .with_path(&key));
        }

        files.insert(key.clone(), content.to_owned());
        let revision = format!("rev-{}", content.len());
        self.writes.write().unwrap().push(key);

        Ok(PutOutcome {
            created: !existed,
            revision: Some(revision),
            commit_url: None,
        })
    }

    fn scan(&self) -> Result<Vec<String>, StoreError> {
        self.check_failure(None)?;
        Ok(self.files.read().unwrap().keys().cloned().collect())
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}
