//! Filesystem document store for Scribe.
//!
//! [`FsStore`] writes authored documents below a local documents root. It is
//! create-only: an existing document is never overwritten, and the write is
//! atomic (temporary file in the destination directory, synced, then renamed
//! without clobbering). Two concurrent creators of the same path therefore
//! cannot both succeed; the loser gets [`StoreErrorKind::AlreadyExists`].
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use scribe_storage::{DocumentPath, DocumentStore};
//! use scribe_storage_fs::FsStore;
//!
//! let store = FsStore::new(PathBuf::from("content/docs"), "mdx");
//! let path = DocumentPath::derive(Some("dsa"), "3Sum", "mdx")?;
//! store.put(&path, "---\ntitle: \"3Sum\"\n---\n\n# 3Sum")?;
//! ```

mod scanner;

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use scribe_storage::{DocumentPath, DocumentStore, PutOutcome, StoreError, StoreErrorKind};

use scanner::Scanner;

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Create-only filesystem store.
pub struct FsStore {
    /// Documents root (e.g. `<site>/content/docs`).
    root: PathBuf,
    /// Content extension used when scanning.
    extension: String,
}

impl FsStore {
    /// Create a store rooted at `root`.
    ///
    /// # Arguments
    ///
    /// * `root` - Documents root directory (created on first write)
    /// * `extension` - Content extension without the dot (e.g., "mdx")
    #[must_use]
    pub fn new(root: PathBuf, extension: &str) -> Self {
        Self {
            root,
            extension: extension.trim_start_matches('.').to_owned(),
        }
    }

    /// Write a new document, failing if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreErrorKind::AlreadyExists`] if a file is present at the
    /// destination, or an I/O-derived [`StoreError`] if the write fails.
    pub fn put_exclusive(
        &self,
        path: &DocumentPath,
        content: &str,
    ) -> Result<PutOutcome, StoreError> {
        let dest = path.file_path(&self.root);

        if dest.exists() {
            return Err(Self::already_exists(path));
        }

        let Some(dir) = dest.parent() else {
            return Err(StoreError::new(StoreErrorKind::InvalidPath)
                .with_backend(BACKEND)
                .with_path(&dest));
        };
        fs::create_dir_all(dir).map_err(|e| Self::io_error(e, dir.to_path_buf()))?;

        // Temp file lives in the same directory so the final rename is atomic.
        let mut tmp = tempfile::Builder::new()
            .prefix(".scribe-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| Self::io_error(e, dir.to_path_buf()))?;
        tmp.write_all(content.as_bytes())
            .and_then(|()| tmp.flush())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| Self::io_error(e, dest.clone()))?;

        // Dropping the failed temp file removes it.
        tmp.persist_noclobber(&dest).map_err(|e| {
            if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                Self::already_exists(path)
            } else {
                Self::io_error(e.error, dest.clone())
            }
        })?;

        tracing::info!(path = %path, "Created document");

        Ok(PutOutcome {
            created: true,
            revision: None,
            commit_url: None,
        })
    }

    fn already_exists(path: &DocumentPath) -> StoreError {
        StoreError::new(StoreErrorKind::AlreadyExists)
            .with_backend(BACKEND)
            .with_path(path.relative())
    }

    fn io_error(err: std::io::Error, path: PathBuf) -> StoreError {
        StoreError::io(err, Some(path)).with_backend(BACKEND)
    }
}

impl DocumentStore for FsStore {
    fn put(&self, path: &DocumentPath, content: &str) -> Result<PutOutcome, StoreError> {
        self.put_exclusive(path, content)
    }

    fn scan(&self) -> Result<Vec<String>, StoreError> {
        Scanner::new(self.root.clone(), &self.extension)
            .scan()
            .map_err(|e| Self::io_error(e, self.root.clone()))
    }

    fn backend(&self) -> &'static str {
        BACKEND
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;

    fn doc_path(category: &str, title: &str) -> DocumentPath {
        DocumentPath::derive(Some(category), title, "mdx").unwrap()
    }

    #[test]
    fn test_put_exclusive_creates_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(temp_dir.path().join("content/docs"), "mdx");

        let outcome = store.put_exclusive(&doc_path("dsa", "3Sum!!"), "# hi").unwrap();

        assert!(outcome.created);
        let written = fs::read_to_string(temp_dir.path().join("content/docs/dsa/3sum.mdx")).unwrap();
        assert_eq!(written, "# hi");
    }

    #[test]
    fn test_put_exclusive_refuses_overwrite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(temp_dir.path().to_path_buf(), "mdx");
        let path = doc_path("dsa", "3Sum");

        store.put_exclusive(&path, "first").unwrap();
        let err = store.put_exclusive(&path, "second").unwrap_err();

        assert_eq!(err.kind, StoreErrorKind::AlreadyExists);
        assert_eq!(err.backend, Some("Fs"));
        let written = fs::read_to_string(temp_dir.path().join("dsa/3sum.mdx")).unwrap();
        assert_eq!(written, "first");
    }

    #[test]
    fn test_put_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(temp_dir.path().to_path_buf(), "mdx");
        let path = doc_path("dsa", "3Sum");

        store.put(&path, "first").unwrap();
        let _ = store.put(&path, "second");

        let names: Vec<_> = fs::read_dir(temp_dir.path().join("dsa"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["3sum.mdx"]);
    }

    #[test]
    fn test_concurrent_creators_one_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsStore::new(temp_dir.path().to_path_buf(), "mdx"));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.put(&doc_path("dsa", "Race"), &format!("writer {i}")))
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let created = results.iter().filter(|r| r.is_ok()).count();

        assert_eq!(created, 1);
        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert_eq!(err.kind, StoreErrorKind::AlreadyExists);
        }
    }

    #[test]
    fn test_scan_returns_relative_paths() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(temp_dir.path().to_path_buf(), ".mdx");

        store.put(&doc_path("dsa", "3Sum"), "a").unwrap();
        store.put(&doc_path("react", "Intro"), "b").unwrap();

        let mut paths = store.scan().unwrap();
        paths.sort();

        assert_eq!(paths, vec!["dsa/3sum.mdx", "react/intro.mdx"]);
    }

    #[test]
    fn test_backend_name() {
        let store = FsStore::new(PathBuf::from("docs"), "mdx");
        assert_eq!(store.backend(), "Fs");
    }
}
