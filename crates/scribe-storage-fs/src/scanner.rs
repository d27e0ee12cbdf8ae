//! Document discovery by filesystem walking.
//!
//! Used by reconciliation to find every document below the documents root,
//! whether or not it was authored through Scribe.

use std::fs;
use std::path::{Path, PathBuf};

/// Walks a documents root and collects document paths.
pub(crate) struct Scanner {
    root: PathBuf,
    extension: String,
}

impl Scanner {
    /// Create a new Scanner.
    ///
    /// # Arguments
    ///
    /// * `root` - Documents root to scan
    /// * `extension` - Content extension without the dot (e.g., "mdx")
    pub(crate) fn new(root: PathBuf, extension: &str) -> Self {
        Self {
            root,
            extension: extension.to_owned(),
        }
    }

    /// Scan and return relative document paths with `/` separators.
    ///
    /// Returns an empty Vec if the root doesn't exist.
    pub(crate) fn scan(&self) -> std::io::Result<Vec<String>> {
        let mut paths = Vec::new();
        if self.root.exists() {
            self.scan_directory(&self.root, "", &mut paths)?;
        }
        Ok(paths)
    }

    fn scan_directory(
        &self,
        dir_path: &Path,
        prefix: &str,
        paths: &mut Vec<String>,
    ) -> std::io::Result<()> {
        for entry in fs::read_dir(dir_path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();

            // Hidden files and editor temp files
            if name.starts_with('.') || name.ends_with('~') {
                continue;
            }

            let rel = if prefix.is_empty() {
                name
            } else {
                format!("{prefix}/{name}")
            };

            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                if matches!(entry.file_name().to_str(), Some("node_modules")) {
                    continue;
                }
                self.scan_directory(&entry.path(), &rel, paths)?;
            } else if entry
                .path()
                .extension()
                .is_some_and(|e| e == self.extension.as_str())
            {
                paths.push(rel);
            }
        }
        Ok(())
    }
}
