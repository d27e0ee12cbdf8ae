//! Site loading from the generated manifest.
//!
//! Provides [`SiteLoader`], which turns manifest entries into
//! [`DocumentInfo`] records the site and the authoring UI list.
//!
//! # Thread Safety
//!
//! `SiteLoader` is shared between request handlers:
//! - `get()` returns `Arc<Site>` with minimal locking (just Arc clone)
//! - `reload_if_needed()` uses double-checked locking so only one caller rebuilds
//! - `invalidate()` is lock-free (atomic flag), called after each registration
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use scribe_manifest::{ManifestFile, ManifestFormat};
//! use scribe_site::{SiteLoader, SiteLoaderConfig};
//!
//! let manifest = Arc::new(ManifestFile::new(PathBuf::from(".source/index.ts"), ManifestFormat::default()));
//! let loader = SiteLoader::new(SiteLoaderConfig {
//!     content_dir: PathBuf::from("content/docs"),
//!     base_url: "/blog".to_owned(),
//! }, manifest);
//!
//! for doc in loader.reload_if_needed().documents() {
//!     println!("{} -> {}", doc.title, doc.url);
//! }
//! ```

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use scribe_manifest::{ManifestEntry, ManifestFile};
use scribe_storage::parse_front_matter;

use crate::site::{DocumentInfo, Site};

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Configuration for [`SiteLoader`].
#[derive(Clone, Debug)]
pub struct SiteLoaderConfig {
    /// Local documents root, used to read front matter.
    pub content_dir: PathBuf,
    /// URL prefix of document pages (e.g. `/blog`).
    pub base_url: String,
}

/// Loads the document index from the manifest.
///
/// Titles and categories come from each document's front matter when the
/// file exists under `content_dir`; otherwise they are derived from the path.
pub struct SiteLoader {
    config: SiteLoaderConfig,
    manifest: Arc<ManifestFile>,
    /// Mutex for serializing reload operations.
    reload_lock: Mutex<()>,
    /// Current site snapshot (atomically swappable).
    current_site: RwLock<Arc<Site>>,
    /// Cache validity flag.
    cache_valid: AtomicBool,
}

impl SiteLoader {
    /// Create a new site loader.
    ///
    /// # Arguments
    ///
    /// * `config` - Loader configuration
    /// * `manifest` - Manifest shared with the authoring service
    #[must_use]
    pub fn new(config: SiteLoaderConfig, manifest: Arc<ManifestFile>) -> Self {
        Self {
            config,
            manifest,
            reload_lock: Mutex::new(()),
            current_site: RwLock::new(Arc::new(Site::default())),
            cache_valid: AtomicBool::new(false),
        }
    }

    /// Get current site snapshot without checking validity.
    ///
    /// # Panics
    ///
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn get(&self) -> Arc<Site> {
        Arc::clone(&self.current_site.read().unwrap())
    }

    /// Reload from the manifest if the snapshot is invalid.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn reload_if_needed(&self) -> Arc<Site> {
        if self.cache_valid.load(Ordering::Acquire) {
            return self.get();
        }

        let _guard = self.reload_lock.lock().unwrap();

        if self.cache_valid.load(Ordering::Acquire) {
            return self.get();
        }

        let start = Instant::now();
        let site = Arc::new(self.load());

        *self.current_site.write().unwrap() = Arc::clone(&site);
        self.cache_valid.store(true, Ordering::Release);

        tracing::info!(
            document_count = site.len(),
            elapsed_ms = elapsed_ms(start),
            "Site reloaded"
        );

        site
    }

    /// Mark the snapshot stale. Readers keep their current `Arc<Site>`.
    pub fn invalidate(&self) {
        self.cache_valid.store(false, Ordering::Release);
    }

    fn load(&self) -> Site {
        let manifest = match self.manifest.load() {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read manifest");
                return Site::default();
            }
        };

        let documents = manifest
            .entries()
            .iter()
            .map(|entry| self.document_info(entry))
            .collect();
        Site::new(documents)
    }

    fn document_info(&self, entry: &ManifestEntry) -> DocumentInfo {
        let front = fs::read_to_string(self.config.content_dir.join(&entry.path))
            .ok()
            .and_then(|content| parse_front_matter(&content).map(|(front, _)| front));

        let (title, category) = match front {
            Some(front) => (front.title, front.category),
            None => (None, None),
        };

        DocumentInfo {
            url: document_url(&self.config.base_url, &entry.path),
            title: title.unwrap_or_else(|| title_from_path(&entry.path)),
            category: category.or_else(|| category_from_path(&entry.path)),
            path: entry.path.clone(),
            binding: entry.binding,
        }
    }
}

/// URL of a document: base URL, then the path without its extension.
///
/// Examples with base `/blog`:
/// - `"dsa/3sum.mdx"` -> `"/blog/dsa/3sum"`
/// - `"index.mdx"` -> `"/blog"`
/// - `"react/index.mdx"` -> `"/blog/react"`
fn document_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let stem = path.rsplit_once('.').map_or(path, |(stem, _)| stem);
    let stem = stem.strip_suffix("/index").unwrap_or(stem);

    if stem.is_empty() || stem == "index" {
        if base.is_empty() {
            "/".to_owned()
        } else {
            base.to_owned()
        }
    } else {
        format!("{base}/{stem}")
    }
}

/// Title from the file stem: `binary-search.mdx` -> `Binary search`.
fn title_from_path(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    let stem = name.rsplit_once('.').map_or(name, |(stem, _)| stem);
    let words = stem.replace(['-', '_'], " ");

    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => words,
    }
}

/// First directory of the path, if any.
fn category_from_path(path: &str) -> Option<String> {
    path.split_once('/').map(|(dir, _)| dir.to_owned())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;
    use scribe_manifest::{ManifestFormat, NewEntry};
    use scribe_storage::{FrontMatter, render_document};

    use super::*;

    fn setup(dir: &Path) -> (Arc<ManifestFile>, SiteLoader) {
        let manifest = Arc::new(ManifestFile::new(
            dir.join(".source/index.ts"),
            ManifestFormat::default(),
        ));
        let loader = SiteLoader::new(
            SiteLoaderConfig {
                content_dir: dir.join("content/docs"),
                base_url: "/blog".to_owned(),
            },
            Arc::clone(&manifest),
        );
        (manifest, loader)
    }

    fn register(manifest: &ManifestFile, path: &str) {
        manifest
            .register(&NewEntry::new(path, manifest.format()))
            .unwrap();
    }

    #[test]
    fn test_document_url() {
        assert_eq!(document_url("/blog", "dsa/3sum.mdx"), "/blog/dsa/3sum");
        assert_eq!(document_url("/blog/", "index.mdx"), "/blog");
        assert_eq!(document_url("/blog", "react/index.mdx"), "/blog/react");
        assert_eq!(document_url("", "index.mdx"), "/");
        assert_eq!(document_url("", "a/b.mdx"), "/a/b");
    }

    #[test]
    fn test_title_from_path() {
        assert_eq!(title_from_path("dsa/binary-search.mdx"), "Binary search");
        assert_eq!(title_from_path("3sum.mdx"), "3sum");
    }

    #[test]
    fn test_reads_front_matter() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (manifest, loader) = setup(temp_dir.path());
        let doc_dir = temp_dir.path().join("content/docs/dsa");
        fs::create_dir_all(&doc_dir).unwrap();
        fs::write(
            doc_dir.join("3sum.mdx"),
            render_document(&FrontMatter::new("3Sum!!", "DSA"), "# hi"),
        )
        .unwrap();
        register(&manifest, "dsa/3sum.mdx");

        let site = loader.reload_if_needed();

        assert_eq!(
            site.documents(),
            &[DocumentInfo {
                path: "dsa/3sum.mdx".to_owned(),
                url: "/blog/dsa/3sum".to_owned(),
                title: "3Sum!!".to_owned(),
                category: Some("DSA".to_owned()),
                binding: 0,
            }]
        );
    }

    #[test]
    fn test_missing_file_falls_back_to_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (manifest, loader) = setup(temp_dir.path());
        register(&manifest, "react/use-state.mdx");

        let site = loader.reload_if_needed();
        let doc = &site.documents()[0];

        assert_eq!(doc.title, "Use state");
        assert_eq!(doc.category.as_deref(), Some("react"));
    }

    #[test]
    fn test_invalidate_picks_up_new_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (manifest, loader) = setup(temp_dir.path());
        register(&manifest, "a.mdx");
        assert_eq!(loader.reload_if_needed().len(), 1);

        register(&manifest, "b.mdx");
        assert_eq!(loader.reload_if_needed().len(), 1);

        loader.invalidate();
        let site = loader.reload_if_needed();
        let paths: Vec<&str> = site.documents().iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["a.mdx", "b.mdx"]);
    }

    #[test]
    fn test_empty_manifest() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (_manifest, loader) = setup(temp_dir.path());

        assert!(loader.reload_if_needed().is_empty());
    }
}
