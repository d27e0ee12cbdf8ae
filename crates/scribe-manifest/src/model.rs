//! Manifest data model.

use scribe_storage::DocumentPath;
use serde::{Deserialize, Serialize};

use crate::format::ManifestFormat;

/// Auxiliary list written after the entries when the source had none.
pub(crate) const EMPTY_AUXILIARY: &str = "[]";

/// `info` object of a registration entry, as it appears in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EntryInfo {
    pub path: String,
    pub full_path: String,
}

/// Document to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Path relative to the documents root (`dsa/3sum.mdx`).
    pub path: String,
    /// Project-relative path as written in `fullPath`.
    pub full_path: String,
}

impl NewEntry {
    /// Entry for a relative document path.
    #[must_use]
    pub fn new(path: &str, format: &ManifestFormat) -> Self {
        Self {
            path: path.to_owned(),
            full_path: format.full_path(path),
        }
    }

    /// Entry for an authored document.
    #[must_use]
    pub fn for_document(path: &DocumentPath, format: &ManifestFormat) -> Self {
        Self::new(&path.relative(), format)
    }
}

/// Registered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path relative to the documents root.
    pub path: String,
    /// Project-relative path.
    pub full_path: String,
    /// Import binding index (`docs_<binding>`).
    pub binding: u32,
}

/// Ordered registry of documents, as parsed from or written to the manifest source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub(crate) entries: Vec<ManifestEntry>,
    /// Highest binding seen in imports or entries.
    pub(crate) highest_binding: Option<u32>,
    /// Raw text of the list passed after the entries.
    pub(crate) auxiliary: String,
    /// Import statements other than content, runtime and schema imports.
    /// The auxiliary list may reference them.
    pub(crate) extra_imports: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            highest_binding: None,
            auxiliary: EMPTY_AUXILIARY.to_owned(),
            extra_imports: Vec::new(),
        }
    }
}

impl Manifest {
    /// Empty manifest.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries in registration order.
    #[must_use]
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry registered for `path`, if any.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Binding the next registration will receive.
    ///
    /// One more than the highest binding used by any import or entry, so
    /// indices are never reused even if an import was left without an entry.
    /// Once `u32::MAX` is taken, the next [`push`](Self::push) renumbers the
    /// entries from `0` and this is the entry count.
    #[must_use]
    pub fn next_binding(&self) -> u32 {
        match self.highest_binding {
            None => 0,
            Some(highest) => highest
                .checked_add(1)
                .unwrap_or_else(|| u32::try_from(self.entries.len()).unwrap_or(u32::MAX)),
        }
    }

    /// Append an entry with the next binding and return that binding.
    ///
    /// Does not check for duplicates.
    pub fn push(&mut self, entry: &NewEntry) -> u32 {
        if self.highest_binding == Some(u32::MAX) {
            self.renumber();
        }
        let binding = self.next_binding();
        self.entries.push(ManifestEntry {
            path: entry.path.clone(),
            full_path: entry.full_path.clone(),
            binding,
        });
        self.highest_binding = Some(binding);
        binding
    }

    /// Reassign bindings `0..len` in entry order.
    pub(crate) fn renumber(&mut self) {
        tracing::warn!(entries = self.entries.len(), "Renumbering manifest bindings");
        self.highest_binding = None;
        for (entry, binding) in self.entries.iter_mut().zip(0..) {
            entry.binding = binding;
            self.highest_binding = Some(binding);
        }
    }

    /// Record a binding seen while parsing.
    pub(crate) fn observe_binding(&mut self, binding: u32) {
        self.highest_binding = Some(self.highest_binding.map_or(binding, |b| b.max(binding)));
    }
}
