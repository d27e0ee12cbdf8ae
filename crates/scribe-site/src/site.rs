//! Site document index.

use serde::Serialize;

/// A document as the site exposes it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentInfo {
    /// Path relative to the documents root (`dsa/3sum.mdx`).
    pub path: String,
    /// Site URL (`/blog/dsa/3sum`).
    pub url: String,
    /// Display title.
    pub title: String,
    /// Category label, if the document has one.
    pub category: Option<String>,
    /// Manifest binding index.
    pub binding: u32,
}

/// Immutable snapshot of every registered document, in manifest order.
#[derive(Clone, Debug, Default)]
pub struct Site {
    documents: Vec<DocumentInfo>,
}

impl Site {
    pub(crate) fn new(documents: Vec<DocumentInfo>) -> Self {
        Self { documents }
    }

    /// Documents in manifest order.
    #[must_use]
    pub fn documents(&self) -> &[DocumentInfo] {
        &self.documents
    }

    /// Number of documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// True if no documents are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
