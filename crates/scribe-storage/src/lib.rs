//! Document store abstraction for the Scribe documentation engine.
//!
//! This crate holds everything the authoring path needs before it touches a
//! concrete backend:
//!
//! - [`slug::normalize`] turns free text into URL and filesystem safe identifiers
//! - [`DocumentPath`] derives the `category/slug.ext` key of a document
//! - [`render_document`] and [`parse_front_matter`] handle the document file format
//! - [`DocumentStore`] is the trait implemented by each backend
//! - [`MockStore`] is an in-memory store for tests (behind the `mock` feature)
//!
//! # Backends
//!
//! - `scribe-storage-fs`: local filesystem, create-only
//! - `scribe-storage-github`: GitHub contents API, create or update
//!
//! # Example
//!
//! ```ignore
//! use scribe_storage::{DocumentPath, DocumentStore, render_document, FrontMatter};
//!
//! let path = DocumentPath::derive(Some("dsa"), "3Sum!!", "mdx")?;
//! let content = render_document(&FrontMatter::new("3Sum!!", "dsa"), "# hi");
//! let outcome = store.put(&path, &content)?;
//! ```

mod document;
#[cfg(feature = "mock")]
mod mock;
mod path;
pub mod slug;
mod store;

pub use document::{DocumentDraft, FrontMatter, parse_front_matter, render_document};
#[cfg(feature = "mock")]
pub use mock::MockStore;
pub use path::{DEFAULT_CATEGORY, DocumentPath, PathError};
pub use store::{DocumentStore, PutOutcome, StoreError, StoreErrorKind};
