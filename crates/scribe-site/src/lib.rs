//! Document index for the Scribe site.
//!
//! This crate provides:
//! - [`SiteLoader`]: reads the generated manifest and builds a [`Site`]
//! - [`DocumentInfo`]: path, URL, title and category of one document
//!
//! The manifest is the source of truth for which documents exist; front
//! matter supplies display metadata.

mod site;
mod site_loader;

pub use site::{DocumentInfo, Site};
pub use site_loader::{SiteLoader, SiteLoaderConfig};
