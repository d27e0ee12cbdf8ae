//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use scribe_site::SiteLoader;

use crate::authoring::AuthoringService;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Write path for new documents.
    pub(crate) authoring: Arc<AuthoringService>,
    /// Document index, invalidated after each registration.
    pub(crate) site_loader: Arc<SiteLoader>,
}
