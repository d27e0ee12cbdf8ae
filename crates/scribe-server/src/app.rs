//! Router construction.
//!
//! Builds the axum router with all routes and middleware. API responses are
//! never cached; the embedded form is.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/docs",
            get(handlers::docs::list_docs).post(handlers::docs::create_doc),
        )
        .route("/api/create-doc", post(handlers::docs::create_doc))
        .layer(security::no_store_layer());

    Router::new()
        .merge(api_routes)
        .merge(static_files::static_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer())
                .layer(security::referrer_policy_layer()),
        )
        .with_state(state)
}
