//! Response headers for the authoring UI and API.
//!
//! Every response gets a CSP that only allows the embedded form to talk to
//! its own origin, plus `nosniff`, `DENY` framing and `no-referrer`. API
//! responses are additionally marked `no-store`: they reflect the manifest
//! at the moment of the request.

use axum::http::HeaderValue;
use axum::http::header::{self, HeaderName};
use tower_http::set_header::SetResponseHeaderLayer;

/// Content-Security-Policy for the embedded form.
const CSP: &str = "default-src 'self'; \
                   script-src 'self'; \
                   style-src 'self' 'unsafe-inline'; \
                   img-src 'self' data:; \
                   connect-src 'self'; \
                   form-action 'self'; \
                   base-uri 'none'; \
                   frame-ancestors 'none'";

fn overriding(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

pub(crate) fn csp_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(header::CONTENT_SECURITY_POLICY, CSP)
}

pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
}

pub(crate) fn frame_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(header::X_FRAME_OPTIONS, "DENY")
}

/// Drafts may carry unpublished titles in the page URL.
pub(crate) fn referrer_policy_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(header::REFERRER_POLICY, "no-referrer")
}

/// For `/api` routes only. Static assets stay cacheable.
pub(crate) fn no_store_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(header::CACHE_CONTROL, "no-store")
}
