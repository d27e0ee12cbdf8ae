//! Error types for the HTTP server.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::authoring::AuthoringError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Request body is not valid JSON for the endpoint.
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] JsonRejection),

    /// Submission failed.
    #[error(transparent)]
    Authoring(#[from] AuthoringError),
}

impl ServerError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJson(_) => StatusCode::BAD_REQUEST,
            Self::Authoring(e) => match e {
                AuthoringError::Validation(_) => StatusCode::BAD_REQUEST,
                AuthoringError::Conflict(_) => StatusCode::CONFLICT,
                AuthoringError::Configuration
                | AuthoringError::StoreAuth(_)
                | AuthoringError::StorePermission(_)
                | AuthoringError::StoreNotFound(_)
                | AuthoringError::Store(_)
                | AuthoringError::Unclassified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (status, axum::Json(json!({"error": self.to_string()}))).into_response()
    }
}
