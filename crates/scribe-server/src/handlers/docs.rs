//! Document API endpoints.
//!
//! - `POST /api/docs` (alias `POST /api/create-doc`): submit a document
//! - `GET /api/docs`: list registered documents

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use scribe_site::DocumentInfo;
use scribe_storage::DocumentDraft;
use serde::{Deserialize, Serialize};

use crate::authoring::{AuthoringError, SubmitReport};
use crate::error::ServerError;
use crate::state::AppState;

/// Submission body. Missing fields become empty strings and fail validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateDocRequest {
    category: Option<String>,
    title: String,
    markdown: String,
}

impl From<CreateDocRequest> for DocumentDraft {
    fn from(req: CreateDocRequest) -> Self {
        Self {
            category: req.category,
            title: req.title,
            body: req.markdown,
        }
    }
}

/// Response for a submission whose store write succeeded.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateDocResponse {
    success: bool,
    message: String,
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    commit_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    store_written: Option<bool>,
    manifest_updated: bool,
}

impl CreateDocResponse {
    fn from_report(report: SubmitReport) -> (StatusCode, Self) {
        if report.manifest_updated() {
            let message = if report.created {
                "File created successfully"
            } else {
                "File updated successfully"
            };
            (
                StatusCode::OK,
                Self {
                    success: true,
                    message: message.to_owned(),
                    file: report.file,
                    created: Some(report.created),
                    commit_url: report.commit_url,
                    store_written: None,
                    manifest_updated: true,
                },
            )
        } else {
            (
                StatusCode::ACCEPTED,
                Self {
                    success: true,
                    message: "File saved but the manifest was not updated; run `scribe reconcile`"
                        .to_owned(),
                    file: report.file,
                    created: None,
                    commit_url: None,
                    store_written: Some(true),
                    manifest_updated: false,
                },
            )
        }
    }
}

/// Handle `POST /api/docs`.
pub(crate) async fn create_doc(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CreateDocRequest>, JsonRejection>,
) -> Result<Response, ServerError> {
    let Json(request) = body?;
    let draft = DocumentDraft::from(request);

    let authoring = Arc::clone(&state.authoring);
    let report = tokio::task::spawn_blocking(move || authoring.submit(&draft))
        .await
        .map_err(|e| AuthoringError::Unclassified(e.to_string()))??;

    if report.manifest_updated() {
        state.site_loader.invalidate();
    }
    tracing::info!(
        file = %report.file,
        created = report.created,
        manifest_updated = report.manifest_updated(),
        "Document submitted"
    );

    let (status, response) = CreateDocResponse::from_report(report);
    Ok((status, Json(response)).into_response())
}

/// Response for `GET /api/docs`.
#[derive(Debug, Serialize)]
pub(crate) struct DocsListResponse {
    documents: Vec<DocumentInfo>,
}

/// Handle `GET /api/docs`.
pub(crate) async fn list_docs(State(state): State<Arc<AppState>>) -> Json<DocsListResponse> {
    let loader = Arc::clone(&state.site_loader);
    let site = match tokio::task::spawn_blocking(move || loader.reload_if_needed()).await {
        Ok(site) => site,
        Err(e) => {
            tracing::warn!(error = %e, "Site reload failed, serving previous snapshot");
            state.site_loader.get()
        }
    };

    Json(DocsListResponse {
        documents: site.documents().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, header};
    use pretty_assertions::assert_eq;
    use scribe_manifest::{ManifestFile, ManifestFormat};
    use scribe_site::{SiteLoader, SiteLoaderConfig};
    use scribe_storage::{DocumentStore, MockStore, StoreErrorKind};
    use scribe_storage_fs::FsStore;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::app::create_router;
    use crate::authoring::AuthoringService;

    fn router(dir: &Path, store: Option<Arc<dyn DocumentStore>>, manifest_path: &Path) -> Router {
        let manifest = Arc::new(ManifestFile::new(
            manifest_path.to_path_buf(),
            ManifestFormat::default(),
        ));
        let site_loader = Arc::new(SiteLoader::new(
            SiteLoaderConfig {
                content_dir: dir.join("content/docs"),
                base_url: "/blog".to_owned(),
            },
            Arc::clone(&manifest),
        ));
        let authoring = Arc::new(AuthoringService::new(
            store,
            manifest,
            "content/docs",
            "mdx",
        ));
        create_router(Arc::new(AppState {
            authoring,
            site_loader,
        }))
    }

    fn fs_router(dir: &Path) -> Router {
        let store: Arc<dyn DocumentStore> =
            Arc::new(FsStore::new(dir.join("content/docs"), "mdx"));
        router(dir, Some(store), &dir.join(".source/index.ts"))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post(app: &Router, body: &Value) -> (StatusCode, Value) {
        send(app, "POST", "/api/docs", &body.to_string()).await
    }

    #[tokio::test]
    async fn test_create_doc_with_default_category() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = fs_router(temp_dir.path());

        let (status, body) = post(&app, &json!({"title": "3Sum!!", "markdown": "# hi"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "success": true,
                "message": "File created successfully",
                "file": "content/docs/uncategorized/3sum.mdx",
                "created": true,
                "manifestUpdated": true,
            })
        );

        let (status, list) = send(&app, "GET", "/api/docs", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["documents"][0]["path"], "uncategorized/3sum.mdx");
        assert_eq!(list["documents"][0]["url"], "/blog/uncategorized/3sum");
        assert_eq!(list["documents"][0]["title"], "3Sum!!");
    }

    #[tokio::test]
    async fn test_create_doc_twice_conflicts() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = fs_router(temp_dir.path());
        let request = json!({"category": "DSA", "title": "3Sum", "markdown": "# hi"});

        let (first, _) = post(&app, &request).await;
        let (second, body) = post(&app, &request).await;

        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("already exists"));

        let (_, list) = send(&app, "GET", "/api/docs", "").await;
        assert_eq!(list["documents"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_doc_alias_route() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = fs_router(temp_dir.path());

        let (status, body) = send(
            &app,
            "POST",
            "/api/create-doc",
            r##"{"title": "Intro", "markdown": "# intro"}"##,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["file"], "content/docs/uncategorized/intro.mdx");
    }

    #[tokio::test]
    async fn test_empty_title_is_rejected_without_writes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MockStore::new());
        let manifest_path = temp_dir.path().join(".source/index.ts");
        let app = router(
            temp_dir.path(),
            Some(Arc::clone(&store) as Arc<dyn DocumentStore>),
            &manifest_path,
        );

        let (status, body) = post(&app, &json!({"title": "", "markdown": "# hi"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Title and markdown are required"}));
        assert!(store.writes().is_empty());
        assert!(!manifest_path.exists());
    }

    #[tokio::test]
    async fn test_missing_markdown_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = fs_router(temp_dir.path());

        let (status, _) = post(&app, &json!({"title": "Intro"})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = fs_router(temp_dir.path());

        let (status, body) = send(&app, "POST", "/api/docs", "{not json").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_store_is_server_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let app = router(
            temp_dir.path(),
            None,
            &temp_dir.path().join(".source/index.ts"),
        );

        let (status, body) = post(&app, &json!({"title": "Intro", "markdown": "x"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Missing store configuration"}));
    }

    #[tokio::test]
    async fn test_store_permission_error_is_server_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(MockStore::new());
        store.fail_with(StoreErrorKind::PermissionDenied);
        let app = router(
            temp_dir.path(),
            Some(store),
            &temp_dir.path().join(".source/index.ts"),
        );

        let (status, body) = post(&app, &json!({"title": "Intro", "markdown": "x"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Store permission denied"));
    }

    #[tokio::test]
    async fn test_manifest_failure_is_accepted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manifest_path = temp_dir.path().join("index.ts");
        std::fs::create_dir_all(&manifest_path).unwrap();
        let store = Arc::new(MockStore::new());
        let app = router(
            temp_dir.path(),
            Some(Arc::clone(&store) as Arc<dyn DocumentStore>),
            &manifest_path,
        );

        let (status, body) = post(&app, &json!({"title": "Intro", "markdown": "x"})).await;

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body["success"], true);
        assert_eq!(body["storeWritten"], true);
        assert_eq!(body["manifestUpdated"], false);
        assert_eq!(body["file"], "content/docs/uncategorized/intro.mdx");
        assert_eq!(store.writes(), vec!["uncategorized/intro.mdx"]);
    }

    #[tokio::test]
    async fn test_update_reports_updated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store: Arc<dyn DocumentStore> = Arc::new(MockStore::new());
        let app = router(
            temp_dir.path(),
            Some(store),
            &temp_dir.path().join(".source/index.ts"),
        );
        let request = json!({"category": "dsa", "title": "3Sum", "markdown": "# hi"});

        post(&app, &request).await;
        let (status, body) = post(&app, &request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "File updated successfully");
        assert_eq!(body["created"], false);
    }
}
