//! GitHub REST API request and response types.
//!
//! Only the fields Scribe reads or writes are modeled; everything else in the
//! provider's payloads is ignored.

use serde::{Deserialize, Serialize};

/// File metadata from `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentsFile {
    /// Blob sha of the current content.
    pub sha: String,
    /// Repository path.
    #[serde(default)]
    pub path: String,
}

/// Commit author/committer identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Committer {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

impl Default for Committer {
    fn default() -> Self {
        Self {
            name: "Scribe Bot".to_owned(),
            email: "bot@scribe.invalid".to_owned(),
        }
    }
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Serialize)]
pub struct PutFileRequest {
    /// Commit message.
    pub message: String,
    /// Base64-encoded file content.
    pub content: String,
    /// Target branch.
    pub branch: String,
    /// Blob sha being replaced; required for updates, absent for creates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Committer identity.
    pub committer: Committer,
}

/// Response of a successful contents PUT.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PutFileResponse {
    /// New file metadata.
    #[serde(default)]
    pub content: Option<ContentsFile>,
    /// Created commit.
    #[serde(default)]
    pub commit: Option<CommitInfo>,
}

/// Commit reference in a PUT response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitInfo {
    /// Commit sha.
    #[serde(default)]
    pub sha: String,
    /// Web URL of the commit.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Response of `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeResponse {
    /// Tree entries (files and directories).
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
    /// True when the provider cut the listing short.
    #[serde(default)]
    pub truncated: bool,
}

/// One entry of a git tree listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    /// Repository path.
    pub path: String,
    /// Entry type: `blob` for files, `tree` for directories.
    #[serde(rename = "type")]
    pub kind: String,
}

impl TreeEntry {
    /// True for file entries.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == "blob"
    }
}
