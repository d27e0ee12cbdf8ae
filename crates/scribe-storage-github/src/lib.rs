//! GitHub document store for Scribe.
//!
//! Documents are committed to a repository through the REST contents API:
//! one commit per write, create or update depending on whether the file
//! already exists on the configured branch.
//!
//! # Example
//!
//! ```ignore
//! use scribe_storage::{DocumentPath, DocumentStore};
//! use scribe_storage_github::{GithubClient, GithubStore, Repository, DEFAULT_API_URL};
//!
//! let client = GithubClient::new(DEFAULT_API_URL, &token, Repository::parse("octo/blog")?);
//! let store = GithubStore::new(client, "main", "content/docs", "mdx");
//! let outcome = store.put(&DocumentPath::derive(Some("dsa"), "3Sum", "mdx")?, &content)?;
//! println!("{:?}", outcome.commit_url);
//! ```

mod client;
mod store;
mod types;

pub use client::{ContentsApi, DEFAULT_API_URL, GithubClient, Repository, RepositoryError};
pub use store::{GithubStore, RemoteFile};
pub use types::{
    CommitInfo, Committer, ContentsFile, PutFileRequest, PutFileResponse, TreeEntry, TreeResponse,
};

/// Backend identifier for error messages.
pub(crate) const BACKEND: &str = "GitHub";
