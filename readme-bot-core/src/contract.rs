//! # contract: the two collaborators of the update pipeline
//!
//! This module defines the traits the pipeline talks to and the plain data
//! types that cross them:
//!
//! - [`SourceHost`]: the source-hosting REST API (commit comparison, file
//!   content lookup, file update).
//! - [`ContentGenerator`]: the generative language model.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`, so `MockSourceHost` and
//!   `MockContentGenerator` are available to this crate's tests and, through
//!   the `test-export-mocks` feature, to downstream crates.
//!
//! ## Errors
//! - All methods return boxed errors. The pipeline reports them verbatim, so
//!   implementors should produce messages that are meaningful on their own.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use mockall::automock;

/// Boxed error returned by every collaborator call.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Status of a file in a commit comparison, as reported by the hosting API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    /// Anything the hosting API adds later.
    #[serde(other)]
    Unknown,
}

impl FileStatus {
    /// Only added and modified files contribute to the change set.
    pub fn is_selected(&self) -> bool {
        matches!(self, FileStatus::Added | FileStatus::Modified)
    }
}

/// One file entry from a commit comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub filename: String,
    pub status: FileStatus,
    /// Unified diff fragment. Absent for binary or oversized files.
    #[serde(default)]
    pub patch: Option<String>,
}

/// The current version of a document in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub path: String,
    /// Blob sha, used as the optimistic concurrency hash on update.
    pub sha: String,
}

/// A request to replace a file's content with a new commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileUpdate {
    pub path: String,
    pub message: String,
    /// Standard base64 of the new UTF-8 content.
    pub content_base64: String,
    /// Sha of the version being replaced.
    pub sha: String,
}

/// Identifiers returned by a successful file update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    pub commit_sha: String,
    pub content_sha: String,
}

/// Source-hosting API used by the pipeline.
///
/// Implementors own authentication and transport. Errors are never retried.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// List the files changed between `base` and `head`.
    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<FileChange>, BoxError>;

    /// Fetch the current version of the file at `path`.
    async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<DocumentContent, BoxError>;

    /// Commit new content for a file. Fails if `update.sha` is stale.
    async fn create_or_update_file_contents(
        &self,
        owner: &str,
        repo: &str,
        update: FileUpdate,
    ) -> Result<CommitResult, BoxError>;
}

/// Generative language model used to rewrite the document.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Send a single prompt and return the raw response text.
    async fn generate_content(&self, prompt: &str) -> Result<String, BoxError>;
}
