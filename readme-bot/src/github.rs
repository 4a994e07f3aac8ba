#![doc = "GitHub REST client: implements the core `SourceHost` trait over the compare and contents endpoints."]
//
//! # GitHub integration
//!
//! [`GitHubClient`] is the production [`SourceHost`]. It talks to three
//! endpoints:
//!
//! - `GET  /repos/{owner}/{repo}/compare/{base}...{head}`
//! - `GET  /repos/{owner}/{repo}/contents/{path}`
//! - `PUT  /repos/{owner}/{repo}/contents/{path}`
//!
//! Every request carries the bearer token, the GitHub JSON media type and a
//! pinned API version. Non-2xx answers become errors carrying GitHub's own
//! message. Nothing is retried.

use async_trait::async_trait;
use readme_bot_core::contract::{
    BoxError, CommitResult, DocumentContent, FileChange, FileUpdate, SourceHost,
};
use reqwest::{RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http::{build_client, join_segments, parse_base_url, read_json};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";
const SERVICE: &str = "GitHub";

pub struct GitHubClient {
    client: reqwest::Client,
    base_url: Url,
    token: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompareResponse {
    #[serde(default)]
    pub files: Vec<FileChange>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentResponse {
    pub path: String,
    pub sha: String,
}

/// Body of the contents `PUT`.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateFileRequest<'a> {
    pub message: &'a str,
    pub content: &'a str,
    pub sha: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ShaRef {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateFileResponse {
    pub commit: ShaRef,
    pub content: Option<ShaRef>,
}

impl GitHubClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self, BoxError> {
        let base_url = parse_base_url(base_url)?;
        tracing::info!(base_url = %base_url, "Initialized GitHubClient");
        Ok(Self {
            client: build_client()?,
            base_url,
            token: token.to_string(),
        })
    }

    pub(crate) fn compare_url(&self, owner: &str, repo: &str, base: &str, head: &str) -> Result<Url, BoxError> {
        let range = format!("{}...{}", base, head);
        join_segments(&self.base_url, ["repos", owner, repo, "compare", range.as_str()])
    }

    pub(crate) fn contents_url(&self, owner: &str, repo: &str, path: &str) -> Result<Url, BoxError> {
        let mut segments = vec!["repos", owner, repo, "contents"];
        segments.extend(path.trim_matches('/').split('/').filter(|s| !s.is_empty()));
        join_segments(&self.base_url, segments)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", GITHUB_API_VERSION)
    }
}

#[async_trait]
impl SourceHost for GitHubClient {
    async fn compare_commits(
        &self,
        owner: &str,
        repo: &str,
        base: &str,
        head: &str,
    ) -> Result<Vec<FileChange>, BoxError> {
        let url = self.compare_url(owner, repo, base, head)?;
        tracing::info!(owner, repo, base, head, "Comparing commits");

        let response = self.authorized(self.client.get(url)).send().await?;
        let compare: CompareResponse = read_json(SERVICE, response).await?;

        tracing::info!(files = compare.files.len(), "Fetched commit comparison");
        Ok(compare.files)
    }

    async fn get_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<DocumentContent, BoxError> {
        let url = self.contents_url(owner, repo, path)?;
        tracing::info!(owner, repo, path, "Fetching file content");

        let response = self.authorized(self.client.get(url)).send().await?;
        let content: ContentResponse = read_json(SERVICE, response).await?;

        tracing::info!(path = %content.path, sha = %content.sha, "Fetched file content");
        Ok(DocumentContent {
            path: content.path,
            sha: content.sha,
        })
    }

    async fn create_or_update_file_contents(
        &self,
        owner: &str,
        repo: &str,
        update: FileUpdate,
    ) -> Result<CommitResult, BoxError> {
        let url = self.contents_url(owner, repo, &update.path)?;
        tracing::info!(
            owner,
            repo,
            path = %update.path,
            sha = %update.sha,
            content_bytes = update.content_base64.len(),
            "Updating file content"
        );

        let body = UpdateFileRequest {
            message: &update.message,
            content: &update.content_base64,
            sha: &update.sha,
        };
        let response = self
            .authorized(self.client.put(url))
            .json(&body)
            .send()
            .await?;
        let updated: UpdateFileResponse = read_json(SERVICE, response).await?;

        let result = CommitResult {
            commit_sha: updated.commit.sha,
            content_sha: updated.content.map(|c| c.sha).unwrap_or_default(),
        };
        tracing::info!(commit_sha = %result.commit_sha, "Committed file update");
        Ok(result)
    }
}
