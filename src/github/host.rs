//! Repository host capabilities consumed by the pipelines.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::GitHubError;

/// A published release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub tag_name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub html_url: String,
    pub body: Option<String>,
}

/// Represents a closed GitHub PR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub author_login: String,
    pub author_url: String,
    pub merged_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of closed pull requests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestPage {
    pub items: Vec<PullRequest>,
    pub has_next: bool,
}

/// A file fetched from a repository together with its blob SHA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub content: String,
    pub sha: String,
}

/// A newly opened pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedPullRequest {
    pub number: u64,
    pub html_url: String,
}

/// Operations the release and manifest pipelines need from the hosting API.
///
/// All repositories are addressed by name within the configured owner.
/// Missing resources must be reported as [`GitHubError::NotFound`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    async fn get_latest_release(&self, repo: &str) -> Result<Release, GitHubError>;

    async fn create_release(
        &self,
        repo: &str,
        tag_name: &str,
        title: &str,
        body: &str,
    ) -> Result<Release, GitHubError>;

    /// Closed PRs against `base`, most recently updated first.
    async fn list_closed_pull_requests(
        &self,
        repo: &str,
        base: &str,
        page: u32,
        per_page: u8,
    ) -> Result<PullRequestPage, GitHubError>;

    async fn get_file_content(
        &self,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<FileContent, GitHubError>;

    /// Commit `content` to `path` on `branch`; fails if the blob is no longer `expected_sha`.
    async fn update_file_content(
        &self,
        repo: &str,
        path: &str,
        branch: &str,
        content: &str,
        expected_sha: &str,
        message: &str,
    ) -> Result<(), GitHubError>;

    async fn get_branch_head_commit(&self, repo: &str, branch: &str) -> Result<String, GitHubError>;

    async fn create_branch(&self, repo: &str, branch: &str, from_sha: &str) -> Result<(), GitHubError>;

    async fn create_pull_request(
        &self,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<OpenedPullRequest, GitHubError>;
}
