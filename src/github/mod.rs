//! GitHub API operations using octocrab.

pub mod client;
pub mod host;

pub use client::GitHubHost;
pub use host::{
    FileContent, OpenedPullRequest, PullRequest, PullRequestPage, Release, RepositoryHost,
};

#[cfg(test)]
pub use host::MockRepositoryHost;
