//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde_json::{Map, Value, json};
use wiremock::MockServer;

use mikku::GitHubError;
use mikku::github::{
    FileContent, OpenedPullRequest, PullRequest, PullRequestPage, Release, RepositoryHost,
};

// =============================================================================
// GitHub API JSON fixtures (for wiremock)
// =============================================================================

/// Helper to create an octocrab client pointing to a mock server.
pub async fn mock_client(server: &MockServer) -> Octocrab {
    Octocrab::builder()
        .base_uri(server.uri())
        .expect("Failed to set base URI")
        .build()
        .expect("Failed to build octocrab")
}

/// Create a mock user object with all fields GitHub API returns.
pub fn mock_user(login: &str, id: u64) -> Value {
    let api = format!("https://api.github.com/users/{}", login);
    let mut user = Map::new();
    user.insert("login".into(), json!(login));
    user.insert("id".into(), json!(id));
    user.insert("node_id".into(), json!(format!("U_{}", id)));
    user.insert("avatar_url".into(), json!(format!("https://avatars.githubusercontent.com/u/{}?v=4", id)));
    user.insert("gravatar_id".into(), json!(""));
    user.insert("url".into(), json!(api));
    user.insert("html_url".into(), json!(format!("https://github.com/{}", login)));
    for (field, suffix) in [
        ("followers_url", "/followers"),
        ("following_url", "/following{/other_user}"),
        ("gists_url", "/gists{/gist_id}"),
        ("starred_url", "/starred{/owner}{/repo}"),
        ("subscriptions_url", "/subscriptions"),
        ("organizations_url", "/orgs"),
        ("repos_url", "/repos"),
        ("events_url", "/events{/privacy}"),
        ("received_events_url", "/received_events"),
    ] {
        user.insert(field.into(), json!(format!("{}{}", api, suffix)));
    }
    user.insert("type".into(), json!("User"));
    user.insert("site_admin".into(), json!(false));
    Value::Object(user)
}

fn mock_repo(repo: &str) -> Value {
    json!({
        "id": 1,
        "node_id": "R_1",
        "name": repo,
        "full_name": format!("owner/{}", repo),
        "owner": mock_user("owner", 1),
        "private": false,
        "html_url": format!("https://github.com/owner/{}", repo),
        "url": format!("https://api.github.com/repos/owner/{}", repo),
        "fork": false
    })
}

/// Create a closed PR as returned by `GET /repos/{owner}/{repo}/pulls`.
pub fn mock_pr(
    number: u64,
    title: &str,
    author: &str,
    merged_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
) -> Value {
    let branch = |name: &str| {
        json!({
            "label": format!("owner:{}", name),
            "ref": name,
            "sha": "abc123def456789",
            "user": mock_user("owner", 1),
            "repo": mock_repo("repo")
        })
    };

    let mut pr = Map::new();
    pr.insert("url".into(), json!(format!("https://api.github.com/repos/owner/repo/pulls/{}", number)));
    pr.insert("id".into(), json!(number * 1000));
    pr.insert("node_id".into(), json!(format!("PR_{}", number)));
    pr.insert("html_url".into(), json!(format!("https://github.com/owner/repo/pull/{}", number)));
    pr.insert("number".into(), json!(number));
    pr.insert("state".into(), json!("closed"));
    pr.insert("locked".into(), json!(false));
    pr.insert("title".into(), json!(title));
    pr.insert("body".into(), Value::Null);
    pr.insert("user".into(), mock_user(author, 100));
    pr.insert("labels".into(), json!([]));
    pr.insert("created_at".into(), json!("2024-01-01T00:00:00Z"));
    pr.insert("updated_at".into(), json!(updated_at.to_rfc3339()));
    pr.insert("closed_at".into(), json!(updated_at.to_rfc3339()));
    pr.insert("merged_at".into(), json!(merged_at.map(|d| d.to_rfc3339())));
    pr.insert("head".into(), branch("feature"));
    pr.insert("base".into(), branch("master"));
    pr.insert("draft".into(), json!(false));
    Value::Object(pr)
}

/// Create a release as returned by the releases endpoints.
pub fn mock_release(tag: &str, published_at: Option<DateTime<Utc>>) -> Value {
    let mut release = Map::new();
    release.insert("url".into(), json!("https://api.github.com/repos/owner/repo/releases/1"));
    release.insert("html_url".into(), json!(format!("https://github.com/owner/repo/releases/tag/{}", tag)));
    release.insert("assets_url".into(), json!("https://api.github.com/repos/owner/repo/releases/1/assets"));
    release.insert("upload_url".into(), json!("https://uploads.github.com/repos/owner/repo/releases/1/assets{?name,label}"));
    release.insert("tarball_url".into(), json!(format!("https://api.github.com/repos/owner/repo/tarball/{}", tag)));
    release.insert("zipball_url".into(), json!(format!("https://api.github.com/repos/owner/repo/zipball/{}", tag)));
    release.insert("id".into(), json!(1));
    release.insert("node_id".into(), json!("RE_1"));
    release.insert("tag_name".into(), json!(tag));
    release.insert("target_commitish".into(), json!("master"));
    release.insert("name".into(), json!(tag));
    release.insert("body".into(), json!("\n## Changelog\n\n"));
    release.insert("draft".into(), json!(false));
    release.insert("prerelease".into(), json!(false));
    release.insert("created_at".into(), json!(published_at.map(|d| d.to_rfc3339())));
    release.insert("published_at".into(), json!(published_at.map(|d| d.to_rfc3339())));
    release.insert("author".into(), mock_user("owner", 1));
    release.insert("assets".into(), json!([]));
    Value::Object(release)
}

/// GitHub's 404 error body.
pub fn not_found_body() -> Value {
    json!({
        "message": "Not Found",
        "documentation_url": "https://docs.github.com/rest"
    })
}

// =============================================================================
// In-memory repository host
// =============================================================================

/// Everything the fake host was asked to write.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Writes {
    pub releases: Vec<(String, String, String)>,
    pub branches: Vec<(String, String)>,
    pub files: Vec<(String, String, String)>,
    pub pull_requests: Vec<(String, String, String)>,
    pub pages_requested: Vec<u32>,
}

/// A [`RepositoryHost`] backed by in-memory state.
#[derive(Default)]
pub struct FakeHost {
    pub latest_releases: HashMap<String, Release>,
    pub pages: Vec<PullRequestPage>,
    /// `(repo, path)` -> file.
    pub files: HashMap<(String, String), FileContent>,
    /// `(repo, branch)` -> head commit.
    pub branches: HashMap<(String, String), String>,
    pub fail_update: bool,
    pub writes: Mutex<Writes>,
}

impl FakeHost {
    pub fn writes(&self) -> Writes {
        self.writes.lock().unwrap().clone()
    }

    fn not_found(what: String) -> GitHubError {
        GitHubError::NotFound(what)
    }
}

#[async_trait]
impl RepositoryHost for FakeHost {
    async fn get_latest_release(&self, repo: &str) -> Result<Release, GitHubError> {
        self.latest_releases
            .get(repo)
            .cloned()
            .ok_or_else(|| Self::not_found(format!("release of {}", repo)))
    }

    async fn create_release(
        &self,
        repo: &str,
        tag_name: &str,
        title: &str,
        body: &str,
    ) -> Result<Release, GitHubError> {
        self.writes.lock().unwrap().releases.push((
            tag_name.to_string(),
            title.to_string(),
            body.to_string(),
        ));
        Ok(Release {
            tag_name: tag_name.to_string(),
            published_at: None,
            html_url: format!("https://github.com/owner/{}/releases/tag/{}", repo, tag_name),
            body: Some(body.to_string()),
        })
    }

    async fn list_closed_pull_requests(
        &self,
        _repo: &str,
        _base: &str,
        page: u32,
        _per_page: u8,
    ) -> Result<PullRequestPage, GitHubError> {
        self.writes.lock().unwrap().pages_requested.push(page);
        Ok(self
            .pages
            .get(page as usize - 1)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_file_content(
        &self,
        repo: &str,
        path: &str,
        _git_ref: &str,
    ) -> Result<FileContent, GitHubError> {
        self.files
            .get(&(repo.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| Self::not_found(format!("{} in {}", path, repo)))
    }

    async fn update_file_content(
        &self,
        repo: &str,
        path: &str,
        branch: &str,
        content: &str,
        expected_sha: &str,
        _message: &str,
    ) -> Result<(), GitHubError> {
        let current = self.get_file_content(repo, path, branch).await?;
        if self.fail_update || current.sha != expected_sha {
            return Err(GitHubError::UnexpectedResponse {
                operation: "update file",
                detail: format!("409 Conflict: {} does not match {}", path, expected_sha),
            });
        }
        self.writes.lock().unwrap().files.push((
            branch.to_string(),
            path.to_string(),
            content.to_string(),
        ));
        Ok(())
    }

    async fn get_branch_head_commit(&self, repo: &str, branch: &str) -> Result<String, GitHubError> {
        self.branches
            .get(&(repo.to_string(), branch.to_string()))
            .cloned()
            .ok_or_else(|| Self::not_found(format!("branch {} of {}", branch, repo)))
    }

    async fn create_branch(&self, _repo: &str, branch: &str, from_sha: &str) -> Result<(), GitHubError> {
        self.writes
            .lock()
            .unwrap()
            .branches
            .push((branch.to_string(), from_sha.to_string()));
        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &str,
        head: &str,
        _base: &str,
        title: &str,
        body: &str,
    ) -> Result<OpenedPullRequest, GitHubError> {
        let mut writes = self.writes.lock().unwrap();
        writes
            .pull_requests
            .push((head.to_string(), title.to_string(), body.to_string()));
        let number = writes.pull_requests.len() as u64;
        Ok(OpenedPullRequest {
            number,
            html_url: format!("https://github.com/owner/{}/pull/{}", repo, number),
        })
    }
}

/// Build a [`PullRequest`] record for the fake host.
pub fn pr_record(
    number: u64,
    title: &str,
    merged_at: Option<DateTime<Utc>>,
    updated_at: DateTime<Utc>,
) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        html_url: format!("https://github.com/owner/repo/pull/{}", number),
        author_login: "p1ass".to_string(),
        author_url: "https://github.com/p1ass".to_string(),
        merged_at,
        updated_at: Some(updated_at),
    }
}
