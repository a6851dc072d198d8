//! [`RepositoryHost`] backed by the GitHub REST API via octocrab.

use async_trait::async_trait;
use octocrab::Octocrab;
use octocrab::models::repos::Object;
use octocrab::params::repos::Reference;
use tracing::debug;

use crate::error::GitHubError;

use super::host::{
    FileContent, OpenedPullRequest, PullRequest, PullRequestPage, Release, RepositoryHost,
};

const NOT_FOUND: u16 = 404;

/// GitHub client scoped to a single owner (user or organization).
pub struct GitHubHost {
    octocrab: Octocrab,
    owner: String,
}

impl GitHubHost {
    /// Build a client authenticated with a personal access token.
    ///
    /// `api_url` points the client at GitHub Enterprise or a test server.
    pub fn new(token: &str, owner: &str, api_url: Option<&str>) -> Result<Self, GitHubError> {
        let builder = Octocrab::builder().personal_token(token.to_string());
        let builder = match api_url {
            Some(url) => builder
                .base_uri(url)
                .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?,
            None => builder,
        };
        let octocrab = builder
            .build()
            .map_err(|e| GitHubError::ClientBuild(Box::new(e)))?;

        Ok(Self::with_client(octocrab, owner))
    }

    /// Wrap a pre-configured octocrab client.
    ///
    /// This allows dependency injection for testing with mock servers.
    pub fn with_client(octocrab: Octocrab, owner: &str) -> Self {
        Self {
            octocrab,
            owner: owner.to_string(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

/// Map an octocrab error, turning a 404 status into [`GitHubError::NotFound`].
fn classify(operation: &'static str, what: impl FnOnce() -> String, err: octocrab::Error) -> GitHubError {
    match &err {
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == NOT_FOUND => {
            GitHubError::NotFound(what())
        }
        _ => GitHubError::Api {
            operation,
            source: Box::new(err),
        },
    }
}

fn convert_pull_request(pr: octocrab::models::pulls::PullRequest) -> PullRequest {
    let (author_login, author_url) = pr
        .user
        .map(|user| (user.login, user.html_url.to_string()))
        .unwrap_or_default();

    PullRequest {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        html_url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
        author_login,
        author_url,
        merged_at: pr.merged_at,
        updated_at: pr.updated_at,
    }
}

fn convert_release(release: octocrab::models::repos::Release) -> Release {
    Release {
        tag_name: release.tag_name,
        published_at: release.published_at,
        html_url: release.html_url.to_string(),
        body: release.body,
    }
}

#[async_trait]
impl RepositoryHost for GitHubHost {
    async fn get_latest_release(&self, repo: &str) -> Result<Release, GitHubError> {
        let release = self
            .octocrab
            .repos(&self.owner, repo)
            .releases()
            .get_latest()
            .await
            .map_err(|e| {
                classify("get latest release", || format!("release of {}/{}", self.owner, repo), e)
            })?;

        debug!("Latest release of {}/{} is {}", self.owner, repo, release.tag_name);
        Ok(convert_release(release))
    }

    async fn create_release(
        &self,
        repo: &str,
        tag_name: &str,
        title: &str,
        body: &str,
    ) -> Result<Release, GitHubError> {
        let release = self
            .octocrab
            .repos(&self.owner, repo)
            .releases()
            .create(tag_name)
            .name(title)
            .body(body)
            .send()
            .await
            .map_err(|e| classify("create release", || format!("repository {}/{}", self.owner, repo), e))?;

        Ok(convert_release(release))
    }

    async fn list_closed_pull_requests(
        &self,
        repo: &str,
        base: &str,
        page: u32,
        per_page: u8,
    ) -> Result<PullRequestPage, GitHubError> {
        let prs_page = self
            .octocrab
            .pulls(&self.owner, repo)
            .list()
            .state(octocrab::params::State::Closed)
            .base(base)
            .sort(octocrab::params::pulls::Sort::Updated)
            .direction(octocrab::params::Direction::Descending)
            .per_page(per_page)
            .page(page)
            .send()
            .await
            .map_err(|e| {
                classify("list pull requests", || format!("repository {}/{}", self.owner, repo), e)
            })?;

        debug!(
            "Fetched page {} of closed PRs for {}/{}: {} item(s)",
            page,
            self.owner,
            repo,
            prs_page.items.len()
        );

        Ok(PullRequestPage {
            has_next: prs_page.next.is_some(),
            items: prs_page.items.into_iter().map(convert_pull_request).collect(),
        })
    }

    async fn get_file_content(
        &self,
        repo: &str,
        path: &str,
        git_ref: &str,
    ) -> Result<FileContent, GitHubError> {
        let mut contents = self
            .octocrab
            .repos(&self.owner, repo)
            .get_content()
            .path(path)
            .r#ref(git_ref)
            .send()
            .await
            .map_err(|e| {
                classify("get file content", || format!("{} in {}/{}", path, self.owner, repo), e)
            })?;

        // A directory comes back as a listing of its children; anything else
        // is a single entry for the requested path.
        let requested = path.trim_start_matches('/');
        let entry = match contents.items.as_slice() {
            [item] if item.path == requested => item,
            _ => {
                return Err(GitHubError::IsDirectory {
                    repo: repo.to_string(),
                    path: path.to_string(),
                });
            }
        };
        match entry.r#type.as_str() {
            "file" => {}
            "dir" => {
                return Err(GitHubError::IsDirectory {
                    repo: repo.to_string(),
                    path: path.to_string(),
                });
            }
            other => {
                return Err(GitHubError::NotRegularFile {
                    repo: repo.to_string(),
                    path: path.to_string(),
                    kind: other.to_string(),
                });
            }
        }

        let file = contents.items.swap_remove(0);
        let content = file.decoded_content().ok_or_else(|| GitHubError::MissingContent {
            repo: repo.to_string(),
            path: path.to_string(),
        })?;

        Ok(FileContent {
            content,
            sha: file.sha,
        })
    }

    async fn update_file_content(
        &self,
        repo: &str,
        path: &str,
        branch: &str,
        content: &str,
        expected_sha: &str,
        message: &str,
    ) -> Result<(), GitHubError> {
        self.octocrab
            .repos(&self.owner, repo)
            .update_file(path, message, content, expected_sha)
            .branch(branch)
            .send()
            .await
            .map_err(|e| {
                classify("update file", || format!("{} in {}/{}", path, self.owner, repo), e)
            })?;

        Ok(())
    }

    async fn get_branch_head_commit(&self, repo: &str, branch: &str) -> Result<String, GitHubError> {
        let reference = self
            .octocrab
            .repos(&self.owner, repo)
            .get_ref(&Reference::Branch(branch.to_string()))
            .await
            .map_err(|e| {
                classify("get branch ref", || format!("branch {} of {}/{}", branch, self.owner, repo), e)
            })?;

        match reference.object {
            Object::Commit { sha, .. } => Ok(sha),
            other => Err(GitHubError::UnexpectedResponse {
                operation: "get branch ref",
                detail: format!("branch {} does not point at a commit: {:?}", branch, other),
            }),
        }
    }

    async fn create_branch(&self, repo: &str, branch: &str, from_sha: &str) -> Result<(), GitHubError> {
        self.octocrab
            .repos(&self.owner, repo)
            .create_ref(&Reference::Branch(branch.to_string()), from_sha)
            .await
            .map_err(|e| classify("create branch", || format!("repository {}/{}", self.owner, repo), e))?;

        Ok(())
    }

    async fn create_pull_request(
        &self,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<OpenedPullRequest, GitHubError> {
        let pr = self
            .octocrab
            .pulls(&self.owner, repo)
            .create(title, head, base)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                classify("create pull request", || format!("repository {}/{}", self.owner, repo), e)
            })?;

        Ok(OpenedPullRequest {
            number: pr.number,
            html_url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
        })
    }
}
