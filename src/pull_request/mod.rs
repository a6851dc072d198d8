//! Manifest-bump pipeline: open a PR that points a manifest image at the latest release.
//!
//! The remote writes (branch, commit, pull request) are not transactional.
//! A failure after the branch is created leaves that branch behind, and a
//! failure after the commit leaves a commit without a pull request; rerunning
//! then fails at branch creation until the branch is removed.

use tracing::{debug, info, warn};

use crate::config::{DEFAULT_BASE_BRANCH, ManifestSettings};
use crate::error::PullRequestError;
use crate::github::{OpenedPullRequest, RepositoryHost};
use crate::manifest::rewrite_image_tag;

/// Parameters for one manifest-bump run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestOptions {
    /// Owner used to expand `{{.Owner}}` placeholders.
    pub owner: String,
    pub base_branch: String,
    /// Values from the environment.
    pub defaults: ManifestSettings,
    /// Values from command-line flags; take precedence over `defaults`.
    pub overrides: ManifestSettings,
}

impl PullRequestOptions {
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            defaults: ManifestSettings::default(),
            overrides: ManifestSettings::default(),
        }
    }
}

/// Branch name (also the commit message) for bumping `image_name` to `tag`.
///
/// Characters that git does not accept in ref names become `-`.
pub fn branch_name(image_name: &str, tag: &str) -> String {
    format!("bump-{}-to-{}", image_name, tag)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '/' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

pub fn pull_request_title(image_name: &str, tag: &str) -> String {
    format!("bump {} to {}", image_name, tag)
}

pub fn pull_request_body(image_name: &str, tag: &str) -> String {
    format!("bump {} to {}.", image_name, tag)
}

/// Run the manifest-bump pipeline for release-source repository `repo`.
pub async fn run_pull_request<H>(
    host: &H,
    repo: &str,
    options: &PullRequestOptions,
) -> Result<OpenedPullRequest, PullRequestError>
where
    H: RepositoryHost + ?Sized,
{
    let target = options
        .defaults
        .overlay(&options.overrides)
        .resolve()?
        .embed_repo_info(&options.owner, repo);
    let base = options.base_branch.as_str();
    debug!(
        "Manifest {}:{} on {}, image {}",
        target.repository, target.file_path, base, target.image_name
    );

    let manifest = host
        .get_file_content(&target.repository, &target.file_path, base)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                PullRequestError::ManifestNotFound {
                    repo: target.repository.clone(),
                    path: target.file_path.clone(),
                }
            } else {
                PullRequestError::FetchManifest(e)
            }
        })?;

    let release = host.get_latest_release(repo).await.map_err(|e| {
        if e.is_not_found() {
            PullRequestError::NoRelease {
                repo: repo.to_string(),
            }
        } else {
            PullRequestError::FetchLatestRelease(e)
        }
    })?;
    let tag = release.tag_name;

    let rewrite = rewrite_image_tag(&manifest.content, &target.image_name, &tag)
        .map_err(PullRequestError::LocateImage)?;
    info!(
        "Bumping {} from {} to {}",
        target.image_name, rewrite.previous_tag, tag
    );

    let branch = branch_name(&target.image_name, &tag);

    let head_sha = host
        .get_branch_head_commit(&target.repository, base)
        .await
        .map_err(|e| PullRequestError::ResolveBaseBranch {
            branch: base.to_string(),
            source: e,
        })?;

    host.create_branch(&target.repository, &branch, &head_sha)
        .await
        .map_err(|e| PullRequestError::CreateBranch {
            branch: branch.clone(),
            source: e,
        })?;

    if let Err(e) = host
        .update_file_content(
            &target.repository,
            &target.file_path,
            &branch,
            &rewrite.content,
            &manifest.sha,
            &branch,
        )
        .await
    {
        warn!(
            "Branch '{}' was created in {} but the manifest was not pushed; delete it before retrying",
            branch, target.repository
        );
        return Err(PullRequestError::PushManifest { branch, source: e });
    }

    match host
        .create_pull_request(
            &target.repository,
            &branch,
            base,
            &pull_request_title(&target.image_name, &tag),
            &pull_request_body(&target.image_name, &tag),
        )
        .await
    {
        Ok(pr) => Ok(pr),
        Err(e) => {
            warn!(
                "Branch '{}' in {} holds the manifest update but no pull request was opened",
                branch, target.repository
            );
            Err(PullRequestError::OpenPullRequest { branch, source: e })
        }
    }
}
