//! Release pipeline: bump the tag and publish a GitHub release with a changelog.
//!
//! Steps:
//! 1. Fetch the latest release (none means first-release mode)
//! 2. Compute the new tag from the bump directive
//! 3. Collect PRs merged since the latest release
//! 4. Render the changelog body
//! 5. Create the release

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::changelog::{ChangelogStyle, render_with_style};
use crate::config::DEFAULT_BASE_BRANCH;
use crate::error::{GitHubError, ReleaseError, VersionError};
use crate::github::{PullRequest, Release, RepositoryHost};
use crate::version::{BumpDirective, determine_new_tag};

/// PRs requested per page while scanning for merged PRs.
pub const DEFAULT_PAGE_SIZE: u8 = 10;

/// Tunables for the release pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOptions {
    pub base_branch: String,
    pub page_size: u8,
    pub changelog_style: ChangelogStyle,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            changelog_style: ChangelogStyle::Plain,
        }
    }
}

/// What the latest release tells us about where to start.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ReleaseBaseline {
    current_tag: Option<String>,
    after: Option<DateTime<Utc>>,
}

impl ReleaseBaseline {
    fn is_first_release(&self) -> bool {
        self.current_tag.is_none()
    }
}

/// Run the full release pipeline and return the created release.
pub async fn run_release<H>(
    host: &H,
    repo: &str,
    directive: &BumpDirective,
    options: &ReleaseOptions,
) -> Result<Release, ReleaseError>
where
    H: RepositoryHost + ?Sized,
{
    let baseline = match host.get_latest_release(repo).await {
        Ok(latest) => ReleaseBaseline {
            current_tag: Some(latest.tag_name),
            after: latest.published_at,
        },
        Err(e) if e.is_not_found() => {
            info!("Release not found in {}. First release...", repo);
            ReleaseBaseline {
                current_tag: None,
                after: None,
            }
        }
        Err(e) => return Err(ReleaseError::FetchLatestRelease(e)),
    };

    let current_tag = baseline.current_tag.as_deref().unwrap_or_default();
    let new_tag = determine_new_tag(current_tag, directive).map_err(|e| match e {
        VersionError::InvalidSemanticVersioningTag(_)
            if baseline.is_first_release() && directive.is_increment() =>
        {
            ReleaseError::FirstReleaseRequiresVersion {
                repo: repo.to_string(),
                directive: directive.to_string(),
            }
        }
        other => ReleaseError::DetermineTag(other),
    })?;

    info!(
        "Version: {} -> {}",
        baseline.current_tag.as_deref().unwrap_or("none"),
        new_tag
    );

    let prs = collect_merged_pull_requests(host, repo, baseline.after, options)
        .await
        .map_err(ReleaseError::FetchPullRequests)?;
    debug!("Found {} merged PRs since last release", prs.len());

    let body = render_with_style(&prs, options.changelog_style);

    host.create_release(repo, &new_tag, &new_tag, &body)
        .await
        .map_err(|e| ReleaseError::CreateRelease {
            tag: new_tag.clone(),
            source: e,
        })
}

/// Collect closed PRs merged strictly after `after`, newest-updated first.
///
/// Pages are sorted by update time descending, so the scan stops at the first
/// PR whose update time is not after the boundary: nothing later can have
/// been merged after it. With no boundary every page is read.
pub async fn collect_merged_pull_requests<H>(
    host: &H,
    repo: &str,
    after: Option<DateTime<Utc>>,
    options: &ReleaseOptions,
) -> Result<Vec<PullRequest>, GitHubError>
where
    H: RepositoryHost + ?Sized,
{
    let mut merged = Vec::new();
    let mut page = 1u32;

    loop {
        let batch = host
            .list_closed_pull_requests(repo, &options.base_branch, page, options.page_size)
            .await?;

        for pr in batch.items {
            if let Some(boundary) = after {
                if pr.updated_at.is_none_or(|updated| updated <= boundary) {
                    debug!(
                        "Stopping at PR #{} on page {}: not updated since {}",
                        pr.number, page, boundary
                    );
                    return Ok(merged);
                }
            }

            let merged_after_boundary = pr
                .merged_at
                .is_some_and(|merged_at| after.is_none_or(|boundary| merged_at > boundary));
            if merged_after_boundary {
                merged.push(pr);
            }
        }

        if !batch.has_next {
            break;
        }
        page += 1;
    }

    Ok(merged)
}
