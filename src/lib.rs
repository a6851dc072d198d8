//! mikku - bump semantic version tags, publish GitHub releases and open
//! manifest image-bump pull requests.
//!
//! # Overview
//!
//! `mikku release` finds the latest release of a repository, computes the next
//! `vMAJOR.MINOR.PATCH` tag, renders a changelog from the PRs merged since,
//! and publishes a new release. `mikku pr` rewrites the image tag inside a
//! deployment manifest to the latest release tag and opens a pull request.

pub mod changelog;
pub mod config;
pub mod error;
pub mod github;
pub mod manifest;
pub mod pull_request;
pub mod release;
pub mod version;

// Re-export commonly used types
pub use changelog::ChangelogStyle;
pub use config::{Config, ManifestSettings, ManifestTarget};
pub use error::{ConfigError, GitHubError, ManifestError, PullRequestError, ReleaseError, VersionError};
pub use github::{GitHubHost, PullRequest, Release, RepositoryHost};
pub use manifest::ManifestDocument;
pub use pull_request::{PullRequestOptions, run_pull_request};
pub use release::{ReleaseOptions, run_release};
pub use version::{BumpDirective, BumpType};
