//! Error types for mikku modules using thiserror.

use std::num::ParseIntError;

use thiserror::Error;

/// Errors from semantic version tag operations.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("invalid semantic versioning tag: '{0}'")]
    InvalidSemanticVersioningTag(String),

    #[error("version '{0}' must have exactly three dot-separated components")]
    WrongComponentCount(String),

    #[error("failed to parse version '{tag}': component '{component}' is not a number")]
    ParseFailed {
        tag: String,
        component: String,
        #[source]
        source: ParseIntError,
    },

    #[error("cannot bump '{tag}': the {component} component would overflow")]
    Overflow { tag: String, component: &'static str },
}

/// Errors from manifest parsing and image tag lookup.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("invalid manifest: {0}")]
    InvalidManifest(#[source] serde_yaml::Error),

    #[error("invalid manifest: the document root must be a mapping")]
    RootNotMapping,

    #[error("{image}: image not found in manifest")]
    ImageNotFoundInManifest { image: String },
}

impl ManifestError {
    /// Whether the manifest text itself was rejected, as opposed to a failed lookup.
    pub fn is_invalid_manifest(&self) -> bool {
        matches!(self, Self::InvalidManifest(_) | Self::RootNotMapping)
    }
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Failed to build GitHub client: {0}")]
    ClientBuild(#[source] Box<octocrab::Error>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("'{path}' in {repo} is a directory, not a file")]
    IsDirectory { repo: String, path: String },

    #[error("'{path}' in {repo} is a {kind}, not a regular file")]
    NotRegularFile {
        repo: String,
        path: String,
        kind: String,
    },

    #[error("'{path}' in {repo} has no decodable content")]
    MissingContent { repo: String, path: String },

    #[error("GitHub API call '{operation}' failed: {source}")]
    Api {
        operation: &'static str,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Unexpected response from '{operation}': {detail}")]
    UnexpectedResponse {
        operation: &'static str,
        detail: String,
    },
}

impl GitHubError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors from reading and validating configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("should be set MIKKU_GITHUB_ACCESS_TOKEN")]
    MissingAccessToken,

    #[error("should be set MIKKU_GITHUB_OWNER")]
    MissingOwner,

    #[error("should be set MIKKU_MANIFEST_REPOSITORY or --manifest option")]
    MissingManifestRepository,

    #[error("should be set MIKKU_MANIFEST_FILEPATH or --path option")]
    MissingManifestFilePath,

    #[error("should be set MIKKU_DOCKER_IMAGE_NAME or --image option")]
    MissingImageName,
}

/// Errors from the release pipeline. Each variant names the step that failed.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("failed to get the latest release: {0}")]
    FetchLatestRelease(#[source] GitHubError),

    #[error(
        "{repo} has no release yet, so '{directive}' has nothing to bump from. \
         You must specify the tag explicitly for the first release (e.g. v0.1.0)"
    )]
    FirstReleaseRequiresVersion { repo: String, directive: String },

    #[error("failed to determine new tag: {0}")]
    DetermineTag(#[source] VersionError),

    #[error("failed to get merged pull requests: {0}")]
    FetchPullRequests(#[source] GitHubError),

    #[error("failed to create release {tag}: {source}")]
    CreateRelease {
        tag: String,
        #[source]
        source: GitHubError,
    },
}

/// Errors from the manifest-bump pull request pipeline.
#[derive(Error, Debug)]
pub enum PullRequestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("manifest file '{path}' not found in {repo}")]
    ManifestNotFound { repo: String, path: String },

    #[error("failed to get manifest file: {0}")]
    FetchManifest(#[source] GitHubError),

    #[error("{repo} has no release yet, so there is no tag to bump the image to")]
    NoRelease { repo: String },

    #[error("failed to get the latest release: {0}")]
    FetchLatestRelease(#[source] GitHubError),

    #[error("failed to get current tag in manifest file: {0}")]
    LocateImage(#[source] ManifestError),

    #[error("failed to resolve base branch '{branch}': {source}")]
    ResolveBaseBranch {
        branch: String,
        #[source]
        source: GitHubError,
    },

    #[error("failed to create branch '{branch}': {source}")]
    CreateBranch {
        branch: String,
        #[source]
        source: GitHubError,
    },

    #[error("failed to push updated manifest file to '{branch}': {source}")]
    PushManifest {
        branch: String,
        #[source]
        source: GitHubError,
    },

    #[error("failed to create a pull request from '{branch}': {source}")]
    OpenPullRequest {
        branch: String,
        #[source]
        source: GitHubError,
    },
}

impl PullRequestError {
    /// Whether a required remote resource (file, repository, release, branch) was missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::ManifestNotFound { .. } | Self::NoRelease { .. } => true,
            Self::ResolveBaseBranch { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}
