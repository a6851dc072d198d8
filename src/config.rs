//! Environment configuration.
//!
//! Required:
//! - `MIKKU_GITHUB_ACCESS_TOKEN`
//! - `MIKKU_GITHUB_OWNER`
//!
//! Optional defaults for `mikku pr`, each overridable by a CLI flag:
//! - `MIKKU_MANIFEST_REPOSITORY` (`--manifest`)
//! - `MIKKU_MANIFEST_FILEPATH` (`--path`)
//! - `MIKKU_DOCKER_IMAGE_NAME` (`--image`)
//!
//! Optional extras: `MIKKU_BASE_BRANCH` (default `master`) and
//! `MIKKU_GITHUB_API_URL` for GitHub Enterprise.

use std::env;
use std::sync::LazyLock;

use regex_lite::{Captures, Regex};

use crate::error::ConfigError;

pub const ENV_ACCESS_TOKEN: &str = "MIKKU_GITHUB_ACCESS_TOKEN";
pub const ENV_OWNER: &str = "MIKKU_GITHUB_OWNER";
pub const ENV_API_URL: &str = "MIKKU_GITHUB_API_URL";
pub const ENV_BASE_BRANCH: &str = "MIKKU_BASE_BRANCH";
pub const ENV_MANIFEST_REPOSITORY: &str = "MIKKU_MANIFEST_REPOSITORY";
pub const ENV_MANIFEST_FILEPATH: &str = "MIKKU_MANIFEST_FILEPATH";
pub const ENV_DOCKER_IMAGE_NAME: &str = "MIKKU_DOCKER_IMAGE_NAME";

pub const DEFAULT_BASE_BRANCH: &str = "master";

/// `{{.Owner}}` / `{{ .Repository }}` placeholders.
static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.(Owner|Repository)\s*\}\}").expect("Invalid regex")
});

/// Read a variable, treating empty values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Settings shared by all commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub access_token: String,
    pub owner: String,
    pub api_url: Option<String>,
    pub base_branch: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            access_token: non_empty_var(ENV_ACCESS_TOKEN).unwrap_or_default(),
            owner: non_empty_var(ENV_OWNER).unwrap_or_default(),
            api_url: non_empty_var(ENV_API_URL),
            base_branch: non_empty_var(ENV_BASE_BRANCH)
                .unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token.is_empty() {
            return Err(ConfigError::MissingAccessToken);
        }
        if self.owner.is_empty() {
            return Err(ConfigError::MissingOwner);
        }
        Ok(())
    }
}

/// Manifest location and image name, each possibly unset.
///
/// Used both for environment defaults and for command-line overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSettings {
    pub repository: Option<String>,
    pub file_path: Option<String>,
    pub image_name: Option<String>,
}

impl ManifestSettings {
    pub fn from_env() -> Self {
        Self {
            repository: non_empty_var(ENV_MANIFEST_REPOSITORY),
            file_path: non_empty_var(ENV_MANIFEST_FILEPATH),
            image_name: non_empty_var(ENV_DOCKER_IMAGE_NAME),
        }
    }

    /// Layer `overrides` on top of `self`; empty override values are ignored.
    pub fn overlay(&self, overrides: &ManifestSettings) -> ManifestSettings {
        fn pick(over: &Option<String>, base: &Option<String>) -> Option<String> {
            over.as_ref()
                .filter(|v| !v.is_empty())
                .or(base.as_ref().filter(|v| !v.is_empty()))
                .cloned()
        }

        ManifestSettings {
            repository: pick(&overrides.repository, &self.repository),
            file_path: pick(&overrides.file_path, &self.file_path),
            image_name: pick(&overrides.image_name, &self.image_name),
        }
    }

    /// Require every value, reporting the first one missing.
    pub fn resolve(self) -> Result<ManifestTarget, ConfigError> {
        let repository = self.repository.ok_or(ConfigError::MissingManifestRepository)?;
        let file_path = self.file_path.ok_or(ConfigError::MissingManifestFilePath)?;
        let image_name = self.image_name.ok_or(ConfigError::MissingImageName)?;

        Ok(ManifestTarget {
            repository,
            file_path,
            image_name,
        })
    }
}

/// Fully resolved manifest parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestTarget {
    pub repository: String,
    pub file_path: String,
    pub image_name: String,
}

impl ManifestTarget {
    /// Expand `{{.Owner}}` and `{{.Repository}}` in the file path and image name.
    pub fn embed_repo_info(self, owner: &str, repo: &str) -> Self {
        Self {
            file_path: expand_placeholders(&self.file_path, owner, repo),
            image_name: expand_placeholders(&self.image_name, owner, repo),
            repository: self.repository,
        }
    }
}

fn expand_placeholders(text: &str, owner: &str, repo: &str) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures<'_>| match &caps[1] {
            "Owner" => owner.to_string(),
            _ => repo.to_string(),
        })
        .into_owned()
}
