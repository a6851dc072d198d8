//! Next-tag calculation from a bump directive.

use std::fmt;

use semver::Version;
use tracing::debug;

use crate::error::VersionError;

use super::tag::{format_tag, parse_tag, validate};

/// Type of version bump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BumpType {
    Patch,
    Minor,
    Major,
}

impl BumpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Patch => "patch",
            Self::Minor => "minor",
            Self::Major => "major",
        }
    }
}

/// How the next tag is chosen: bump the current tag, or use a given one verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpDirective {
    Increment(BumpType),
    Explicit(String),
}

impl BumpDirective {
    /// Interpret a command-line argument. Only the exact lowercase words
    /// `major`, `minor` and `patch` are bump keywords; anything else is
    /// taken as an explicit version.
    pub fn parse(arg: &str) -> Self {
        match arg {
            "major" => Self::Increment(BumpType::Major),
            "minor" => Self::Increment(BumpType::Minor),
            "patch" => Self::Increment(BumpType::Patch),
            other => Self::Explicit(other.to_string()),
        }
    }

    pub fn is_increment(&self) -> bool {
        matches!(self, Self::Increment(_))
    }
}

impl fmt::Display for BumpDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increment(bump) => f.write_str(bump.as_str()),
            Self::Explicit(version) => f.write_str(version),
        }
    }
}

/// Apply a bump to a tag. A missing `v` prefix on `tag` is tolerated.
pub fn bump(tag: &str, bump_type: BumpType) -> Result<Version, VersionError> {
    let base = parse_tag(tag)?;
    apply_bump_to_version(&base, bump_type)
}

/// Apply a bump to an already parsed version.
///
/// Fails instead of wrapping when the bumped component is already `u64::MAX`.
pub fn apply_bump_to_version(base: &Version, bump_type: BumpType) -> Result<Version, VersionError> {
    let overflow = |component: &'static str| VersionError::Overflow {
        tag: format_tag(base),
        component,
    };

    Ok(match bump_type {
        BumpType::Major => {
            let major = base.major.checked_add(1).ok_or_else(|| overflow("major"))?;
            Version::new(major, 0, 0)
        }
        BumpType::Minor => {
            let minor = base.minor.checked_add(1).ok_or_else(|| overflow("minor"))?;
            Version::new(base.major, minor, 0)
        }
        BumpType::Patch => {
            let patch = base.patch.checked_add(1).ok_or_else(|| overflow("patch"))?;
            Version::new(base.major, base.minor, patch)
        }
    })
}

/// Compute the tag of the next release.
///
/// For `major`/`minor`/`patch`, `current_tag` must be a valid `v`-prefixed tag.
/// For an explicit version, `current_tag` is ignored and the version itself
/// must be valid; it is returned unchanged.
pub fn determine_new_tag(current_tag: &str, directive: &BumpDirective) -> Result<String, VersionError> {
    match directive {
        BumpDirective::Increment(bump_type) => {
            if !validate(current_tag) {
                return Err(VersionError::InvalidSemanticVersioningTag(
                    current_tag.to_string(),
                ));
            }
            let next = bump(current_tag, *bump_type)?;
            debug!(
                "Bumped {} ({}) to {}",
                current_tag,
                bump_type.as_str(),
                next
            );
            Ok(format_tag(&next))
        }
        BumpDirective::Explicit(version) => {
            if !validate(version) {
                return Err(VersionError::InvalidSemanticVersioningTag(version.clone()));
            }
            Ok(version.clone())
        }
    }
}
