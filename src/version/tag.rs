//! `vMAJOR.MINOR.PATCH` tag grammar.

use std::sync::LazyLock;

use regex_lite::Regex;
use semver::Version;

use crate::error::VersionError;

/// Prefix every release tag carries.
pub const TAG_PREFIX: &str = "v";

/// Anchored at the start only: `v1.2.3-rc1` and `v1.2.3xyz` both match.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+\.\d+\.\d+").expect("Invalid regex"));

/// Check whether `tag` looks like a release tag (`v` prefix required).
pub fn validate(tag: &str) -> bool {
    TAG_RE.is_match(tag)
}

/// Parse a tag into its numeric triple.
///
/// The leading `v` is optional here. Exactly three dot-separated numeric
/// components are required; pre-release or build suffixes are rejected.
pub fn parse_tag(tag: &str) -> Result<Version, VersionError> {
    let raw = tag.strip_prefix(TAG_PREFIX).unwrap_or(tag);
    let parts: Vec<&str> = raw.split('.').collect();
    if parts.len() != 3 {
        return Err(VersionError::WrongComponentCount(tag.to_string()));
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|e| VersionError::ParseFailed {
            tag: tag.to_string(),
            component: part.to_string(),
            source: e,
        })?;
    }

    Ok(Version::new(numbers[0], numbers[1], numbers[2]))
}

/// Render a version in canonical tag form, e.g. `v1.2.3`.
pub fn format_tag(version: &Version) -> String {
    format!(
        "{}{}.{}.{}",
        TAG_PREFIX, version.major, version.minor, version.patch
    )
}
