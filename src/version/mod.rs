//! Semantic version tags and bumping.

pub mod bump;
pub mod tag;

pub use bump::{BumpDirective, BumpType, apply_bump_to_version, bump, determine_new_tag};
pub use tag::{format_tag, parse_tag, validate};
