//! Changelog rendering for release bodies.

pub mod format;

pub use format::{ChangelogStyle, render, render_linked, render_with_style};
