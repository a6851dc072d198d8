//! Release body rendering from merged pull requests.

use std::fmt::Write;

use crate::github::PullRequest;

/// Heading every release body starts with.
pub const CHANGELOG_HEADING: &str = "## Changelog";

/// How each pull request line is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangelogStyle {
    /// `- Title (#12) by @login`
    #[default]
    Plain,
    /// `- [Title](url) ([#12](url)) by [@login](author url)`
    Linked,
}

impl ChangelogStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Linked => "linked",
        }
    }
}

impl std::str::FromStr for ChangelogStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(Self::Plain),
            "linked" => Ok(Self::Linked),
            _ => Err(format!("Unknown changelog style: {}", s)),
        }
    }
}

/// Render the plain changelog. PRs appear in the order given.
pub fn render(prs: &[PullRequest]) -> String {
    render_with_style(prs, ChangelogStyle::Plain)
}

/// Render the changelog with Markdown links to each PR and its author.
pub fn render_linked(prs: &[PullRequest]) -> String {
    render_with_style(prs, ChangelogStyle::Linked)
}

pub fn render_with_style(prs: &[PullRequest], style: ChangelogStyle) -> String {
    let mut body = format!("\n{}\n\n", CHANGELOG_HEADING);
    for pr in prs {
        // Writing to a String cannot fail.
        let _ = match style {
            ChangelogStyle::Plain => writeln!(
                body,
                "- {} (#{}) by @{}",
                pr.title, pr.number, pr.author_login
            ),
            ChangelogStyle::Linked => writeln!(
                body,
                "- [{title}]({url}) ([#{number}]({url})) by [@{login}]({author_url})",
                title = pr.title,
                url = pr.html_url,
                number = pr.number,
                login = pr.author_login,
                author_url = pr.author_url,
            ),
        };
    }
    body
}
