//! Backport pull request information.

use serde::Serialize;

/// A pull request opened to carry a backport.
#[derive(Debug, Clone, Serialize)]
pub struct BackportPr {
    /// Number of the new pull request.
    pub number: u64,

    /// URL of the new pull request.
    pub url: String,

    /// Title.
    pub title: String,

    /// Rendered body.
    pub body: String,

    /// Branch with the replayed commits.
    pub head: String,

    /// Maintenance branch it targets.
    pub base: String,

    /// Whether it was opened as a draft.
    pub draft: bool,

    /// Number of the original pull request.
    pub original: u64,

    /// Version it backports to.
    pub version: String,

    /// Outcome of assigning the original author.
    pub assignment: super::AssignmentStatus,
}
