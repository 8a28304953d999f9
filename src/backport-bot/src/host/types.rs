//! Snapshots of remote repository objects.

use serde::{Deserialize, Serialize};

/// How a pull request was closed, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeState {
    /// Merged into its base branch.
    Merged,
    /// Closed without merging.
    ClosedUnmerged,
    /// Still open.
    Open,
}

/// A pull request as listed by the host.
///
/// Taken once when the pull is scanned and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct PullRequest {
    /// Pull request number.
    pub number: u64,

    /// Pull request title.
    pub title: String,

    /// Pull request description. Empty when the author left none.
    pub body: String,

    /// Login of the author, if the account still exists.
    pub author: Option<String>,

    /// Merge state at scan time.
    pub state: MergeState,

    /// Label names attached to the pull request.
    pub labels: Vec<String>,

    /// Commit recorded by the host when the pull was merged.
    pub merge_commit_sha: Option<String>,

    /// RFC 3339 timestamp of when the pull was closed.
    pub closed_at: Option<String>,
}

/// One page of closed pull requests.
#[derive(Debug, Clone, Default)]
pub struct PullPage {
    /// Pulls on this page.
    pub items: Vec<PullRequest>,

    /// Number of the next page, if there is one.
    pub next_page: Option<u32>,
}

/// An issue timeline event attached to a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueEvent {
    /// Event type, e.g. `closed` or `merged`.
    pub event: String,

    /// Commit referenced by the event.
    #[serde(default)]
    pub commit_id: Option<String>,

    /// RFC 3339 creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

impl IssueEvent {
    /// Creates an event of the given kind.
    pub fn new(event: impl Into<String>, commit_id: Option<&str>) -> Self {
        Self {
            event: event.into(),
            commit_id: commit_id.map(str::to_owned),
            created_at: None,
        }
    }
}

/// A commit object read from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    /// Commit hash.
    pub sha: String,

    /// Full commit message.
    pub message: String,

    /// Hash of the tree the commit points at.
    pub tree: String,
}

/// Name and email used as author and committer of new commits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identity {
    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "Backport Bot".to_string(),
            email: "backport-bot@users.noreply.github.com".to_string(),
        }
    }
}

/// A commit object to create on the host.
#[derive(Debug, Clone)]
pub struct NewCommit {
    /// Commit message.
    pub message: String,

    /// Existing tree hash to reuse.
    pub tree: String,

    /// Parent commit hashes.
    pub parents: Vec<String>,

    /// Author and committer.
    pub identity: Identity,
}

/// Relationship of a head branch to a base branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonStatus {
    /// Head contains base plus new commits.
    Ahead,
    /// Head is an ancestor of base.
    Behind,
    /// Both point at the same commit.
    Identical,
    /// Both sides carry commits the other lacks.
    Diverged,
    /// Status not recognised.
    #[serde(other)]
    Unknown,
}

/// A pull request to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPull {
    /// Title.
    pub title: String,

    /// Markdown body.
    pub body: String,

    /// Branch with the changes.
    pub head: String,

    /// Branch to merge into.
    pub base: String,

    /// Whether to open the pull as a draft.
    pub draft: bool,
}

/// A pull request created by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPull {
    /// Pull request number.
    pub number: u64,

    /// Pull request URL.
    pub url: String,
}
