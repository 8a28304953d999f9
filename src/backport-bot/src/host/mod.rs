//! Access to the hosting platform.
//!
//! The backport pipeline never talks to GitHub directly. Every read of pull
//! requests and git objects, and every write of commits, refs and pull
//! requests, goes through [`RepositoryHost`]. [`GitHubHost`] implements it on
//! top of octocrab; [`InMemoryHost`] keeps a whole repository in memory.

mod error;
mod github;
pub mod memory;
mod pages;
mod types;

pub use error::HostError;
pub use github::GitHubHost;
pub use memory::{FailPoint, InMemoryHost};
pub use pages::closed_pulls;
pub use types::{
    CommitRef, ComparisonStatus, CreatedPull, Identity, IssueEvent, MergeState, NewCommit,
    NewPull, PullPage, PullRequest,
};

use async_trait::async_trait;

/// Remote operations consumed by the backport pipeline.
///
/// Implementations only reference existing object hashes when creating
/// commits; no tree or blob content is ever transferred.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Repository name in "owner/name" format.
    fn full_name(&self) -> &str;

    /// Lists one page of closed pull requests (1-based page numbers).
    async fn list_closed_pulls(&self, page: u32, per_page: u8) -> Result<PullPage, HostError>;

    /// Lists the issue events of a pull request, oldest first.
    async fn list_issue_events(&self, number: u64) -> Result<Vec<IssueEvent>, HostError>;

    /// Lists the hashes of the commits contributed by a pull request, oldest first.
    async fn list_pull_commits(&self, number: u64) -> Result<Vec<String>, HostError>;

    /// Reads a commit object.
    async fn get_commit(&self, sha: &str) -> Result<CommitRef, HostError>;

    /// Reads the commit a branch currently points at.
    async fn branch_tip(&self, branch: &str) -> Result<String, HostError>;

    /// Creates a commit object and returns its hash.
    async fn create_commit(&self, commit: &NewCommit) -> Result<String, HostError>;

    /// Creates `refs/heads/{branch}` at `sha`.
    ///
    /// Fails with [`HostError::RefAlreadyExists`] if the branch exists.
    async fn create_ref(&self, branch: &str, sha: &str) -> Result<(), HostError>;

    /// Compares `head` against `base`.
    async fn compare(&self, base: &str, head: &str) -> Result<ComparisonStatus, HostError>;

    /// Opens a pull request.
    async fn create_pull(&self, pull: &NewPull) -> Result<CreatedPull, HostError>;

    /// Adds an assignee to a pull request.
    async fn add_assignee(&self, number: u64, login: &str) -> Result<(), HostError>;
}
