//! Repository host error types.

use thiserror::Error;

/// Errors returned by a [`RepositoryHost`](super::RepositoryHost).
#[derive(Debug, Error)]
pub enum HostError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The requested branch does not exist.
    #[error("Branch '{branch}' does not exist")]
    BranchNotFound { branch: String },

    /// A ref with the requested name already exists.
    #[error("Reference '{name}' already exists")]
    RefAlreadyExists { name: String },

    /// The requested commit does not exist.
    #[error("Commit '{sha}' does not exist")]
    CommitNotFound { sha: String },

    /// The host refused the operation.
    #[error("{operation} was rejected: {message}")]
    Rejected {
        operation: &'static str,
        message: String,
    },
}

impl HostError {
    /// Returns true if this error reports a ref name collision.
    #[must_use]
    pub fn is_ref_collision(&self) -> bool {
        matches!(self, Self::RefAlreadyExists { .. })
    }
}
