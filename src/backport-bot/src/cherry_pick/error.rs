//! Cherry-pick error types.

use crate::host::HostError;
use thiserror::Error;

/// Errors that abort a cherry-pick.
///
/// Commit objects created before the failure are left unreferenced.
#[derive(Debug, Error)]
pub enum PickError {
    /// There was nothing to replay.
    #[error("No commits to cherry-pick")]
    NoCommits,

    /// The target branch could not be read.
    #[error("Failed to read target branch '{branch}': {source}")]
    TargetBranch {
        branch: String,
        #[source]
        source: HostError,
    },

    /// Creating a replayed commit failed.
    #[error("Failed to replay commit {sha}: {source}")]
    CreateCommit {
        sha: String,
        #[source]
        source: HostError,
    },

    /// The temp branch already exists.
    #[error("Branch '{branch}' already exists")]
    BranchExists { branch: String },

    /// Creating the temp branch failed for another reason.
    #[error("Failed to create branch '{branch}': {source}")]
    CreateBranch {
        branch: String,
        #[source]
        source: HostError,
    },
}
