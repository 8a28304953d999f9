//! Per-pair outcome types.

use crate::publish::BackportPr;
use serde::Serialize;
use std::fmt;

/// Pipeline stage at which a pair failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Reading the pull request's commits from the host.
    Resolution,
    /// Rendering branch names.
    Naming,
    /// Creating commits or the temp branch.
    Reconstruction,
    /// Opening the pull request.
    Publication,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Resolution => "resolution",
            Self::Naming => "naming",
            Self::Reconstruction => "reconstruction",
            Self::Publication => "publication",
        })
    }
}

/// Result of processing a single (pull request, version) pair.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PairOutcome {
    /// A backport pull request was opened.
    Created {
        /// The opened pull request.
        backport: BackportPr,
    },

    /// Dry run: what would have been done.
    Planned {
        /// Original pull request number.
        pull: u64,
        /// Target version.
        version: String,
        /// Maintenance branch.
        target_branch: String,
        /// Branch that would hold the replayed commits.
        temp_branch: String,
        /// Title of the pull request that would be opened.
        title: String,
        /// Number of commits that would be replayed.
        commits: usize,
    },

    /// Nothing to do for this pair.
    Skipped {
        /// Original pull request number.
        pull: u64,
        /// Target version.
        version: String,
        /// Reason for skipping.
        reason: String,
    },

    /// The pair failed.
    Failed {
        /// Original pull request number.
        pull: u64,
        /// Target version.
        version: String,
        /// Stage that failed.
        stage: FailureStage,
        /// Error message.
        error: String,
    },
}
