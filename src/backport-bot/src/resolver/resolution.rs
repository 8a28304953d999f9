//! Commit resolution outcomes.

use crate::host::CommitRef;
use serde::Serialize;
use std::fmt;

/// Where resolved commits came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedFrom {
    /// The merge commit recorded for a merged pull request.
    MergeCommit,
    /// The individual commits of a merged pull request.
    PullCommits,
    /// The commit referenced by the event that closed an unmerged pull request.
    ClosingEvent,
}

/// Why no commit could be resolved for a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The pull request has not been closed.
    StillOpen,
    /// The pull request is merged but the host recorded no merge commit.
    MissingMergeCommit,
    /// The pull request contributes no commits.
    NoCommits,
    /// No `closed` event exists on the pull request's timeline.
    NoClosingEvent,
    /// `closed` events exist but none references a commit.
    ClosingEventWithoutCommit,
}

impl UnresolvedReason {
    /// Returns the reason as a stable code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StillOpen => "still_open",
            Self::MissingMergeCommit => "missing_merge_commit",
            Self::NoCommits => "no_commits",
            Self::NoClosingEvent => "no_closing_event",
            Self::ClosingEventWithoutCommit => "closing_event_without_commit",
        }
    }
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving a pull request's commits.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Commits to replay, oldest first. Never empty.
    Resolved {
        /// Commits in replay order.
        commits: Vec<CommitRef>,
        /// Source of the commits.
        from: ResolvedFrom,
    },

    /// Nothing to replay.
    Unresolved {
        /// Why resolution failed.
        reason: UnresolvedReason,
    },
}

impl Resolution {
    pub(crate) fn unresolved(reason: UnresolvedReason) -> Self {
        Self::Unresolved { reason }
    }

    /// Returns the resolved commits, or an empty slice.
    #[must_use]
    pub fn commits(&self) -> &[CommitRef] {
        match self {
            Self::Resolved { commits, .. } => commits,
            Self::Unresolved { .. } => &[],
        }
    }

    /// Returns the reason resolution failed, if it did.
    #[must_use]
    pub fn reason(&self) -> Option<UnresolvedReason> {
        match self {
            Self::Resolved { .. } => None,
            Self::Unresolved { reason } => Some(*reason),
        }
    }
}
