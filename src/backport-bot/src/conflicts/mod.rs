//! Conflict detection between a backport branch and its target.

use crate::host::{ComparisonStatus, RepositoryHost};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn, Instrument};

/// Outcome assumed when the branch comparison itself fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompareErrorPolicy {
    /// Treat the branch as mergeable and let review catch problems.
    #[default]
    AssumeMergeable,
    /// Treat the branch as diverged, so the pull request opens as a draft.
    AssumeDiverged,
}

/// Classification of a backport branch against its target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// The backport branch continues the target; ready to merge.
    Clean {
        /// Status reported by the comparison.
        status: ComparisonStatus,
    },

    /// The target moved independently; needs manual resolution.
    Diverged,

    /// The comparison failed; the policy decided the outcome.
    Undetermined {
        /// Error reported by the host.
        error: String,
        /// Policy that was applied.
        policy: CompareErrorPolicy,
    },
}

impl Verdict {
    /// Whether the backport pull request should be opened as a draft.
    #[must_use]
    pub fn is_draft(&self) -> bool {
        match self {
            Self::Clean { .. } => false,
            Self::Diverged => true,
            Self::Undetermined { policy, .. } => *policy == CompareErrorPolicy::AssumeDiverged,
        }
    }
}

impl From<ComparisonStatus> for Verdict {
    fn from(status: ComparisonStatus) -> Self {
        match status {
            ComparisonStatus::Diverged => Self::Diverged,
            status => Self::Clean { status },
        }
    }
}

/// Compares `temp_branch` against `target_branch`.
///
/// Never fails: a comparison error is logged and resolved by `policy`.
pub async fn detect_conflicts(
    host: &dyn RepositoryHost,
    target_branch: &str,
    temp_branch: &str,
    policy: CompareErrorPolicy,
) -> Verdict {
    let span = info_span!("detect_conflicts", target = %target_branch, branch = %temp_branch);

    async {
        match host.compare(target_branch, temp_branch).await {
            Ok(status) => {
                debug!(?status, "Compared branches");
                Verdict::from(status)
            }
            Err(e) => {
                warn!(error = %e, ?policy, "Branch comparison failed, applying policy");
                Verdict::Undetermined {
                    error: e.to_string(),
                    policy,
                }
            }
        }
    }
    .instrument(span)
    .await
}
