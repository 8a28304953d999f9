//! Commit resolution.
//!
//! Works out which commits a closed pull request produced, i.e. what has to
//! be replayed onto a maintenance branch.

mod resolution;

pub use resolution::{Resolution, ResolvedFrom, UnresolvedReason};

use crate::host::{CommitRef, HostError, MergeState, PullRequest, RepositoryHost};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn, Instrument};

/// Which commits of a merged pull request to replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitStrategy {
    /// The single commit the host recorded for the merge.
    #[default]
    MergeCommit,
    /// Every commit contributed by the pull request, oldest first.
    PullCommits,
}

/// Resolves the ordered commits to replay for a pull request.
///
/// Merged pulls resolve according to `strategy`. Pulls closed without
/// merging resolve to the commit referenced by their first `closed` event
/// that carries one.
///
/// # Errors
///
/// Returns [`HostError`] if the host cannot be reached or a referenced
/// commit cannot be read. A pull for which no commit can be determined is
/// not an error; it yields [`Resolution::Unresolved`].
pub async fn resolve_commits(
    host: &dyn RepositoryHost,
    pull: &PullRequest,
    strategy: CommitStrategy,
) -> Result<Resolution, HostError> {
    let span = info_span!("resolve", pr = pull.number, ?strategy);

    async {
        let (shas, from) = match pull.state {
            MergeState::Open => return Ok(Resolution::unresolved(UnresolvedReason::StillOpen)),
            MergeState::Merged => match strategy {
                CommitStrategy::MergeCommit => match &pull.merge_commit_sha {
                    Some(sha) => (vec![sha.clone()], ResolvedFrom::MergeCommit),
                    None => {
                        return Ok(Resolution::unresolved(
                            UnresolvedReason::MissingMergeCommit,
                        ))
                    }
                },
                CommitStrategy::PullCommits => {
                    let shas = host.list_pull_commits(pull.number).await?;
                    if shas.is_empty() {
                        return Ok(Resolution::unresolved(UnresolvedReason::NoCommits));
                    }
                    (shas, ResolvedFrom::PullCommits)
                }
            },
            MergeState::ClosedUnmerged => match closing_commit(host, pull.number).await? {
                Ok(sha) => (vec![sha], ResolvedFrom::ClosingEvent),
                Err(reason) => return Ok(Resolution::unresolved(reason)),
            },
        };

        let shas: Vec<&str> = shas.iter().map(String::as_str).collect();
        let commits = read_commits(host, &shas).await?;
        debug!(count = commits.len(), ?from, "Resolved commits");

        Ok(Resolution::Resolved { commits, from })
    }
    .instrument(span)
    .await
}

/// Finds the commit that closed an unmerged pull request.
async fn closing_commit(
    host: &dyn RepositoryHost,
    number: u64,
) -> Result<Result<String, UnresolvedReason>, HostError> {
    let events = host.list_issue_events(number).await?;
    let mut saw_closed = false;

    for event in events.into_iter().filter(|event| event.event == "closed") {
        saw_closed = true;
        if let Some(sha) = event.commit_id {
            return Ok(Ok(sha));
        }
    }

    if saw_closed {
        warn!(pr = number, "Closing event does not reference a commit");
        Ok(Err(UnresolvedReason::ClosingEventWithoutCommit))
    } else {
        warn!(pr = number, "No closing event found");
        Ok(Err(UnresolvedReason::NoClosingEvent))
    }
}

/// Reads commit objects for a list of hashes, preserving order.
///
/// # Errors
///
/// Returns the first [`HostError`] encountered.
pub async fn read_commits(
    host: &dyn RepositoryHost,
    shas: &[&str],
) -> Result<Vec<CommitRef>, HostError> {
    let mut commits = Vec::with_capacity(shas.len());
    for sha in shas {
        commits.push(host.get_commit(sha).await?);
    }
    Ok(commits)
}
