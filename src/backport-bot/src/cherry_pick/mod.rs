//! Object-level cherry-picking.
//!
//! Replays commits onto another branch without a merge: each new commit
//! reuses the tree of its source commit verbatim and is parented on the
//! previous step, starting from the target branch's tip. File contents are
//! never read, so conflicts are not detected here.

mod error;

pub use error::PickError;

use crate::host::{CommitRef, Identity, NewCommit, RepositoryHost};
use serde::Serialize;
use tracing::{debug, info, info_span, Instrument};

/// Prefix of the line recording which commit was replayed.
pub const PROVENANCE_PREFIX: &str = "(cherry picked from commit ";

/// Formats the provenance line for a replayed commit.
#[must_use]
pub fn provenance_line(sha: &str) -> String {
    format!("{PROVENANCE_PREFIX}{sha})")
}

/// A commit created by replaying a source commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconstructedCommit {
    /// Hash of the new commit.
    pub sha: String,
    /// Hash of the replayed commit.
    pub source: String,
    /// Tree shared with the replayed commit.
    pub tree: String,
    /// The single parent of the new commit.
    pub parent: String,
}

/// A branch holding replayed commits.
#[derive(Debug, Clone, Serialize)]
pub struct PickedBranch {
    /// Branch name.
    pub branch: String,
    /// Tip of the target branch the chain starts from.
    pub base: String,
    /// Hash of the last replayed commit.
    pub head: String,
    /// Replayed commits, in order.
    pub commits: Vec<ReconstructedCommit>,
    /// One provenance line per replayed commit.
    pub provenance: Vec<String>,
}

/// Replays `commits` onto `target_branch` and publishes them as `temp_branch`.
///
/// Creating the branch is the only step with a visible effect; it happens
/// after every commit object exists.
///
/// # Errors
///
/// Returns [`PickError`] if `commits` is empty, the target branch cannot be
/// read, a commit cannot be created, or the branch cannot be created. A
/// branch that already exists is reported as [`PickError::BranchExists`] and
/// left untouched.
pub async fn cherry_pick(
    host: &dyn RepositoryHost,
    commits: &[CommitRef],
    target_branch: &str,
    temp_branch: &str,
    identity: &Identity,
) -> Result<PickedBranch, PickError> {
    let span = info_span!(
        "cherry_pick",
        target = %target_branch,
        branch = %temp_branch,
        count = commits.len()
    );

    async {
        if commits.is_empty() {
            return Err(PickError::NoCommits);
        }

        let base = host
            .branch_tip(target_branch)
            .await
            .map_err(|source| PickError::TargetBranch {
                branch: target_branch.to_string(),
                source,
            })?;
        debug!(base = %base, "Read target branch tip");

        let mut parent = base.clone();
        let mut replayed = Vec::with_capacity(commits.len());
        let mut provenance = Vec::with_capacity(commits.len());

        for commit in commits {
            let line = provenance_line(&commit.sha);
            let new_commit = NewCommit {
                message: format!("{}\n\n{line}", commit.message.trim_end()),
                tree: commit.tree.clone(),
                parents: vec![parent.clone()],
                identity: identity.clone(),
            };

            let sha = host
                .create_commit(&new_commit)
                .await
                .map_err(|source| PickError::CreateCommit {
                    sha: commit.sha.clone(),
                    source,
                })?;
            debug!(source = %commit.sha, sha = %sha, "Replayed commit");

            replayed.push(ReconstructedCommit {
                sha: sha.clone(),
                source: commit.sha.clone(),
                tree: commit.tree.clone(),
                parent,
            });
            provenance.push(line);
            parent = sha;
        }

        host.create_ref(temp_branch, &parent)
            .await
            .map_err(|source| {
                if source.is_ref_collision() {
                    PickError::BranchExists {
                        branch: temp_branch.to_string(),
                    }
                } else {
                    PickError::CreateBranch {
                        branch: temp_branch.to_string(),
                        source,
                    }
                }
            })?;
        info!(head = %parent, "Published cherry-picked branch");

        Ok(PickedBranch {
            branch: temp_branch.to_string(),
            base,
            head: parent,
            commits: replayed,
            provenance,
        })
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{FailPoint, InMemoryHost};
    use crate::resolver::read_commits;

    fn host() -> InMemoryHost {
        let host = InMemoryHost::new("acme/widgets");
        host.seed_commit("T", "tip of 5.2", "tT", &[]);
        host.seed_commit("A", "Fix parser\n", "tA", &["X"]);
        host.seed_commit("B", "Fix lexer", "tB", &["A"]);
        host.set_branch("branch-5.2", "T");
        host
    }

    #[tokio::test]
    async fn builds_linear_chain_on_target_tip() {
        let host = host();
        let commits = read_commits(&host, &["A", "B"]).await.unwrap();

        let picked = cherry_pick(
            &host,
            &commits,
            "branch-5.2",
            "backport/42/to-5.2",
            &Identity::default(),
        )
        .await
        .unwrap();

        assert_eq!(host.created_commit_count(), 2);
        assert_eq!(picked.base, "T");
        assert_eq!(picked.commits.len(), 2);

        let a = host.commit(&picked.commits[0].sha).unwrap();
        let b = host.commit(&picked.commits[1].sha).unwrap();
        assert_eq!(a.parents, vec!["T".to_string()]);
        assert_eq!(a.tree, "tA");
        assert_eq!(b.parents, vec![picked.commits[0].sha.clone()]);
        assert_eq!(b.tree, "tB");
        assert_eq!(b.identity, Some(Identity::default()));

        assert_eq!(picked.head, picked.commits[1].sha);
        assert_eq!(
            host.branch("backport/42/to-5.2").as_deref(),
            Some(picked.head.as_str())
        );
        assert_eq!(host.branch("branch-5.2").as_deref(), Some("T"));
    }

    #[tokio::test]
    async fn records_provenance_per_commit() {
        let host = host();
        let commits = read_commits(&host, &["A", "B"]).await.unwrap();

        let picked = cherry_pick(&host, &commits, "branch-5.2", "tmp", &Identity::default())
            .await
            .unwrap();

        assert_eq!(
            picked.provenance,
            vec![
                "(cherry picked from commit A)".to_string(),
                "(cherry picked from commit B)".to_string()
            ]
        );
        let a = host.commit(&picked.commits[0].sha).unwrap();
        assert_eq!(a.message, "Fix parser\n\n(cherry picked from commit A)");
    }

    #[tokio::test]
    async fn second_pick_with_same_branch_fails() {
        let host = host();
        let commits = read_commits(&host, &["A"]).await.unwrap();
        let identity = Identity::default();

        let first = cherry_pick(&host, &commits, "branch-5.2", "tmp", &identity)
            .await
            .unwrap();
        let second = cherry_pick(&host, &commits, "branch-5.2", "tmp", &identity).await;

        assert!(matches!(second, Err(PickError::BranchExists { .. })));
        assert_eq!(host.branch("tmp"), Some(first.head));
    }

    #[tokio::test]
    async fn missing_target_branch_fails() {
        let host = host();
        let commits = read_commits(&host, &["A"]).await.unwrap();

        let result = cherry_pick(&host, &commits, "branch-9.9", "tmp", &Identity::default()).await;

        assert!(matches!(result, Err(PickError::TargetBranch { .. })));
        assert_eq!(host.created_commit_count(), 0);
    }

    #[tokio::test]
    async fn commit_failure_creates_no_branch() {
        let host = host();
        host.fail(FailPoint::CreateCommit);
        let commits = read_commits(&host, &["A"]).await.unwrap();

        let result = cherry_pick(&host, &commits, "branch-5.2", "tmp", &Identity::default()).await;

        assert!(matches!(result, Err(PickError::CreateCommit { .. })));
        assert_eq!(host.branch("tmp"), None);
    }

    #[tokio::test]
    async fn empty_commit_list_is_rejected() {
        let host = host();
        let result = cherry_pick(&host, &[], "branch-5.2", "tmp", &Identity::default()).await;
        assert!(matches!(result, Err(PickError::NoCommits)));
    }
}
