//! Backport candidate selection.
//!
//! A closed pull request is a candidate when it carries the sentinel label
//! and at least one `backport/<major>.<minor>` label. Each distinct version
//! becomes one (pull request, target) pair.

mod target;

pub use target::{parse_label, BackportTarget, LabelKind};

use crate::host::PullRequest;
use std::collections::HashSet;

/// A pull request paired with one version to backport it to.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The original pull request.
    pub pull: PullRequest,

    /// The version to backport to.
    pub target: BackportTarget,
}

/// Returns the backport targets requested by a pull request.
///
/// Empty unless the pull carries `sentinel`. Versions are deduplicated,
/// keeping the order of first appearance.
#[must_use]
pub fn select_targets(pull: &PullRequest, sentinel: &str) -> Vec<BackportTarget> {
    if !pull.labels.iter().any(|label| label == sentinel) {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    pull.labels
        .iter()
        .filter_map(|label| match parse_label(label) {
            LabelKind::Backport(target) => Some(target),
            LabelKind::Other => None,
        })
        .filter(|target| seen.insert(target.version().to_string()))
        .collect()
}

/// Expands pull requests into (pull request, target) pairs.
#[must_use]
pub fn select_candidates<'a>(
    pulls: impl IntoIterator<Item = &'a PullRequest>,
    sentinel: &str,
) -> Vec<Candidate> {
    pulls
        .into_iter()
        .flat_map(|pull| {
            select_targets(pull, sentinel)
                .into_iter()
                .map(move |target| Candidate {
                    pull: pull.clone(),
                    target,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MergeState;

    const SENTINEL: &str = "promoted-to-master";

    fn pull(number: u64, labels: &[&str]) -> PullRequest {
        PullRequest {
            number,
            title: format!("Change {number}"),
            body: String::new(),
            author: Some("octocat".to_string()),
            state: MergeState::Merged,
            labels: labels.iter().map(|l| (*l).to_string()).collect(),
            merge_commit_sha: Some(format!("m{number}")),
            closed_at: None,
        }
    }

    fn versions(targets: &[BackportTarget]) -> Vec<&str> {
        targets.iter().map(BackportTarget::version).collect()
    }

    #[test]
    fn requires_sentinel_label() {
        let targets = select_targets(&pull(1, &["backport/5.2"]), SENTINEL);
        assert!(targets.is_empty());
    }

    #[test]
    fn requires_backport_label() {
        let targets = select_targets(&pull(1, &[SENTINEL, "bug"]), SENTINEL);
        assert!(targets.is_empty());
    }

    #[test]
    fn ignores_pulls_without_any_relevant_label() {
        let targets = select_targets(&pull(1, &["bug", "docs"]), SENTINEL);
        assert!(targets.is_empty());
    }

    #[test]
    fn emits_one_target_per_version() {
        let targets = select_targets(
            &pull(
                1,
                &["backport/5.2", SENTINEL, "backport/5.1", "backport/6.0"],
            ),
            SENTINEL,
        );
        assert_eq!(versions(&targets), vec!["5.2", "5.1", "6.0"]);
    }

    #[test]
    fn deduplicates_versions() {
        let targets = select_targets(
            &pull(1, &[SENTINEL, "backport/5.2", "backport/5.2"]),
            SENTINEL,
        );
        assert_eq!(versions(&targets), vec!["5.2"]);
    }

    #[test]
    fn skips_malformed_backport_labels() {
        let targets = select_targets(
            &pull(1, &[SENTINEL, "backport/5", "backport/5.3"]),
            SENTINEL,
        );
        assert_eq!(versions(&targets), vec!["5.3"]);
    }

    #[test]
    fn expands_candidates_across_pulls() {
        let pulls = vec![
            pull(1, &[SENTINEL, "backport/5.2", "backport/5.1"]),
            pull(2, &["backport/5.2"]),
            pull(3, &[SENTINEL, "backport/5.0"]),
        ];

        let candidates = select_candidates(&pulls, SENTINEL);

        let pairs: Vec<(u64, &str)> = candidates
            .iter()
            .map(|c| (c.pull.number, c.target.version()))
            .collect();
        assert_eq!(pairs, vec![(1, "5.2"), (1, "5.1"), (3, "5.0")]);
    }
}
