//! Run summary types.

use super::result::PairOutcome;

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Number of closed pull requests scanned.
    pub pulls_scanned: usize,

    /// Number of (pull request, version) pairs selected.
    pub pairs_selected: usize,

    /// Number of backport pull requests opened.
    pub backports_created: usize,

    /// Number of backport pull requests opened as drafts.
    pub drafts_opened: usize,

    /// Number of failed author assignments.
    pub assignment_failures: usize,

    /// Number of pairs planned in dry-run mode.
    pub pairs_planned: usize,

    /// Number of pairs skipped.
    pub pairs_skipped: usize,

    /// Number of pairs that failed.
    pub pairs_failed: usize,

    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Every recorded outcome, in completion order.
    pub outcomes: Vec<PairOutcome>,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Updates the summary with a pair outcome.
    pub fn record_outcome(&mut self, outcome: &PairOutcome) {
        match outcome {
            PairOutcome::Created { backport } => {
                self.backports_created += 1;
                if backport.draft {
                    self.drafts_opened += 1;
                }
                if backport.assignment.is_failure() {
                    self.assignment_failures += 1;
                }
            }
            PairOutcome::Planned { .. } => self.pairs_planned += 1,
            PairOutcome::Skipped { .. } => self.pairs_skipped += 1,
            PairOutcome::Failed { .. } => self.pairs_failed += 1,
        }
        self.outcomes.push(outcome.clone());
    }

    /// Returns true if any pair failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.pairs_failed > 0
    }
}
