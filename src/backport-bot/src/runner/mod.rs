//! Orchestrates a backport run.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::cherry_pick::cherry_pick;
use crate::config::{load_config, BackportConfig};
use crate::conflicts::detect_conflicts;
use crate::host::{closed_pulls, GitHubHost, PullRequest, RepositoryHost};
use crate::publish::{publish_backport, PublishRequest};
use crate::resolver::{resolve_commits, Resolution};
use crate::selector::{select_candidates, Candidate};
use crate::summary::{FailureStage, PairOutcome, RunSummary};
use crate::templates::TemplateRenderer;
use futures::stream::{self, StreamExt, TryStreamExt};
use octocrab::Octocrab;
use std::pin::pin;
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn, Instrument};
use url::Url;

/// Scans closed pull requests and opens the backports they ask for.
pub struct Runner {
    config: RunnerConfig,
    settings: BackportConfig,
    host: Arc<dyn RepositoryHost>,
    renderer: TemplateRenderer,
}

impl Runner {
    /// Builds a runner talking to GitHub.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the settings cannot be loaded, the
    /// repository or API URL is malformed, or the client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        let settings = match config.config_path() {
            Some(path) => load_config(path)?,
            None => BackportConfig::default(),
        };
        let (owner, repo) = split_repository(config.repository())?;

        let mut builder = Octocrab::builder().personal_token(config.token().to_string());
        if let Some(api_url) = config.api_url() {
            let url = Url::parse(api_url).map_err(|source| RunnerError::InvalidApiUrl {
                value: api_url.to_string(),
                source,
            })?;
            builder = builder.base_uri(url.as_str())?;
        }
        let octocrab = builder.build()?;

        let host = Arc::new(GitHubHost::new(octocrab, owner, repo));
        Self::with_host(config, settings, host)
    }

    /// Builds a runner on top of an existing host.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Template`] if a configured format does not render.
    pub fn with_host(
        config: RunnerConfig,
        settings: BackportConfig,
        host: Arc<dyn RepositoryHost>,
    ) -> Result<Self, RunnerError> {
        let renderer = TemplateRenderer::new(&settings)?;
        Ok(Self {
            config,
            settings,
            host,
            renderer,
        })
    }

    /// Executes the full run.
    ///
    /// Pull requests are listed lazily and handled one at a time; the
    /// versions requested by a single pull request are processed
    /// concurrently.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Host`] if closed pull requests cannot be
    /// listed. Failures of individual pairs are recorded in the
    /// returned summary instead.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let mut summary = RunSummary::new(self.config.dry_run());
        info!(
            repo = %self.host.full_name(),
            sentinel = %self.settings.sentinel_label,
            dry_run = self.config.dry_run(),
            "Scanning closed pull requests"
        );

        let limit = self.config.max_pulls().unwrap_or(usize::MAX);
        let pulls = closed_pulls(self.host.as_ref(), self.settings.per_page).take(limit);
        let mut pulls = pin!(pulls);

        while let Some(pull) = pulls.try_next().await? {
            summary.pulls_scanned += 1;
            self.process_pull(&pull, &mut summary).await;
        }

        info!(
            scanned = summary.pulls_scanned,
            selected = summary.pairs_selected,
            created = summary.backports_created,
            failed = summary.pairs_failed,
            "Run complete"
        );
        Ok(summary)
    }

    async fn process_pull(&self, pull: &PullRequest, summary: &mut RunSummary) {
        let candidates = select_candidates([pull], &self.settings.sentinel_label);
        if candidates.is_empty() {
            debug!(pr = pull.number, "Not a backport candidate");
            return;
        }

        info!(pr = pull.number, count = candidates.len(), "Found backport targets");
        summary.pairs_selected += candidates.len();

        let outcomes: Vec<PairOutcome> = stream::iter(&candidates)
            .map(|candidate| self.process_pair(candidate))
            .buffer_unordered(self.config.concurrency())
            .collect()
            .await;

        for outcome in &outcomes {
            summary.record_outcome(outcome);
        }
    }

    async fn process_pair(&self, candidate: &Candidate) -> PairOutcome {
        let pull = &candidate.pull;
        let target = &candidate.target;
        let span = info_span!("backport", pr = pull.number, version = %target.version());

        async {
            let failed = |stage: FailureStage, error: String| PairOutcome::Failed {
                pull: pull.number,
                version: target.version().to_string(),
                stage,
                error,
            };

            let names = self.renderer.target_branch(target).and_then(|target_branch| {
                let temp_branch = self.renderer.temp_branch(pull, target)?;
                Ok((target_branch, temp_branch))
            });
            let (target_branch, temp_branch) = match names {
                Ok(names) => names,
                Err(e) => {
                    error!(error = %e, "Failed to render branch names");
                    return failed(FailureStage::Naming, e.to_string());
                }
            };

            let resolution =
                resolve_commits(self.host.as_ref(), pull, self.settings.commit_strategy).await;
            let commits = match resolution {
                Ok(Resolution::Resolved { commits, .. }) => commits,
                Ok(Resolution::Unresolved { reason }) => {
                    warn!(%reason, "Could not determine commits to backport, skipping");
                    return PairOutcome::Skipped {
                        pull: pull.number,
                        version: target.version().to_string(),
                        reason: reason.as_str().to_string(),
                    };
                }
                Err(e) => {
                    error!(error = %e, "Failed to resolve commits");
                    return failed(FailureStage::Resolution, e.to_string());
                }
            };

            if self.config.dry_run() {
                let title = match self.renderer.title(pull, target) {
                    Ok(title) => title,
                    Err(e) => return failed(FailureStage::Naming, e.to_string()),
                };
                print_dry_run_preview(pull, &target_branch, &temp_branch, &title, commits.len());
                return PairOutcome::Planned {
                    pull: pull.number,
                    version: target.version().to_string(),
                    target_branch,
                    temp_branch,
                    title,
                    commits: commits.len(),
                };
            }

            let picked = match cherry_pick(
                self.host.as_ref(),
                &commits,
                &target_branch,
                &temp_branch,
                &self.settings.identity,
            )
            .await
            {
                Ok(picked) => picked,
                Err(e) => {
                    error!(error = %e, "Failed to replay commits");
                    return failed(FailureStage::Reconstruction, e.to_string());
                }
            };

            let verdict = detect_conflicts(
                self.host.as_ref(),
                &target_branch,
                &temp_branch,
                self.settings.on_compare_error,
            )
            .await;

            let request = PublishRequest {
                pull,
                target,
                target_branch: &target_branch,
                picked: &picked,
                verdict: &verdict,
            };
            let published = publish_backport(
                self.host.as_ref(),
                request,
                &self.renderer,
                self.settings.assign_author,
            )
            .await;
            match published {
                Ok(backport) => PairOutcome::Created { backport },
                Err(e) => {
                    error!(error = %e, branch = %temp_branch, "Failed to open backport pull request");
                    failed(FailureStage::Publication, e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn split_repository(repository: &str) -> Result<(String, String), RunnerError> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(RunnerError::InvalidRepository {
            value: repository.to_string(),
        }),
    }
}

fn print_dry_run_preview(
    pull: &PullRequest,
    target_branch: &str,
    temp_branch: &str,
    title: &str,
    commits: usize,
) {
    println!("\n[DRY RUN] #{} {}", pull.number, pull.title);
    println!("  Would replay {commits} commit(s) onto {target_branch}");
    println!("  Would create branch: {temp_branch}");
    println!("  Would open: \"{title}\"");
}
