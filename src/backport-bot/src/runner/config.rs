//! Runner configuration.

use std::path::{Path, PathBuf};

/// Configuration for a backport run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Repository in "owner/name" format.
    repository: String,
    /// GitHub token used for API calls.
    token: String,
    /// Whether to preview backports without writing anything.
    dry_run: bool,
    /// Maximum number of pairs processed concurrently.
    concurrency: usize,
    /// Stop after scanning this many closed pull requests.
    max_pulls: Option<usize>,
    /// Alternative API root, for GitHub Enterprise.
    api_url: Option<String>,
    /// Path to `backport.toml`; defaults apply when unset.
    config_path: Option<PathBuf>,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(repository: String, token: String, dry_run: bool, concurrency: usize) -> Self {
        Self {
            repository,
            token,
            dry_run,
            concurrency,
            max_pulls: None,
            api_url: None,
            config_path: None,
        }
    }

    /// Sets the settings file to load.
    pub fn with_config_path(mut self, config_path: PathBuf) -> Self {
        self.config_path = Some(config_path);
        self
    }

    /// Sets a custom API root.
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = Some(api_url);
        self
    }

    /// Limits how many closed pull requests are scanned.
    pub fn with_max_pulls(mut self, max_pulls: usize) -> Self {
        self.max_pulls = Some(max_pulls);
        self
    }

    /// Returns the repository in "owner/name" format.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the max number of pairs processed at once (at least 1).
    pub fn concurrency(&self) -> usize {
        self.concurrency.max(1)
    }

    /// Returns the scan limit, if any.
    pub fn max_pulls(&self) -> Option<usize> {
        self.max_pulls
    }

    /// Returns the custom API root, if any.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }

    /// Returns the settings file path, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}
