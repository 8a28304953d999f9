//! Backport settings deserialization and validation.

use crate::config::ConfigError;
use crate::conflicts::CompareErrorPolicy;
use crate::host::Identity;
use crate::resolver::CommitStrategy;
use serde::Deserialize;
use std::path::Path;

/// Parsed content of `backport.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct BackportConfig {
    /// Label a pull request must carry before any backport is attempted.
    pub sentinel_label: String,

    /// Handlebars format for the maintenance branch of a version.
    pub target_branch_format: String,

    /// Handlebars format for the branch holding the replayed commits.
    pub temp_branch_format: String,

    /// Handlebars format for backport pull request titles.
    pub title_format: String,

    /// Which commits of a merged pull request to replay.
    pub commit_strategy: CommitStrategy,

    /// Outcome assumed when the branch comparison fails.
    pub on_compare_error: CompareErrorPolicy,

    /// Whether to assign the original author to the backport pull request.
    pub assign_author: bool,

    /// Author and committer of replayed commits.
    pub identity: Identity,

    /// Page size when listing closed pull requests.
    pub per_page: u8,
}

impl Default for BackportConfig {
    fn default() -> Self {
        Self {
            sentinel_label: default_sentinel_label(),
            target_branch_format: default_target_branch_format(),
            temp_branch_format: default_temp_branch_format(),
            title_format: default_title_format(),
            commit_strategy: CommitStrategy::default(),
            on_compare_error: CompareErrorPolicy::default(),
            assign_author: true,
            identity: Identity::default(),
            per_page: 100,
        }
    }
}

/// Default sentinel label.
#[must_use]
pub fn default_sentinel_label() -> String {
    "promoted-to-master".to_string()
}

/// Default target branch format.
#[must_use]
pub fn default_target_branch_format() -> String {
    "branch-{{version}}".to_string()
}

/// Default temp branch format.
#[must_use]
pub fn default_temp_branch_format() -> String {
    "backport/{{number}}/to-{{version}}".to_string()
}

/// Default backport title format.
#[must_use]
pub fn default_title_format() -> String {
    "[Backport {{version}}] {{title}}".to_string()
}

impl BackportConfig {
    /// Validates settings that deserialization cannot check.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the offending key.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let fail = |message: &str| {
            Err(ConfigError::ValidationError {
                path: path.display().to_string(),
                message: message.to_string(),
            })
        };

        if self.sentinel_label.trim().is_empty() {
            return fail("sentinel-label must not be empty");
        }

        for (key, format) in [
            ("target-branch-format", &self.target_branch_format),
            ("temp-branch-format", &self.temp_branch_format),
            ("title-format", &self.title_format),
        ] {
            if format.trim().is_empty() {
                return fail(&format!("{key} must not be empty"));
            }
        }

        if !self.target_branch_format.contains("{{version}}") {
            return fail("target-branch-format must reference {{version}}");
        }

        // Unique per (pull, version) so reruns collide instead of overwriting.
        if !self.temp_branch_format.contains("{{number}}")
            || !self.temp_branch_format.contains("{{version}}")
        {
            return fail("temp-branch-format must reference both {{number}} and {{version}}");
        }

        if self.identity.name.trim().is_empty() || !self.identity.email.contains('@') {
            return fail("identity needs a name and a valid email");
        }

        if !(1..=100).contains(&self.per_page) {
            return fail("per-page must be between 1 and 100");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate(config: &BackportConfig) -> Result<(), ConfigError> {
        config.validate(Path::new("backport.toml"))
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate(&BackportConfig::default()).is_ok());
    }

    #[test]
    fn temp_branch_format_must_be_unique_per_pair() {
        let config = BackportConfig {
            temp_branch_format: "backport/{{version}}".to_string(),
            ..BackportConfig::default()
        };
        assert!(matches!(
            validate(&config),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn rejects_invalid_identity() {
        let config = BackportConfig {
            identity: Identity {
                name: "Bot".to_string(),
                email: "not-an-email".to_string(),
            },
            ..BackportConfig::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        let config = BackportConfig {
            per_page: 0,
            ..BackportConfig::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn rejects_empty_sentinel() {
        let config = BackportConfig {
            sentinel_label: "  ".to_string(),
            ..BackportConfig::default()
        };
        assert!(validate(&config).is_err());
    }
}
