//! Backport settings.
//!
//! Settings live in an optional `backport.toml`. Every key has a default, so
//! a missing file and an empty file behave the same way.
//!
//! ```toml
//! sentinel-label = "promoted-to-master"
//! target-branch-format = "branch-{{version}}"
//! temp-branch-format = "backport/{{number}}/to-{{version}}"
//! title-format = "[Backport {{version}}] {{title}}"
//! commit-strategy = "merge-commit"
//! on-compare-error = "assume-mergeable"
//! assign-author = true
//! per-page = 100
//!
//! [identity]
//! name = "Backport Bot"
//! email = "backport-bot@users.noreply.github.com"
//! ```

mod error;
mod settings;

pub use error::ConfigError;
pub use settings::BackportConfig;

use std::path::Path;
use tracing::{debug, info};

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns [`ConfigError::MissingFile`] if the file does not exist, and a
/// parse or validation error if its content is invalid.
pub fn load_config(path: &Path) -> Result<BackportConfig, ConfigError> {
    info!(path = %path.display(), "Loading backport settings");

    if !path.exists() {
        return Err(ConfigError::MissingFile {
            path: path.display().to_string(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.display().to_string(),
        source: e,
    })?;

    let config = parse_config(&content, path)?;
    debug!(?config, "Loaded backport settings");
    Ok(config)
}

/// Parses and validates settings from TOML text.
///
/// `path` is only used in error messages.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or a setting is invalid.
pub fn parse_config(content: &str, path: &Path) -> Result<BackportConfig, ConfigError> {
    let config: BackportConfig = toml::from_str(content).map_err(|e| ConfigError::TomlError {
        path: path.display().to_string(),
        source: e,
    })?;
    config.validate(path)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflicts::CompareErrorPolicy;
    use crate::resolver::CommitStrategy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_config_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("backport.toml");
        fs::write(
            &path,
            r#"
sentinel-label = "ready-for-backport"
commit-strategy = "pull-commits"
on-compare-error = "assume-diverged"
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.sentinel_label, "ready-for-backport");
        assert_eq!(config.commit_strategy, CommitStrategy::PullCommits);
        assert_eq!(config.on_compare_error, CompareErrorPolicy::AssumeDiverged);
    }

    #[test]
    fn load_config_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = load_config(&temp.path().join("nonexistent.toml"));
        assert!(matches!(result, Err(ConfigError::MissingFile { .. })));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = parse_config("", Path::new("backport.toml")).unwrap();
        assert_eq!(config.sentinel_label, "promoted-to-master");
        assert_eq!(config.commit_strategy, CommitStrategy::MergeCommit);
        assert_eq!(config.on_compare_error, CompareErrorPolicy::AssumeMergeable);
        assert!(config.assign_author);
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = parse_config("sentinal-label = \"typo\"", Path::new("backport.toml"));
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }
}
