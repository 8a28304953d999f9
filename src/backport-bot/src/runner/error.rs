//! Runner error types.

/// Errors that abort a whole run.
///
/// Failures scoped to a single (pull request, version) pair never surface
/// here; they are recorded in the run summary instead.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Settings loading errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// A configured name format does not render.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// GitHub API client initialization errors.
    #[error(transparent)]
    Octocrab(#[from] octocrab::Error),

    /// Listing pull requests or reading repository metadata failed.
    #[error(transparent)]
    Host(#[from] crate::host::HostError),

    /// The repository is not in "owner/name" format.
    #[error("Invalid repository '{value}': expected 'owner/name'")]
    InvalidRepository {
        /// The value given.
        value: String,
    },

    /// The API root is not a valid URL.
    #[error("Invalid API URL '{value}': {source}")]
    InvalidApiUrl {
        /// The value given.
        value: String,
        /// Parse failure.
        #[source]
        source: url::ParseError,
    },
}
