//! Backport publication error types.

use crate::host::HostError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that prevent a backport pull request from being opened.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The title could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The host refused to create the pull request.
    #[error("Failed to create pull request: {0}")]
    CreateFailed(#[from] HostError),
}
