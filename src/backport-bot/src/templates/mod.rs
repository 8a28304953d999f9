//! Naming and text generation for backports.
//!
//! Branch names and titles come from Handlebars formats set in
//! `backport.toml`. Bodies are composed in code so the provenance lines and
//! the back-reference are always present with their stable prefixes.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

use crate::host::PullRequest;

/// Prefix of the line linking a backport to its original pull request.
pub const BACK_REFERENCE_PREFIX: &str = "Backport of #";

/// Composes the body of a backport pull request.
///
/// The original body (when present) comes first, then one provenance line
/// per replayed commit, then the back-reference.
#[must_use]
pub fn render_body(pull: &PullRequest, provenance: &[String]) -> String {
    let mut body = String::new();

    let original = pull.body.trim();
    if !original.is_empty() {
        body.push_str(original);
        body.push_str("\n\n");
    }

    for line in provenance {
        body.push_str(line);
        body.push('\n');
    }

    body.push('\n');
    body.push_str(BACK_REFERENCE_PREFIX);
    body.push_str(&pull.number.to_string());
    body
}
