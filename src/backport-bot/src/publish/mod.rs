//! Backport pull request publication.
//!
//! Opens the pull request that proposes a cherry-picked branch for a
//! maintenance branch, then tries to hand it to the original author.

mod backport_pr;
mod error;
mod status;

pub use backport_pr::BackportPr;
pub use error::PublishError;
pub use status::AssignmentStatus;

use crate::cherry_pick::PickedBranch;
use crate::conflicts::Verdict;
use crate::host::{NewPull, PullRequest, RepositoryHost};
use crate::selector::BackportTarget;
use crate::templates::{render_body, TemplateRenderer};
use tracing::{debug, info, info_span, warn, Instrument};

/// Everything needed to open one backport pull request.
#[derive(Debug, Clone, Copy)]
pub struct PublishRequest<'a> {
    /// The original pull request.
    pub pull: &'a PullRequest,
    /// Version being backported to.
    pub target: &'a BackportTarget,
    /// Maintenance branch to merge into.
    pub target_branch: &'a str,
    /// Branch holding the replayed commits.
    pub picked: &'a PickedBranch,
    /// Conflict detection outcome.
    pub verdict: &'a Verdict,
}

/// Opens a backport pull request.
///
/// The draft flag follows the verdict. When `assign_author` is set, the
/// original author is assigned afterwards; a failed assignment is logged
/// and reported in [`BackportPr::assignment`] without failing the publish.
///
/// # Errors
///
/// Returns [`PublishError`] if the title cannot be rendered or the pull
/// request cannot be created.
pub async fn publish_backport(
    host: &dyn RepositoryHost,
    request: PublishRequest<'_>,
    renderer: &TemplateRenderer,
    assign_author: bool,
) -> Result<BackportPr, PublishError> {
    let PublishRequest {
        pull,
        target,
        target_branch,
        picked,
        verdict,
    } = request;

    let span = info_span!(
        "publish",
        pr = pull.number,
        version = %target.version(),
        head = %picked.branch
    );

    async {
        let title = renderer.title(pull, target)?;
        let body = render_body(pull, &picked.provenance);
        let draft = verdict.is_draft();

        debug!(title = %title, draft, "Creating backport pull request");
        let created = host
            .create_pull(&NewPull {
                title: title.clone(),
                body: body.clone(),
                head: picked.branch.clone(),
                base: target_branch.to_string(),
                draft,
            })
            .await?;
        info!(number = created.number, url = %created.url, draft, "Backport pull request created");

        let assignment = if assign_author {
            assign(host, created.number, pull.author.as_deref()).await
        } else {
            AssignmentStatus::Disabled
        };

        Ok(BackportPr {
            number: created.number,
            url: created.url,
            title,
            body,
            head: picked.branch.clone(),
            base: target_branch.to_string(),
            draft,
            original: pull.number,
            version: target.version().to_string(),
            assignment,
        })
    }
    .instrument(span)
    .await
}

/// Assigns `author` to a pull request, reporting rather than propagating failures.
async fn assign(host: &dyn RepositoryHost, number: u64, author: Option<&str>) -> AssignmentStatus {
    let Some(login) = author else {
        return AssignmentStatus::Skipped {
            reason: "original author unknown".to_string(),
        };
    };

    match host.add_assignee(number, login).await {
        Ok(()) => {
            debug!(number, login, "Assigned original author");
            AssignmentStatus::Assigned {
                login: login.to_string(),
            }
        }
        Err(e) => {
            warn!(number, login, error = %e, "Failed to assign original author");
            AssignmentStatus::Failed {
                login: login.to_string(),
                error: e.to_string(),
            }
        }
    }
}
