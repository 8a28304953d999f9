//! GitHub implementation of [`RepositoryHost`].

use super::{
    CommitRef, ComparisonStatus, CreatedPull, HostError, IssueEvent, MergeState, NewCommit,
    NewPull, PullPage, PullRequest, RepositoryHost,
};
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Page size for endpoints that are read to completion.
const PER_PAGE: u8 = 100;

/// Repository host backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubHost {
    client: Octocrab,
    owner: String,
    repo: String,
    full_name: String,
}

impl GitHubHost {
    /// Creates a host for `owner/repo` using an authenticated client.
    pub fn new(client: Octocrab, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        let owner = owner.into();
        let repo = repo.into();
        let full_name = format!("{owner}/{repo}");
        Self {
            client,
            owner,
            repo,
            full_name,
        }
    }

    fn route(&self, path: &str) -> String {
        format!("/repos/{}/{}/{path}", self.owner, self.repo)
    }

    /// Reads every page of a list endpoint.
    async fn get_all<T>(&self, route: &str) -> Result<Vec<T>, HostError>
    where
        T: DeserializeOwned + Send,
    {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let params = PageParams {
                per_page: PER_PAGE,
                page,
            };
            let batch: Vec<T> = self.client.get(route, Some(&params)).await?;
            let last = batch.len() < usize::from(PER_PAGE);
            items.extend(batch);
            if last {
                return Ok(items);
            }
            page += 1;
        }
    }
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[derive(Deserialize)]
struct GitCommit {
    sha: String,
    message: String,
    tree: ObjectSha,
}

#[derive(Deserialize)]
struct ObjectSha {
    sha: String,
}

#[derive(Deserialize)]
struct GitRef {
    object: ObjectSha,
}

#[derive(Serialize)]
struct Signature<'a> {
    name: &'a str,
    email: &'a str,
}

#[derive(Serialize)]
struct CreateCommitBody<'a> {
    message: &'a str,
    tree: &'a str,
    parents: &'a [String],
    author: Signature<'a>,
    committer: Signature<'a>,
}

#[derive(Serialize)]
struct CreateRefBody<'a> {
    #[serde(rename = "ref")]
    reference: String,
    sha: &'a str,
}

#[derive(Deserialize)]
struct Comparison {
    status: ComparisonStatus,
}

#[derive(Serialize)]
struct AssigneesBody<'a> {
    assignees: [&'a str; 1],
}

/// Returns the HTTP status of an API error, if it carries one.
fn status_code(error: &octocrab::Error) -> Option<u16> {
    match error {
        octocrab::Error::GitHub { source, .. } => Some(source.status_code.as_u16()),
        _ => None,
    }
}

/// Converts an octocrab pull request into our snapshot.
fn pull_from_octocrab(pr: octocrab::models::pulls::PullRequest) -> PullRequest {
    let state = if pr.merged_at.is_some() {
        MergeState::Merged
    } else if pr.closed_at.is_some() {
        MergeState::ClosedUnmerged
    } else {
        MergeState::Open
    };

    PullRequest {
        number: pr.number,
        title: pr.title.unwrap_or_default(),
        body: pr.body.unwrap_or_default(),
        author: pr.user.map(|user| user.login),
        state,
        labels: pr
            .labels
            .unwrap_or_default()
            .into_iter()
            .map(|label| label.name)
            .collect(),
        merge_commit_sha: pr.merge_commit_sha,
        closed_at: pr.closed_at.map(|at| at.to_rfc3339()),
    }
}

#[async_trait]
impl RepositoryHost for GitHubHost {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    async fn list_closed_pulls(&self, page: u32, per_page: u8) -> Result<PullPage, HostError> {
        debug!(page, per_page, "Listing closed pull requests");
        let result = self
            .client
            .pulls(&self.owner, &self.repo)
            .list()
            .state(octocrab::params::State::Closed)
            .per_page(per_page)
            .page(page)
            .send()
            .await?;

        let next_page = result.next.as_ref().map(|_| page + 1);
        Ok(PullPage {
            items: result.items.into_iter().map(pull_from_octocrab).collect(),
            next_page,
        })
    }

    async fn list_issue_events(&self, number: u64) -> Result<Vec<IssueEvent>, HostError> {
        debug!(pr = number, "Listing issue events");
        self.get_all(&self.route(&format!("issues/{number}/events")))
            .await
    }

    async fn list_pull_commits(&self, number: u64) -> Result<Vec<String>, HostError> {
        debug!(pr = number, "Listing pull request commits");
        let commits: Vec<ObjectSha> = self
            .get_all(&self.route(&format!("pulls/{number}/commits")))
            .await?;
        Ok(commits.into_iter().map(|commit| commit.sha).collect())
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitRef, HostError> {
        debug!(sha, "Reading commit");
        let commit: GitCommit = self
            .client
            .get(self.route(&format!("git/commits/{sha}")), None::<&()>)
            .await
            .map_err(|e| match status_code(&e) {
                Some(404 | 422) => HostError::CommitNotFound {
                    sha: sha.to_string(),
                },
                _ => HostError::from(e),
            })?;

        Ok(CommitRef {
            sha: commit.sha,
            message: commit.message,
            tree: commit.tree.sha,
        })
    }

    async fn branch_tip(&self, branch: &str) -> Result<String, HostError> {
        debug!(branch, "Reading branch tip");
        let reference: GitRef = self
            .client
            .get(self.route(&format!("git/ref/heads/{branch}")), None::<&()>)
            .await
            .map_err(|e| match status_code(&e) {
                Some(404) => HostError::BranchNotFound {
                    branch: branch.to_string(),
                },
                _ => HostError::from(e),
            })?;

        Ok(reference.object.sha)
    }

    async fn create_commit(&self, commit: &NewCommit) -> Result<String, HostError> {
        ensure_core_rate_limit(&self.client).await?;
        let signature = || Signature {
            name: &commit.identity.name,
            email: &commit.identity.email,
        };
        let body = CreateCommitBody {
            message: &commit.message,
            tree: &commit.tree,
            parents: &commit.parents,
            author: signature(),
            committer: signature(),
        };

        let created: ObjectSha = self
            .client
            .post(self.route("git/commits"), Some(&body))
            .await?;
        debug!(sha = %created.sha, tree = %commit.tree, "Created commit");
        Ok(created.sha)
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<(), HostError> {
        ensure_core_rate_limit(&self.client).await?;
        let body = CreateRefBody {
            reference: format!("refs/heads/{branch}"),
            sha,
        };

        let _: serde_json::Value = self
            .client
            .post(self.route("git/refs"), Some(&body))
            .await
            .map_err(|e| match status_code(&e) {
                Some(422) => HostError::RefAlreadyExists {
                    name: branch.to_string(),
                },
                _ => HostError::from(e),
            })?;
        debug!(branch, sha, "Created ref");
        Ok(())
    }

    async fn compare(&self, base: &str, head: &str) -> Result<ComparisonStatus, HostError> {
        debug!(base, head, "Comparing branches");
        let comparison: Comparison = self
            .client
            .get(self.route(&format!("compare/{base}...{head}")), None::<&()>)
            .await?;
        Ok(comparison.status)
    }

    async fn create_pull(&self, pull: &NewPull) -> Result<CreatedPull, HostError> {
        ensure_core_rate_limit(&self.client).await?;
        let pr = self
            .client
            .pulls(&self.owner, &self.repo)
            .create(&pull.title, &pull.head, &pull.base)
            .body(&pull.body)
            .draft(pull.draft)
            .send()
            .await?;

        let url = pr
            .html_url
            .as_ref()
            .map(|u| u.to_string())
            .unwrap_or_else(|| format!("https://github.com/{}/pull/{}", self.full_name, pr.number));

        Ok(CreatedPull {
            number: pr.number,
            url,
        })
    }

    async fn add_assignee(&self, number: u64, login: &str) -> Result<(), HostError> {
        ensure_core_rate_limit(&self.client).await?;
        let body = AssigneesBody { assignees: [login] };
        let _: serde_json::Value = self
            .client
            .post(self.route(&format!("issues/{number}/assignees")), Some(&body))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comparison_status() {
        let comparison: Comparison =
            serde_json::from_str(r#"{"status": "diverged", "ahead_by": 1}"#).unwrap();
        assert_eq!(comparison.status, ComparisonStatus::Diverged);

        let comparison: Comparison = serde_json::from_str(r#"{"status": "sideways"}"#).unwrap();
        assert_eq!(comparison.status, ComparisonStatus::Unknown);
    }

    #[test]
    fn parses_issue_events() {
        let events: Vec<IssueEvent> = serde_json::from_str(
            r#"[
                {"event": "labeled", "commit_id": null},
                {"event": "closed", "commit_id": "abc123", "created_at": "2024-05-01T10:00:00Z"}
            ]"#,
        )
        .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].commit_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn serializes_ref_body() {
        let body = CreateRefBody {
            reference: "refs/heads/backport/42/to-5.2".to_string(),
            sha: "abc",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["ref"], "refs/heads/backport/42/to-5.2");
        assert_eq!(json["sha"], "abc");
    }
}
