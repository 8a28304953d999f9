//! In-memory implementation of [`RepositoryHost`].
//!
//! Holds commits, refs and pull requests in process memory. Comparisons are
//! computed from the actual commit graph, and individual operations can be
//! made to fail to exercise error paths.

use super::{
    CommitRef, ComparisonStatus, CreatedPull, HostError, Identity, IssueEvent, MergeState,
    NewCommit, NewPull, PullPage, PullRequest, RepositoryHost,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// [`RepositoryHost::list_closed_pulls`].
    ListPulls,
    /// [`RepositoryHost::create_commit`].
    CreateCommit,
    /// [`RepositoryHost::compare`].
    Compare,
    /// [`RepositoryHost::create_pull`].
    CreatePull,
    /// [`RepositoryHost::add_assignee`].
    AddAssignee,
}

impl FailPoint {
    fn operation(self) -> &'static str {
        match self {
            Self::ListPulls => "list pulls",
            Self::CreateCommit => "create commit",
            Self::Compare => "compare",
            Self::CreatePull => "create pull",
            Self::AddAssignee => "add assignee",
        }
    }
}

/// A commit object held by [`InMemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCommit {
    /// Commit message.
    pub message: String,
    /// Tree hash.
    pub tree: String,
    /// Parent hashes.
    pub parents: Vec<String>,
    /// Identity for commits created through the host.
    pub identity: Option<Identity>,
}

/// A pull request opened through [`InMemoryHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedPull {
    /// Assigned number.
    pub number: u64,
    /// Request as received.
    pub pull: NewPull,
    /// Logins assigned afterwards.
    pub assignees: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    commits: HashMap<String, StoredCommit>,
    refs: BTreeMap<String, String>,
    pulls: Vec<PullRequest>,
    events: HashMap<u64, Vec<IssueEvent>>,
    pull_commits: HashMap<u64, Vec<String>>,
    opened: Vec<OpenedPull>,
    failures: HashSet<FailPoint>,
    created_commits: usize,
    pull_pages_listed: usize,
    next_object: u64,
}

/// Repository host that lives entirely in memory.
#[derive(Debug)]
pub struct InMemoryHost {
    full_name: String,
    state: Mutex<State>,
}

impl InMemoryHost {
    /// Creates an empty repository.
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            state: Mutex::new(State {
                next_object: 1,
                ..State::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores an existing commit under a caller-chosen hash.
    pub fn seed_commit(&self, sha: &str, message: &str, tree: &str, parents: &[&str]) {
        self.state().commits.insert(
            sha.to_string(),
            StoredCommit {
                message: message.to_string(),
                tree: tree.to_string(),
                parents: parents.iter().map(|p| (*p).to_string()).collect(),
                identity: None,
            },
        );
    }

    /// Points a branch at a commit, replacing any previous target.
    pub fn set_branch(&self, branch: &str, sha: &str) {
        self.state()
            .refs
            .insert(branch.to_string(), sha.to_string());
    }

    /// Adds a pull request to the listing.
    pub fn add_pull(&self, pull: PullRequest) {
        self.state().pulls.push(pull);
    }

    /// Appends an issue event to a pull request's timeline.
    pub fn add_event(&self, number: u64, event: IssueEvent) {
        self.state().events.entry(number).or_default().push(event);
    }

    /// Sets the commits contributed by a pull request, oldest first.
    pub fn set_pull_commits(&self, number: u64, shas: &[&str]) {
        self.state()
            .pull_commits
            .insert(number, shas.iter().map(|s| (*s).to_string()).collect());
    }

    /// Makes every later call of an operation fail.
    pub fn fail(&self, point: FailPoint) {
        self.state().failures.insert(point);
    }

    /// Returns a stored commit.
    pub fn commit(&self, sha: &str) -> Option<StoredCommit> {
        self.state().commits.get(sha).cloned()
    }

    /// Returns the commit a branch points at.
    pub fn branch(&self, branch: &str) -> Option<String> {
        self.state().refs.get(branch).cloned()
    }

    /// Number of commits created through [`RepositoryHost::create_commit`].
    pub fn created_commit_count(&self) -> usize {
        self.state().created_commits
    }

    /// Number of pages requested through [`RepositoryHost::list_closed_pulls`].
    pub fn pull_pages_listed(&self) -> usize {
        self.state().pull_pages_listed
    }

    /// Names of all branches.
    pub fn branches(&self) -> Vec<String> {
        self.state().refs.keys().cloned().collect()
    }

    /// Pull requests opened so far.
    pub fn opened_pulls(&self) -> Vec<OpenedPull> {
        self.state().opened.clone()
    }

    fn check(&self, point: FailPoint) -> Result<(), HostError> {
        if self.state().failures.contains(&point) {
            return Err(HostError::Rejected {
                operation: point.operation(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl State {
    fn next_sha(&mut self) -> String {
        let sha = format!("{:040x}", self.next_object);
        self.next_object += 1;
        sha
    }

    fn tip(&self, branch: &str) -> Result<String, HostError> {
        self.refs
            .get(branch)
            .cloned()
            .ok_or_else(|| HostError::BranchNotFound {
                branch: branch.to_string(),
            })
    }

    /// Returns true if `ancestor` is reachable from `descendant`.
    fn is_ancestor(&self, ancestor: &str, descendant: &str) -> bool {
        let mut queue = VecDeque::from([descendant.to_string()]);
        let mut seen = HashSet::new();
        while let Some(sha) = queue.pop_front() {
            if sha == ancestor {
                return true;
            }
            if !seen.insert(sha.clone()) {
                continue;
            }
            if let Some(commit) = self.commits.get(&sha) {
                queue.extend(commit.parents.iter().cloned());
            }
        }
        false
    }
}

#[async_trait]
impl RepositoryHost for InMemoryHost {
    fn full_name(&self) -> &str {
        &self.full_name
    }

    async fn list_closed_pulls(&self, page: u32, per_page: u8) -> Result<PullPage, HostError> {
        self.check(FailPoint::ListPulls)?;
        let mut state = self.state();
        state.pull_pages_listed += 1;
        let closed: Vec<&PullRequest> = state
            .pulls
            .iter()
            .filter(|pull| pull.state != MergeState::Open)
            .collect();

        let per_page = usize::from(per_page.max(1));
        let start = page.saturating_sub(1) as usize * per_page;
        let items: Vec<PullRequest> = closed
            .iter()
            .skip(start)
            .take(per_page)
            .map(|pull| (*pull).clone())
            .collect();
        let next_page = (start + per_page < closed.len()).then_some(page + 1);

        Ok(PullPage { items, next_page })
    }

    async fn list_issue_events(&self, number: u64) -> Result<Vec<IssueEvent>, HostError> {
        Ok(self.state().events.get(&number).cloned().unwrap_or_default())
    }

    async fn list_pull_commits(&self, number: u64) -> Result<Vec<String>, HostError> {
        Ok(self
            .state()
            .pull_commits
            .get(&number)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_commit(&self, sha: &str) -> Result<CommitRef, HostError> {
        let state = self.state();
        let commit = state
            .commits
            .get(sha)
            .ok_or_else(|| HostError::CommitNotFound {
                sha: sha.to_string(),
            })?;
        Ok(CommitRef {
            sha: sha.to_string(),
            message: commit.message.clone(),
            tree: commit.tree.clone(),
        })
    }

    async fn branch_tip(&self, branch: &str) -> Result<String, HostError> {
        self.state().tip(branch)
    }

    async fn create_commit(&self, commit: &NewCommit) -> Result<String, HostError> {
        self.check(FailPoint::CreateCommit)?;
        let mut state = self.state();
        if let Some(missing) = commit
            .parents
            .iter()
            .find(|parent| !state.commits.contains_key(*parent))
        {
            return Err(HostError::CommitNotFound {
                sha: missing.clone(),
            });
        }

        let sha = state.next_sha();
        state.commits.insert(
            sha.clone(),
            StoredCommit {
                message: commit.message.clone(),
                tree: commit.tree.clone(),
                parents: commit.parents.clone(),
                identity: Some(commit.identity.clone()),
            },
        );
        state.created_commits += 1;
        Ok(sha)
    }

    async fn create_ref(&self, branch: &str, sha: &str) -> Result<(), HostError> {
        let mut state = self.state();
        if state.refs.contains_key(branch) {
            return Err(HostError::RefAlreadyExists {
                name: branch.to_string(),
            });
        }
        if !state.commits.contains_key(sha) {
            return Err(HostError::CommitNotFound {
                sha: sha.to_string(),
            });
        }
        state.refs.insert(branch.to_string(), sha.to_string());
        Ok(())
    }

    async fn compare(&self, base: &str, head: &str) -> Result<ComparisonStatus, HostError> {
        self.check(FailPoint::Compare)?;
        let state = self.state();
        let base = state.tip(base)?;
        let head = state.tip(head)?;

        let status = if base == head {
            ComparisonStatus::Identical
        } else if state.is_ancestor(&base, &head) {
            ComparisonStatus::Ahead
        } else if state.is_ancestor(&head, &base) {
            ComparisonStatus::Behind
        } else {
            ComparisonStatus::Diverged
        };
        Ok(status)
    }

    async fn create_pull(&self, pull: &NewPull) -> Result<CreatedPull, HostError> {
        self.check(FailPoint::CreatePull)?;
        let mut state = self.state();
        state.tip(&pull.head)?;
        state.tip(&pull.base)?;

        let highest_listed = state.pulls.iter().map(|p| p.number).max().unwrap_or(0);
        let highest_opened = state.opened.iter().map(|p| p.number).max().unwrap_or(0);
        let number = highest_listed.max(highest_opened) + 1;

        state.opened.push(OpenedPull {
            number,
            pull: pull.clone(),
            assignees: Vec::new(),
        });
        Ok(CreatedPull {
            number,
            url: format!("https://github.com/{}/pull/{number}", self.full_name),
        })
    }

    async fn add_assignee(&self, number: u64, login: &str) -> Result<(), HostError> {
        self.check(FailPoint::AddAssignee)?;
        let mut state = self.state();
        let opened = state
            .opened
            .iter_mut()
            .find(|pull| pull.number == number)
            .ok_or_else(|| HostError::Rejected {
                operation: "add assignee",
                message: format!("pull request #{number} does not exist"),
            })?;
        opened.assignees.push(login.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host_with_history() -> InMemoryHost {
        let host = InMemoryHost::new("acme/widgets");
        host.seed_commit("root", "root", "t0", &[]);
        host.seed_commit("a", "a", "t1", &["root"]);
        host.seed_commit("b", "b", "t2", &["root"]);
        host.seed_commit("c", "c", "t3", &["a"]);
        host.set_branch("base", "a");
        host.set_branch("ahead", "c");
        host.set_branch("other", "b");
        host
    }

    #[tokio::test]
    async fn compares_from_ancestry() {
        let host = host_with_history();

        assert_eq!(
            host.compare("base", "ahead").await.unwrap(),
            ComparisonStatus::Ahead
        );
        assert_eq!(
            host.compare("ahead", "base").await.unwrap(),
            ComparisonStatus::Behind
        );
        assert_eq!(
            host.compare("base", "other").await.unwrap(),
            ComparisonStatus::Diverged
        );
        assert_eq!(
            host.compare("base", "base").await.unwrap(),
            ComparisonStatus::Identical
        );
    }

    #[tokio::test]
    async fn create_ref_rejects_existing_names() {
        let host = host_with_history();

        let err = host.create_ref("base", "c").await.unwrap_err();
        assert!(err.is_ref_collision());
        assert_eq!(host.branch("base").as_deref(), Some("a"));
    }

    #[tokio::test]
    async fn create_commit_requires_known_parents() {
        let host = host_with_history();
        let commit = NewCommit {
            message: "m".to_string(),
            tree: "t9".to_string(),
            parents: vec!["missing".to_string()],
            identity: Identity::default(),
        };

        let err = host.create_commit(&commit).await.unwrap_err();
        assert!(matches!(err, HostError::CommitNotFound { .. }));
        assert_eq!(host.created_commit_count(), 0);
    }

    #[tokio::test]
    async fn paginates_closed_pulls() {
        let host = InMemoryHost::new("acme/widgets");
        for number in 1..=5 {
            host.add_pull(PullRequest {
                number,
                title: format!("pull {number}"),
                body: String::new(),
                author: None,
                state: if number == 3 {
                    MergeState::Open
                } else {
                    MergeState::Merged
                },
                labels: Vec::new(),
                merge_commit_sha: None,
                closed_at: None,
            });
        }

        let first = host.list_closed_pulls(1, 3).await.unwrap();
        assert_eq!(
            first.items.iter().map(|p| p.number).collect::<Vec<_>>(),
            vec![1, 2, 4]
        );
        assert_eq!(first.next_page, Some(2));

        let second = host.list_closed_pulls(2, 3).await.unwrap();
        assert_eq!(
            second.items.iter().map(|p| p.number).collect::<Vec<_>>(),
            vec![5]
        );
        assert_eq!(second.next_page, None);
    }
}
