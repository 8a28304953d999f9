#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod cherry_pick;
pub mod config;
pub mod conflicts;
pub mod host;
pub mod publish;
pub mod rate_limit;
pub mod resolver;
pub mod runner;
pub mod selector;
pub mod summary;
pub mod templates;

pub use cherry_pick::{
    cherry_pick, provenance_line, PickError, PickedBranch, ReconstructedCommit,
};
pub use config::{load_config, parse_config, BackportConfig, ConfigError};
pub use conflicts::{detect_conflicts, CompareErrorPolicy, Verdict};
pub use host::{closed_pulls, GitHubHost, HostError, InMemoryHost, RepositoryHost};
pub use publish::{publish_backport, AssignmentStatus, BackportPr, PublishError, PublishRequest};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, RateLimitInfo};
pub use resolver::{resolve_commits, CommitStrategy, Resolution, UnresolvedReason};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use selector::{
    parse_label, select_candidates, select_targets, BackportTarget, Candidate, LabelKind,
};
pub use summary::{FailureStage, PairOutcome, RunSummary};
pub use templates::{render_body, TemplateError, TemplateRenderer};
