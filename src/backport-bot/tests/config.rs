use std::path::PathBuf;

use backport_bot::host::{MergeState, PullRequest};
use backport_bot::{
    load_config, parse_label, CommitStrategy, CompareErrorPolicy, ConfigError, LabelKind,
    TemplateRenderer,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn load_config_from_fixture() {
    let config = load_config(&fixture("backport.toml")).unwrap();

    assert_eq!(config.sentinel_label, "ready-for-backport");
    assert_eq!(config.commit_strategy, CommitStrategy::PullCommits);
    assert_eq!(config.on_compare_error, CompareErrorPolicy::AssumeDiverged);
    assert!(!config.assign_author);
    assert_eq!(config.per_page, 50);
    assert_eq!(config.identity.name, "Release Robot");
    assert_eq!(config.identity.email, "releases@example.com");
}

#[test]
fn fixture_formats_render() {
    let config = load_config(&fixture("backport.toml")).unwrap();
    let renderer = TemplateRenderer::new(&config).unwrap();
    let LabelKind::Backport(target) = parse_label("backport/5.2") else {
        panic!("label should parse");
    };
    let pull = PullRequest {
        number: 42,
        title: "Fix crash".to_string(),
        body: String::new(),
        author: None,
        state: MergeState::Merged,
        labels: Vec::new(),
        merge_commit_sha: None,
        closed_at: None,
    };

    assert_eq!(renderer.target_branch(&target).unwrap(), "release/5.2.x");
    assert_eq!(
        renderer.temp_branch(&pull, &target).unwrap(),
        "auto-backport/5.2/pr-42"
    );
    assert_eq!(
        renderer.title(&pull, &target).unwrap(),
        "Fix crash (backport to 5.2)"
    );
}

#[test]
fn load_config_rejects_invalid_fixture() {
    let result = load_config(&fixture("invalid.toml"));

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
}
