//! Template renderer.

use crate::config::BackportConfig;
use crate::host::PullRequest;
use crate::selector::BackportTarget;
use bstr::ByteSlice;
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

const TARGET_BRANCH: &str = "target_branch";
const TEMP_BRANCH: &str = "temp_branch";
const TITLE: &str = "title";

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (titles are plain text)
/// - Strict mode (catches misspelled variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();
    hbs.register_escape_fn(no_escape);
    hbs.set_strict_mode(true);
    hbs
}

/// Renders branch names and titles from the configured formats.
///
/// Formats may use `{{version}}`; the temp branch format and the title
/// format may also use `{{number}}`, `{{title}}` and `{{author}}`.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl TemplateRenderer {
    /// Compiles the formats from `config`.
    ///
    /// Each format is rendered once with sample values so that unknown
    /// variables are reported before any pull request is processed.
    ///
    /// # Errors
    ///
    /// Returns an error if a format does not compile or references an
    /// unknown variable.
    pub fn new(config: &BackportConfig) -> Result<Self, super::TemplateError> {
        let mut handlebars = create_handlebars_registry();
        handlebars.register_template_string(TARGET_BRANCH, &config.target_branch_format)?;
        handlebars.register_template_string(TEMP_BRANCH, &config.temp_branch_format)?;
        handlebars.register_template_string(TITLE, &config.title_format)?;

        let renderer = Self { handlebars };

        // Each format sees exactly the data it is rendered with later.
        renderer.handlebars.render(TARGET_BRANCH, &version_data("1.0"))?;
        let sample = json!({
            "version": "1.0",
            "number": 1,
            "title": "title",
            "author": "author"
        });
        for name in [TEMP_BRANCH, TITLE] {
            renderer.handlebars.render(name, &sample)?;
        }
        Ok(renderer)
    }

    /// Renders the maintenance branch name for a version.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the result is not a valid
    /// branch name.
    pub fn target_branch(&self, target: &BackportTarget) -> Result<String, super::TemplateError> {
        let name = self
            .handlebars
            .render(TARGET_BRANCH, &version_data(target.version()))?;
        validate_branch_name(name)
    }

    /// Renders the temp branch name for a (pull request, version) pair.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails or the result is not a valid
    /// branch name.
    pub fn temp_branch(
        &self,
        pull: &PullRequest,
        target: &BackportTarget,
    ) -> Result<String, super::TemplateError> {
        let name = self
            .handlebars
            .render(TEMP_BRANCH, &pull_data(pull, target))?;
        validate_branch_name(name)
    }

    /// Renders the backport pull request title.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn title(
        &self,
        pull: &PullRequest,
        target: &BackportTarget,
    ) -> Result<String, super::TemplateError> {
        Ok(self.handlebars.render(TITLE, &pull_data(pull, target))?)
    }
}

fn version_data(version: &str) -> Value {
    json!({ "version": version })
}

fn pull_data(pull: &PullRequest, target: &BackportTarget) -> Value {
    json!({
        "version": target.version(),
        "number": pull.number,
        "title": pull.title,
        "author": pull.author.as_deref().unwrap_or("")
    })
}

/// Checks that a rendered name can be used under `refs/heads/`.
fn validate_branch_name(name: String) -> Result<String, super::TemplateError> {
    if let Err(e) = gix_validate::reference::name_partial(name.as_bytes().as_bstr()) {
        return Err(super::TemplateError::InvalidBranchName {
            message: e.to_string(),
            name,
        });
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MergeState;
    use crate::selector::{parse_label, LabelKind};

    fn sample_pull() -> PullRequest {
        PullRequest {
            number: 42,
            title: "Fix <crash> & \"hang\"".to_string(),
            body: String::new(),
            author: Some("octocat".to_string()),
            state: MergeState::Merged,
            labels: Vec::new(),
            merge_commit_sha: Some("c1".to_string()),
            closed_at: None,
        }
    }

    fn target(version: &str) -> BackportTarget {
        match parse_label(&format!("backport/{version}")) {
            LabelKind::Backport(target) => target,
            LabelKind::Other => panic!("invalid version {version}"),
        }
    }

    #[test]
    fn renders_default_names() {
        let renderer = TemplateRenderer::new(&BackportConfig::default()).unwrap();
        let pull = sample_pull();
        let target = target("5.2");

        assert_eq!(renderer.target_branch(&target).unwrap(), "branch-5.2");
        assert_eq!(
            renderer.temp_branch(&pull, &target).unwrap(),
            "backport/42/to-5.2"
        );
    }

    #[test]
    fn renders_title_without_escaping() {
        let renderer = TemplateRenderer::new(&BackportConfig::default()).unwrap();
        let title = renderer.title(&sample_pull(), &target("5.2")).unwrap();
        assert_eq!(title, "[Backport 5.2] Fix <crash> & \"hang\"");
    }

    #[test]
    fn renders_custom_formats() {
        let config = BackportConfig {
            target_branch_format: "release/v{{version}}".to_string(),
            temp_branch_format: "bp-{{number}}-{{version}}-{{author}}".to_string(),
            title_format: "{{title}} ({{version}} backport of #{{number}})".to_string(),
            ..BackportConfig::default()
        };
        let renderer = TemplateRenderer::new(&config).unwrap();
        let pull = sample_pull();
        let target = target("6.0");

        assert_eq!(renderer.target_branch(&target).unwrap(), "release/v6.0");
        assert_eq!(
            renderer.temp_branch(&pull, &target).unwrap(),
            "bp-42-6.0-octocat"
        );
        assert_eq!(
            renderer.title(&pull, &target).unwrap(),
            "Fix <crash> & \"hang\" (6.0 backport of #42)"
        );
    }

    #[test]
    fn rejects_unknown_variables() {
        let config = BackportConfig {
            title_format: "{{tittle}}".to_string(),
            ..BackportConfig::default()
        };
        assert!(matches!(
            TemplateRenderer::new(&config),
            Err(crate::templates::TemplateError::RenderError(_))
        ));
    }

    #[test]
    fn rejects_pull_variables_in_target_branch() {
        for format in ["branch-{{number}}-{{version}}", "{{author}}/{{version}}", "{{title}}"] {
            let config = BackportConfig {
                target_branch_format: format.to_string(),
                ..BackportConfig::default()
            };
            assert!(
                matches!(
                    TemplateRenderer::new(&config),
                    Err(crate::templates::TemplateError::RenderError(_))
                ),
                "{format} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_invalid_branch_names() {
        let config = BackportConfig {
            temp_branch_format: "backport {{number}}..{{version}}".to_string(),
            ..BackportConfig::default()
        };
        let renderer = TemplateRenderer::new(&config).unwrap();

        let result = renderer.temp_branch(&sample_pull(), &target("5.2"));
        assert!(matches!(
            result,
            Err(crate::templates::TemplateError::InvalidBranchName { .. })
        ));
    }
}
