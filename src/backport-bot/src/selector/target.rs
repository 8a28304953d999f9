//! Backport label parsing.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static RE_BACKPORT_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^backport/(\d+\.\d+)$").unwrap());

/// A maintenance version a pull request should be backported to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct BackportTarget {
    version: String,
}

impl BackportTarget {
    /// The `<major>.<minor>` version, e.g. `5.2`.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

/// What a label means to the backport pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelKind {
    /// A `backport/<major>.<minor>` label.
    Backport(BackportTarget),
    /// Any other label, including malformed backport labels.
    Other,
}

/// Classifies a label.
///
/// Only labels of the exact form `backport/<digits>.<digits>` produce a
/// target; `backport/5`, `backport/5.2.1` and `backport/latest` do not.
#[must_use]
pub fn parse_label(label: &str) -> LabelKind {
    match RE_BACKPORT_LABEL.captures(label) {
        Some(captures) => LabelKind::Backport(BackportTarget {
            version: captures[1].to_string(),
        }),
        None => LabelKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backport_labels() {
        match parse_label("backport/5.2") {
            LabelKind::Backport(target) => assert_eq!(target.version(), "5.2"),
            LabelKind::Other => panic!("expected a backport label"),
        }
        match parse_label("backport/2024.10") {
            LabelKind::Backport(target) => assert_eq!(target.version(), "2024.10"),
            LabelKind::Other => panic!("expected a backport label"),
        }
    }

    #[test]
    fn ignores_malformed_labels() {
        for label in [
            "backport/5",
            "backport/5.2.1",
            "backport/latest",
            "backport/5.2-rc",
            "Backport/5.2",
            "please-backport/5.2",
            "promoted-to-master",
            "",
        ] {
            assert_eq!(parse_label(label), LabelKind::Other, "label {label:?}");
        }
    }
}
