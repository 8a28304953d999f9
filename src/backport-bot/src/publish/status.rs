//! Assignment status types.

use serde::Serialize;

/// Outcome of assigning the original author to a backport pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// The author was assigned.
    Assigned {
        /// Assigned login.
        login: String,
    },

    /// Assignment was not attempted.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },

    /// Assignment is turned off in the settings.
    Disabled,

    /// Assignment was attempted and failed.
    Failed {
        /// Login that could not be assigned.
        login: String,
        /// Error message.
        error: String,
    },
}

impl AssignmentStatus {
    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Assigned { .. } => "assigned",
            Self::Skipped { .. } => "skipped",
            Self::Disabled => "disabled",
            Self::Failed { .. } => "failed",
        }
    }

    /// Returns true if the assignment was attempted and failed.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_assignment_status_to_string() {
        assert_eq!(
            AssignmentStatus::Assigned {
                login: "octocat".to_string()
            }
            .as_str(),
            "assigned"
        );
        assert_eq!(
            AssignmentStatus::Skipped {
                reason: "no author".to_string()
            }
            .as_str(),
            "skipped"
        );
        assert_eq!(AssignmentStatus::Disabled.as_str(), "disabled");

        let failed = AssignmentStatus::Failed {
            login: "octocat".to_string(),
            error: "boom".to_string(),
        };
        assert_eq!(failed.as_str(), "failed");
        assert!(failed.is_failure());
    }
}
