//! Error types for quill.

use std::fmt;
use std::time::Duration;

use crate::collaborator::Role;
use crate::problem::ProblemClass;

/// Result type alias for quill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that terminate an edit request.
///
/// Recoverable conditions (duplicate variables, missing inputs, unmatched or
/// ambiguous search text) are reported as [`Problem`](crate::Problem) records
/// instead and only surface here once repair or arbitration gives up.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A collaborator call failed (transport, provider or unparseable output).
    #[error("{role} error: {message}")]
    Collaborator { role: Role, message: String },

    /// A collaborator call did not complete in time.
    #[error("{role} timed out after {}ms", after.as_millis())]
    Timeout { role: Role, after: Duration },

    /// Problems remained after every allowed repair attempt.
    #[error("{class} problems remain after {attempts} repair attempts")]
    RepairExhausted { class: ProblemClass, attempts: usize },

    /// The fixer returned no replacement plan.
    #[error("fixer declined to repair {class} problems on attempt {attempt}")]
    FixerDeclined { class: ProblemClass, attempt: usize },

    /// The arbiter reported that no candidate is correct.
    #[error("arbiter rejected every candidate for '{variable}'")]
    ArbiterRejected { variable: String },

    /// Document text could not be read.
    #[error("document error: {0}")]
    Document(String),

    /// Conversation history could not be written.
    #[error("history error: {0}")]
    History(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Creates a collaborator error.
    pub fn collaborator(role: Role, message: impl fmt::Display) -> Self {
        Self::Collaborator {
            role,
            message: message.to_string(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(role: Role, after: Duration) -> Self {
        Self::Timeout { role, after }
    }

    /// Creates a repair-exhausted error.
    pub fn repair_exhausted(class: ProblemClass, attempts: usize) -> Self {
        Self::RepairExhausted { class, attempts }
    }

    /// Creates a fixer-declined error.
    pub fn fixer_declined(class: ProblemClass, attempt: usize) -> Self {
        Self::FixerDeclined { class, attempt }
    }

    /// Creates an arbiter rejection.
    pub fn arbiter_rejected(variable: impl Into<String>) -> Self {
        Self::ArbiterRejected {
            variable: variable.into(),
        }
    }

    /// Creates a document error.
    pub fn document(message: impl fmt::Display) -> Self {
        Self::Document(message.to_string())
    }

    /// Creates a history error.
    pub fn history(message: impl fmt::Display) -> Self {
        Self::History(message.to_string())
    }

    /// Creates a configuration error.
    pub fn config(message: impl fmt::Display) -> Self {
        Self::Config(message.to_string())
    }

    /// Returns true if the error came from an external collaborator call.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Self::Collaborator { .. } | Self::Timeout { .. })
    }

    /// Returns the collaborator role involved, if any.
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Collaborator { role, .. } | Self::Timeout { role, .. } => Some(*role),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_counts_as_collaborator_failure() {
        let error = Error::timeout(Role::Arbiter, Duration::from_secs(2));

        assert!(error.is_collaborator_failure());
        assert_eq!(error.role(), Some(Role::Arbiter));
        assert_eq!(error.to_string(), "arbiter timed out after 2000ms");
    }

    #[test]
    fn repair_errors_are_not_collaborator_failures() {
        let error = Error::repair_exhausted(ProblemClass::Location, 3);

        assert!(!error.is_collaborator_failure());
        assert_eq!(
            error.to_string(),
            "location problems remain after 3 repair attempts"
        );
    }
}
