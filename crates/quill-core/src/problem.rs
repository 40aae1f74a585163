//! Diagnostics produced while checking a plan.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};

/// What went wrong with a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// Two find actions bind the same variable.
    DuplicateVariable,
    /// An edit or format action consumes a variable nothing binds.
    MissingInput,
    /// A find action binds a variable nothing consumes (warning only).
    UnusedOutput,
    /// A find action has nothing to search for.
    EmptySearchText,
    /// Neither exact nor fuzzy search found the text.
    NoMatch,
    /// The text was found at more than one offset.
    Ambiguous,
}

impl ProblemKind {
    /// Returns the class of repair loop that handles this kind, if any.
    pub fn class(&self) -> Option<ProblemClass> {
        match self {
            Self::DuplicateVariable | Self::MissingInput => Some(ProblemClass::Dataflow),
            Self::EmptySearchText | Self::NoMatch => Some(ProblemClass::Location),
            Self::UnusedOutput | Self::Ambiguous => None,
        }
    }
}

/// Independent problem classes, each with its own repair loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProblemClass {
    /// Producer/consumer variable graph problems.
    Dataflow,
    /// Search text that could not be located.
    Location,
}

/// A single diagnostic: kind, the variable or action it concerns, and detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    /// What went wrong.
    pub kind: ProblemKind,

    /// Variable name or action index the problem concerns.
    pub subject: String,

    /// Human-readable detail, also shown to the fixer.
    pub detail: String,
}

impl Problem {
    /// Creates a new problem record.
    pub fn new(kind: ProblemKind, subject: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}': {}", self.kind, self.subject, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn problem_display() {
        let problem = Problem::new(ProblemKind::MissingInput, "pos", "no find action binds it");
        assert_eq!(
            problem.to_string(),
            "missing_input 'pos': no find action binds it"
        );
    }

    #[test]
    fn ambiguity_is_not_repaired() {
        assert_eq!(ProblemKind::Ambiguous.class(), None);
        assert_eq!(ProblemKind::NoMatch.class(), Some(ProblemClass::Location));
        assert_eq!(
            ProblemKind::DuplicateVariable.class(),
            Some(ProblemClass::Dataflow)
        );
    }
}
