//! Resolution of find actions against document text.
//!
//! Every find action ends up in exactly one of three buckets:
//!
//! - **unique**: one candidate offset, bound straight into the [`PositionMap`]
//! - **mistake**: no candidate after exact and fuzzy search, or nothing to search for
//! - **ambiguous**: two or more candidates, kept verbatim for arbitration
//!
//! The locator never picks between candidates.

mod exact;
mod fuzzy;

pub use exact::exact_offsets;
pub use fuzzy::{FuzzyMatch, best_partial_match, similarity};
use quill_core::{FindAction, Problem, ProblemKind};
use serde::Serialize;

use crate::position::PositionMap;
use crate::snapshot::Snapshot;

/// Tracing target for text location.
pub const TRACING_TARGET: &str = "quill_pipeline::locate";

/// A find action whose text matched at more than one offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    /// The ambiguous variable.
    pub variable: String,

    /// The text that was searched for.
    pub search_text: String,

    /// Length in characters of the matched text.
    pub match_len: usize,

    /// Every candidate offset, ascending.
    pub candidates: Vec<usize>,
}

impl Ambiguity {
    /// Describes the ambiguity as a problem record.
    pub fn to_problem(&self) -> Problem {
        Problem::new(
            ProblemKind::Ambiguous,
            &self.variable,
            format!(
                "'{}' matched at offsets {:?}",
                self.search_text, self.candidates
            ),
        )
    }
}

/// Outcome of locating a single find action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// Exactly one candidate.
    Unique(usize),
    /// No candidate; carries the reason.
    Mistake(Problem),
    /// More than one candidate.
    Ambiguous(Ambiguity),
}

/// Outcome of locating every find action of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocateReport {
    /// Variables with exactly one candidate.
    pub positions: PositionMap,

    /// Find actions that need repair.
    pub mistakes: Vec<Problem>,

    /// Find actions that need arbitration.
    pub ambiguities: Vec<Ambiguity>,
}

impl LocateReport {
    /// Returns true if no find action needs repair.
    pub fn is_clean(&self) -> bool {
        self.mistakes.is_empty()
    }

    /// Returns the ambiguities as problem records.
    pub fn ambiguity_problems(&self) -> Vec<Problem> {
        self.ambiguities.iter().map(Ambiguity::to_problem).collect()
    }
}

/// Exact-then-fuzzy text locator.
#[derive(Debug, Clone, Copy)]
pub struct TextLocator {
    threshold: u8,
}

impl TextLocator {
    /// Creates a locator accepting fuzzy scores at or above `threshold`.
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    /// Returns the fuzzy acceptance threshold.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Locates every find action of a plan.
    pub fn locate(&self, snapshot: &Snapshot, finds: &[FindAction]) -> LocateReport {
        let mut report = LocateReport::default();

        for find in finds {
            match self.locate_one(snapshot, find) {
                Located::Unique(offset) => report.positions.bind(&find.variable_name, offset),
                Located::Mistake(problem) => report.mistakes.push(problem),
                Located::Ambiguous(ambiguity) => report.ambiguities.push(ambiguity),
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            resolved = report.positions.len(),
            mistakes = report.mistakes.len(),
            ambiguities = report.ambiguities.len(),
            "find actions located"
        );

        report
    }

    /// Locates a single find action.
    pub fn locate_one(&self, snapshot: &Snapshot, find: &FindAction) -> Located {
        let variable = &find.variable_name;
        let needle = find.search_text.as_str();

        if needle.is_empty() {
            return Located::Mistake(Problem::new(
                ProblemKind::EmptySearchText,
                variable,
                "search text is empty",
            ));
        }

        let mut matched = needle.to_string();
        let mut candidates = exact_offsets(snapshot, needle);

        if candidates.is_empty() {
            match best_partial_match(snapshot, needle, self.threshold) {
                Some(found) => {
                    tracing::debug!(
                        target: TRACING_TARGET,
                        variable = %variable,
                        score = found.score,
                        matched = %found.text,
                        "fuzzy match accepted"
                    );
                    candidates = exact_offsets(snapshot, &found.text);
                    matched = found.text;
                }
                None => {
                    return Located::Mistake(Problem::new(
                        ProblemKind::NoMatch,
                        variable,
                        format!(
                            "'{needle}' not found exactly or with similarity >= {}",
                            self.threshold
                        ),
                    ));
                }
            }
        }

        match candidates.as_slice() {
            [] => Located::Mistake(Problem::new(
                ProblemKind::NoMatch,
                variable,
                format!("'{needle}' not found"),
            )),
            [offset] => Located::Unique(*offset),
            _ => Located::Ambiguous(Ambiguity {
                variable: variable.clone(),
                search_text: needle.to_string(),
                match_len: matched.chars().count(),
                candidates,
            }),
        }
    }
}
