//! Requests sent to text-generation collaborators.

use serde::{Deserialize, Serialize};

use crate::plan::ActionPlan;
use crate::problem::{Problem, ProblemClass};

/// Request for an initial plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// The user's natural-language edit instruction.
    pub message: String,

    /// Plain text of the document.
    pub document_text: String,
}

impl PlanRequest {
    /// Creates a plan request.
    pub fn new(message: impl Into<String>, document_text: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            document_text: document_text.into(),
        }
    }
}

/// Request for a complete replacement plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairRequest {
    /// The user's natural-language edit instruction.
    pub message: String,

    /// Plain text of the document.
    pub document_text: String,

    /// The plan that failed its check.
    pub plan: ActionPlan,

    /// Which check failed.
    pub class: ProblemClass,

    /// Every problem the check reported.
    pub problems: Vec<Problem>,

    /// One-based attempt number within this problem class.
    pub attempt: usize,
}

/// One location a search text matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Zero-based index the arbiter answers with.
    pub index: usize,

    /// Character offset into the document snapshot.
    pub offset: usize,

    /// Surrounding text with the match bracketed.
    pub context: String,
}

/// Request to pick one candidate for an ambiguous variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrationRequest {
    /// The user's natural-language edit instruction.
    pub message: String,

    /// The plan being resolved.
    pub plan: ActionPlan,

    /// The ambiguous variable.
    pub variable: String,

    /// The text that matched more than once.
    pub search_text: String,

    /// Candidates enumerated by index.
    pub candidates: Vec<Candidate>,

    /// Every outstanding ambiguity, for context.
    pub problems: Vec<Problem>,
}

impl ArbitrationRequest {
    /// Returns the offset for an arbiter answer, or `None` if out of range.
    pub fn offset_for(&self, index: usize) -> Option<usize> {
        self.candidates.get(index).map(|c| c.offset)
    }
}
