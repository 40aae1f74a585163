//! Producer/consumer checks on a plan's variable graph.

use std::collections::BTreeSet;

use quill_core::{ActionPlan, Problem, ProblemKind};
use serde::Serialize;

/// Tracing target for validation.
pub const TRACING_TARGET: &str = "quill_pipeline::validate";

/// Outcome of validating a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validation {
    /// Problems that prevent compilation.
    pub problems: Vec<Problem>,

    /// Non-fatal findings.
    pub warnings: Vec<Problem>,
}

impl Validation {
    /// Returns true if nothing blocks compilation.
    pub fn is_clean(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Checks that every consumed variable is produced exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanValidator;

impl PlanValidator {
    /// Validates the plan's dataflow without side effects.
    pub fn validate(&self, plan: &ActionPlan) -> Validation {
        let mut validation = Validation::default();
        let mut outputs = BTreeSet::new();

        for find in &plan.find_actions {
            if !outputs.insert(find.variable_name.as_str()) {
                validation.problems.push(Problem::new(
                    ProblemKind::DuplicateVariable,
                    &find.variable_name,
                    "bound by more than one find action",
                ));
            }
        }

        let inputs = plan.input_variables();

        for missing in inputs.difference(&outputs) {
            validation.problems.push(Problem::new(
                ProblemKind::MissingInput,
                *missing,
                "used by an edit or format action but never bound by a find action",
            ));
        }

        for unused in outputs.difference(&inputs) {
            validation.warnings.push(Problem::new(
                ProblemKind::UnusedOutput,
                *unused,
                "bound by a find action but never used",
            ));
        }

        tracing::debug!(
            target: TRACING_TARGET,
            problems = validation.problems.len(),
            warnings = validation.warnings.len(),
            "plan validated"
        );

        validation
    }
}
