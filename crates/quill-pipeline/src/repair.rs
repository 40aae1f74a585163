//! Bounded self-healing of plans that fail a check.
//!
//! Dataflow problems and location mistakes are repaired by separate loops,
//! each driven by its own [`RepairCheck`] and each allowed up to
//! `max_attempts` fixer calls. The fixer always returns a complete
//! replacement plan; the controller swaps it in whole and re-runs the check.

use std::sync::Arc;
use std::time::Duration;

use quill_core::{
    ActionPlan, Error, Fixer, Problem, ProblemClass, RepairRequest, Result, Role,
};
use serde::Serialize;
use strum::{AsRefStr, Display, IntoStaticStr};

use crate::call::call;
use crate::locate::{LocateReport, TextLocator};
use crate::sanitize::sanitize_plan;
use crate::snapshot::Snapshot;
use crate::validate::{PlanValidator, Validation};

/// Tracing target for repair loops.
pub const TRACING_TARGET: &str = "quill_pipeline::repair";

/// State of a repair loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[derive(Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum RepairState {
    /// Checking the current plan.
    Validating,
    /// Waiting on the fixer.
    Repairing { attempt: usize },
    /// The current plan passes the check.
    Resolved,
    /// The fixer declined, failed or ran out of attempts.
    Failed,
}

/// A check whose problems a fixer can repair.
pub trait RepairCheck {
    /// Full outcome of the check, handed back to the caller on success.
    type Report;

    /// Problem class this check reports.
    fn class(&self) -> ProblemClass;

    /// Normalizes a replacement plan before it is checked.
    fn prepare(&self, _plan: &mut ActionPlan) {}

    /// Runs the check.
    fn check(&self, plan: &ActionPlan) -> Self::Report;

    /// Returns the problems in a report that need repair.
    fn problems<'a>(&self, report: &'a Self::Report) -> &'a [Problem];
}

/// Producer/consumer variable checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataflowCheck;

impl RepairCheck for DataflowCheck {
    type Report = Validation;

    fn class(&self) -> ProblemClass {
        ProblemClass::Dataflow
    }

    fn check(&self, plan: &ActionPlan) -> Validation {
        PlanValidator.validate(plan)
    }

    fn problems<'a>(&self, report: &'a Validation) -> &'a [Problem] {
        &report.problems
    }
}

/// Search-text location checks against a snapshot.
#[derive(Debug, Clone, Copy)]
pub struct LocationCheck<'a> {
    locator: TextLocator,
    snapshot: &'a Snapshot,
}

impl<'a> LocationCheck<'a> {
    /// Creates a location check.
    pub fn new(locator: TextLocator, snapshot: &'a Snapshot) -> Self {
        Self { locator, snapshot }
    }
}

/// Outcome of a location check.
///
/// A replacement plan must keep its dataflow intact as well as locate, so
/// the dataflow problems of the plan are reported alongside its mistakes.
#[derive(Debug, Clone, Default)]
pub struct LocationReport {
    /// Where each find action landed.
    pub located: LocateReport,

    /// Dataflow check of the same plan.
    pub dataflow: Validation,

    /// Dataflow problems followed by location mistakes.
    pub problems: Vec<Problem>,
}

impl RepairCheck for LocationCheck<'_> {
    type Report = LocationReport;

    fn class(&self) -> ProblemClass {
        ProblemClass::Location
    }

    fn prepare(&self, plan: &mut ActionPlan) {
        sanitize_plan(plan, self.snapshot);
    }

    fn check(&self, plan: &ActionPlan) -> LocationReport {
        let dataflow = PlanValidator.validate(plan);
        let located = self.locator.locate(self.snapshot, &plan.find_actions);

        let problems = dataflow
            .problems
            .iter()
            .chain(&located.mistakes)
            .cloned()
            .collect();

        LocationReport {
            located,
            dataflow,
            problems,
        }
    }

    fn problems<'a>(&self, report: &'a LocationReport) -> &'a [Problem] {
        &report.problems
    }
}

/// A plan that passes a check, with the check's report.
#[derive(Debug, Clone)]
pub struct Repaired<R> {
    /// The passing plan, either the input or the fixer's last replacement.
    pub plan: ActionPlan,

    /// Report of the final, clean check.
    pub report: R,

    /// Fixer calls made.
    pub attempts: usize,
}

/// Drives a fixer until a check passes or attempts run out.
pub struct RepairController {
    fixer: Arc<dyn Fixer>,
    max_attempts: usize,
    timeout: Duration,
    state: RepairState,
}

impl RepairController {
    /// Creates a controller allowing `max_attempts` fixer calls per loop.
    pub fn new(fixer: Arc<dyn Fixer>, max_attempts: usize, timeout: Duration) -> Self {
        Self {
            fixer,
            max_attempts,
            timeout,
            state: RepairState::Validating,
        }
    }

    /// Returns the state the last loop ended in.
    pub fn state(&self) -> RepairState {
        self.state
    }

    /// Checks `plan` and repairs it until the check passes.
    ///
    /// On error the state is [`RepairState::Failed`] and the plan passed in
    /// (or the last replacement) is discarded.
    pub async fn repair<C: RepairCheck>(
        &mut self,
        check: &C,
        message: &str,
        document_text: &str,
        mut plan: ActionPlan,
    ) -> Result<Repaired<C::Report>> {
        let class = check.class();

        self.state = RepairState::Validating;
        let mut report = check.check(&plan);

        for attempt in 1..=self.max_attempts {
            let problems = check.problems(&report);
            if problems.is_empty() {
                self.state = RepairState::Resolved;
                return Ok(Repaired {
                    plan,
                    report,
                    attempts: attempt - 1,
                });
            }

            self.state = RepairState::Repairing { attempt };
            tracing::info!(
                target: TRACING_TARGET,
                %class,
                attempt,
                problems = problems.len(),
                "requesting replacement plan"
            );

            let request = RepairRequest {
                message: message.to_string(),
                document_text: document_text.to_string(),
                plan: plan.clone(),
                class,
                problems: problems.to_vec(),
                attempt,
            };

            let reply = call(Role::Fixer, self.timeout, self.fixer.fix(&request)).await;
            let mut replacement = match reply {
                Ok(Some(replacement)) => replacement,
                Ok(None) => {
                    self.state = RepairState::Failed;
                    tracing::warn!(target: TRACING_TARGET, %class, attempt, "fixer declined");
                    return Err(Error::fixer_declined(class, attempt));
                }
                Err(error) => {
                    self.state = RepairState::Failed;
                    return Err(error);
                }
            };

            check.prepare(&mut replacement);
            plan = replacement;

            self.state = RepairState::Validating;
            report = check.check(&plan);
        }

        if check.problems(&report).is_empty() {
            self.state = RepairState::Resolved;
            return Ok(Repaired {
                plan,
                report,
                attempts: self.max_attempts,
            });
        }

        self.state = RepairState::Failed;
        tracing::warn!(
            target: TRACING_TARGET,
            %class,
            attempts = self.max_attempts,
            remaining = check.problems(&report).len(),
            "repair attempts exhausted"
        );
        Err(Error::repair_exhausted(class, self.max_attempts))
    }
}

impl std::fmt::Debug for RepairController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepairController")
            .field("max_attempts", &self.max_attempts)
            .field("timeout", &self.timeout)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use quill_core::{EditAction, FindAction};
    use quill_test::{FailingCollaborator, ScriptedFixer};

    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn broken_plan() -> ActionPlan {
        ActionPlan::new()
            .with_find(FindAction::new("a", "fox"))
            .with_edit(EditAction::insert("b", " jumps"))
    }

    fn fixed_plan() -> ActionPlan {
        ActionPlan::new()
            .with_find(FindAction::new("b", "fox"))
            .with_edit(EditAction::insert("b", " jumps"))
    }

    #[tokio::test]
    async fn clean_plan_needs_no_fixer_call() {
        let fixer = Arc::new(ScriptedFixer::new([]));
        let mut controller = RepairController::new(fixer.clone(), 3, TIMEOUT);

        let repaired = controller
            .repair(&DataflowCheck, "msg", "The quick brown fox", fixed_plan())
            .await
            .unwrap();

        assert_eq!(repaired.attempts, 0);
        assert_eq!(fixer.calls(), 0);
        assert_eq!(controller.state(), RepairState::Resolved);
    }

    #[tokio::test]
    async fn replacement_plan_resolves_dataflow() {
        let fixer = Arc::new(ScriptedFixer::new([Some(fixed_plan())]));
        let mut controller = RepairController::new(fixer.clone(), 3, TIMEOUT);

        let repaired = controller
            .repair(&DataflowCheck, "msg", "The quick brown fox", broken_plan())
            .await
            .unwrap();

        assert_eq!(repaired.plan, fixed_plan());
        assert_eq!(repaired.attempts, 1);
        assert!(repaired.report.is_clean());

        let requests = fixer.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].class, ProblemClass::Dataflow);
        assert_eq!(requests[0].plan, broken_plan());
        assert_eq!(requests[0].attempt, 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let fixer = Arc::new(ScriptedFixer::repeating(broken_plan()));
        let mut controller = RepairController::new(fixer.clone(), 3, TIMEOUT);

        let error = controller
            .repair(&DataflowCheck, "msg", "doc", broken_plan())
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            Error::RepairExhausted {
                class: ProblemClass::Dataflow,
                attempts: 3
            }
        ));
        assert_eq!(fixer.calls(), 3);
        assert_eq!(controller.state(), RepairState::Failed);
    }

    #[tokio::test]
    async fn declined_repair_fails_immediately() {
        let fixer = Arc::new(ScriptedFixer::new([None]));
        let mut controller = RepairController::new(fixer.clone(), 3, TIMEOUT);

        let error = controller
            .repair(&DataflowCheck, "msg", "doc", broken_plan())
            .await
            .unwrap_err();

        assert!(matches!(error, Error::FixerDeclined { attempt: 1, .. }));
        assert_eq!(fixer.calls(), 1);
        assert_eq!(controller.state(), RepairState::Failed);
    }

    #[tokio::test]
    async fn fixer_failure_is_terminal() {
        let mut controller =
            RepairController::new(Arc::new(FailingCollaborator::new("boom")), 3, TIMEOUT);

        let error = controller
            .repair(&DataflowCheck, "msg", "doc", broken_plan())
            .await
            .unwrap_err();

        assert!(error.is_collaborator_failure());
        assert_eq!(controller.state(), RepairState::Failed);
    }

    #[tokio::test]
    async fn location_loop_sanitizes_replacements() {
        let snapshot = Snapshot::new("The quick brown fox");
        let check = LocationCheck::new(TextLocator::new(90), &snapshot);

        let missing = ActionPlan::new()
            .with_find(FindAction::new("p", "dog"))
            .with_edit(EditAction::insert("p", "!"));
        let marked_up = ActionPlan::new()
            .with_find(FindAction::new("p", "**fox**"))
            .with_edit(EditAction::insert("p", "!"));

        let fixer = Arc::new(ScriptedFixer::new([Some(marked_up)]));
        let mut controller = RepairController::new(fixer, 3, TIMEOUT);

        let repaired = controller
            .repair(&check, "msg", snapshot.text(), missing)
            .await
            .unwrap();

        assert_eq!(repaired.plan.find_actions[0].search_text, "fox");
        assert_eq!(repaired.report.located.positions.offset("p"), Some(16));
    }

    #[tokio::test]
    async fn location_loop_rejects_replacements_with_broken_dataflow() {
        let snapshot = Snapshot::new("The quick brown fox");
        let check = LocationCheck::new(TextLocator::new(90), &snapshot);

        let missing = ActionPlan::new()
            .with_find(FindAction::new("p", "dog"))
            .with_edit(EditAction::insert("p", "!"));
        let duplicated = ActionPlan::new()
            .with_find(FindAction::new("p", "quick"))
            .with_find(FindAction::new("p", "fox"))
            .with_edit(EditAction::insert("p", "!"));
        let fixed = ActionPlan::new()
            .with_find(FindAction::new("p", "fox"))
            .with_edit(EditAction::insert("p", "!"));

        let fixer = Arc::new(ScriptedFixer::new([Some(duplicated), Some(fixed.clone())]));
        let mut controller = RepairController::new(fixer.clone(), 3, TIMEOUT);

        let repaired = controller
            .repair(&check, "msg", snapshot.text(), missing)
            .await
            .unwrap();

        assert_eq!(repaired.plan, fixed);
        assert_eq!(repaired.attempts, 2);
        assert!(repaired.report.dataflow.is_clean());

        let requests = fixer.requests();
        assert_eq!(requests[1].problems[0].kind, quill_core::ProblemKind::DuplicateVariable);
        assert_eq!(requests[1].problems[0].subject, "p");
    }
}
