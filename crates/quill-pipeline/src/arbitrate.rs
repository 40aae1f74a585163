//! Collapsing multi-candidate matches into single offsets.

use std::sync::Arc;
use std::time::Duration;

use quill_core::{ActionPlan, Arbiter, ArbitrationRequest, Candidate, Error, Result, Role};

use crate::call::call;
use crate::locate::Ambiguity;
use crate::position::PositionMap;
use crate::snapshot::Snapshot;

/// Tracing target for arbitration.
pub const TRACING_TARGET: &str = "quill_pipeline::arbitrate";

/// Answer an arbiter gives when no candidate is correct.
pub const NO_CANDIDATE: i64 = -1;

/// Asks an arbiter to pick one candidate per ambiguous variable.
///
/// Variables are arbitrated one at a time, in plan order. Any rejection or
/// failure aborts the whole plan.
pub struct AmbiguityArbiter {
    arbiter: Arc<dyn Arbiter>,
    timeout: Duration,
    context_radius: usize,
}

impl AmbiguityArbiter {
    /// Creates an arbiter wrapper.
    pub fn new(arbiter: Arc<dyn Arbiter>, timeout: Duration, context_radius: usize) -> Self {
        Self {
            arbiter,
            timeout,
            context_radius,
        }
    }

    /// Resolves every ambiguity, returning the chosen offsets.
    pub async fn resolve(
        &self,
        message: &str,
        plan: &ActionPlan,
        snapshot: &Snapshot,
        ambiguities: &[Ambiguity],
    ) -> Result<PositionMap> {
        let problems: Vec<_> = ambiguities.iter().map(Ambiguity::to_problem).collect();
        let mut chosen = PositionMap::new();

        for ambiguity in ambiguities {
            let request = ArbitrationRequest {
                message: message.to_string(),
                plan: plan.clone(),
                variable: ambiguity.variable.clone(),
                search_text: ambiguity.search_text.clone(),
                candidates: self.candidates(snapshot, ambiguity),
                problems: problems.clone(),
            };

            let answer = call(Role::Arbiter, self.timeout, self.arbiter.choose(&request)).await?;
            let offset = Self::interpret(&request, answer)?;

            tracing::debug!(
                target: TRACING_TARGET,
                variable = %ambiguity.variable,
                answer,
                offset,
                "candidate chosen"
            );
            chosen.bind(&ambiguity.variable, offset);
        }

        Ok(chosen)
    }

    fn candidates(&self, snapshot: &Snapshot, ambiguity: &Ambiguity) -> Vec<Candidate> {
        ambiguity
            .candidates
            .iter()
            .enumerate()
            .map(|(index, &offset)| Candidate {
                index,
                offset,
                context: snapshot.context(offset, ambiguity.match_len, self.context_radius),
            })
            .collect()
    }

    fn interpret(request: &ArbitrationRequest, answer: i64) -> Result<usize> {
        if answer == NO_CANDIDATE {
            tracing::warn!(
                target: TRACING_TARGET,
                variable = %request.variable,
                "arbiter rejected every candidate"
            );
            return Err(Error::arbiter_rejected(&request.variable));
        }

        usize::try_from(answer)
            .ok()
            .and_then(|index| request.offset_for(index))
            .ok_or_else(|| {
                Error::collaborator(
                    Role::Arbiter,
                    format!(
                        "answer {answer} for '{}' is outside -1..{}",
                        request.variable,
                        request.candidates.len()
                    ),
                )
            })
    }
}

impl std::fmt::Debug for AmbiguityArbiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmbiguityArbiter")
            .field("timeout", &self.timeout)
            .field("context_radius", &self.context_radius)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use quill_core::FindAction;
    use quill_test::{FailingCollaborator, ScriptedArbiter};

    use super::*;
    use crate::locate::{Located, TextLocator};

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn cat_ambiguity(snapshot: &Snapshot) -> Ambiguity {
        match TextLocator::new(90).locate_one(snapshot, &FindAction::new("cat", "cat")) {
            Located::Ambiguous(ambiguity) => ambiguity,
            other => panic!("expected an ambiguity, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn chosen_index_selects_candidate_offset() {
        let snapshot = Snapshot::new("cat cat cat");
        let arbiter = Arc::new(ScriptedArbiter::new([1]));
        let resolver = AmbiguityArbiter::new(arbiter.clone(), TIMEOUT, 2);

        let chosen = resolver
            .resolve("msg", &ActionPlan::new(), &snapshot, &[cat_ambiguity(&snapshot)])
            .await
            .unwrap();

        assert_eq!(chosen.offset("cat"), Some(4));

        let requests = arbiter.requests();
        assert_eq!(requests.len(), 1);
        let offsets: Vec<_> = requests[0].candidates.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![0, 4, 8]);
        assert_eq!(requests[0].candidates[1].context, "…t [cat] c…");
    }

    #[tokio::test]
    async fn rejection_aborts_the_plan() {
        let snapshot = Snapshot::new("cat cat cat");
        let resolver = AmbiguityArbiter::new(Arc::new(ScriptedArbiter::new([-1])), TIMEOUT, 10);

        let error = resolver
            .resolve("msg", &ActionPlan::new(), &snapshot, &[cat_ambiguity(&snapshot)])
            .await
            .unwrap_err();

        assert!(matches!(error, Error::ArbiterRejected { ref variable } if variable == "cat"));
    }

    #[tokio::test]
    async fn out_of_range_answer_is_a_collaborator_error() {
        let snapshot = Snapshot::new("cat cat cat");
        let resolver = AmbiguityArbiter::new(Arc::new(ScriptedArbiter::new([3])), TIMEOUT, 10);

        let error = resolver
            .resolve("msg", &ActionPlan::new(), &snapshot, &[cat_ambiguity(&snapshot)])
            .await
            .unwrap_err();

        assert!(error.is_collaborator_failure());
    }

    #[tokio::test]
    async fn arbiter_failure_aborts_the_plan() {
        let snapshot = Snapshot::new("cat cat cat");
        let resolver =
            AmbiguityArbiter::new(Arc::new(FailingCollaborator::new("down")), TIMEOUT, 10);

        let error = resolver
            .resolve("msg", &ActionPlan::new(), &snapshot, &[cat_ambiguity(&snapshot)])
            .await
            .unwrap_err();

        assert_eq!(error.role(), Some(Role::Arbiter));
    }
}
