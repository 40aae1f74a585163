//! Scripted fixer.

use std::collections::VecDeque;
use std::sync::Mutex;

use quill_core::{ActionPlan, Fixer, RepairRequest, Result};

use super::lock;

/// Fixer that replies from a queue.
///
/// Once the queue is empty it either repeats a fixed reply or declines.
#[derive(Debug)]
pub struct ScriptedFixer {
    replies: Mutex<VecDeque<Option<ActionPlan>>>,
    fallback: Option<ActionPlan>,
    requests: Mutex<Vec<RepairRequest>>,
}

impl ScriptedFixer {
    /// Creates a fixer that plays `replies` in order, then declines.
    pub fn new(replies: impl IntoIterator<Item = Option<ActionPlan>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Creates a fixer that returns `plan` on every call.
    pub fn repeating(plan: ActionPlan) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Some(plan),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<RepairRequest> {
        lock(&self.requests).clone()
    }

    /// Returns the number of calls received so far.
    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait::async_trait]
impl Fixer for ScriptedFixer {
    async fn fix(&self, request: &RepairRequest) -> Result<Option<ActionPlan>> {
        lock(&self.requests).push(request.clone());

        let scripted = lock(&self.replies).pop_front();
        Ok(scripted.unwrap_or_else(|| self.fallback.clone()))
    }
}

#[cfg(test)]
mod tests {
    use quill_core::ProblemClass;

    use super::*;

    fn request() -> RepairRequest {
        RepairRequest {
            message: "m".to_string(),
            document_text: "d".to_string(),
            plan: ActionPlan::new(),
            class: ProblemClass::Location,
            problems: Vec::new(),
            attempt: 1,
        }
    }

    #[tokio::test]
    async fn plays_script_then_declines() {
        let fixer = ScriptedFixer::new([Some(ActionPlan::new())]);

        assert_eq!(fixer.fix(&request()).await.unwrap(), Some(ActionPlan::new()));
        assert_eq!(fixer.fix(&request()).await.unwrap(), None);
        assert_eq!(fixer.calls(), 2);
    }

    #[tokio::test]
    async fn repeating_never_runs_dry() {
        let fixer = ScriptedFixer::repeating(ActionPlan::new());

        for _ in 0..5 {
            assert!(fixer.fix(&request()).await.unwrap().is_some());
        }
    }
}
