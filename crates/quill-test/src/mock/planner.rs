//! Scripted planner.

use std::sync::Mutex;

use quill_core::{ActionPlan, PlanRequest, Planner, Result};

use super::lock;

/// Planner that always proposes the same plan.
#[derive(Debug)]
pub struct ScriptedPlanner {
    plan: ActionPlan,
    requests: Mutex<Vec<PlanRequest>>,
}

impl ScriptedPlanner {
    /// Creates a planner proposing `plan` on every call.
    pub fn new(plan: ActionPlan) -> Self {
        Self {
            plan,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<PlanRequest> {
        lock(&self.requests).clone()
    }

    /// Returns the number of calls received so far.
    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait::async_trait]
impl Planner for ScriptedPlanner {
    async fn plan(&self, request: &PlanRequest) -> Result<ActionPlan> {
        lock(&self.requests).push(request.clone());
        Ok(self.plan.clone())
    }
}
