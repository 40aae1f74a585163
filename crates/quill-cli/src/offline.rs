//! Stand-in collaborators for runs without a completion provider.

use std::sync::Arc;

use quill_core::{
    ActionPlan, Arbiter, ArbitrationRequest, Error, Fixer, PlanRequest, Planner, RepairRequest,
    Result, Role,
};
use quill_rig::Agents;

const MESSAGE: &str = "no completion provider configured (set --api-key or QUILL_API_KEY)";

/// Fails every call; used when a plan is supplied and no API key is set.
#[derive(Debug, Clone, Copy)]
pub struct Offline;

impl Offline {
    /// Returns an agent set backed entirely by [`Offline`].
    pub fn agents() -> Agents {
        let offline = Arc::new(Self);
        Agents {
            planner: offline.clone(),
            fixer: offline.clone(),
            arbiter: offline,
        }
    }
}

#[async_trait::async_trait]
impl Planner for Offline {
    async fn plan(&self, _request: &PlanRequest) -> Result<ActionPlan> {
        Err(Error::collaborator(Role::Planner, MESSAGE))
    }
}

#[async_trait::async_trait]
impl Fixer for Offline {
    async fn fix(&self, _request: &RepairRequest) -> Result<Option<ActionPlan>> {
        Err(Error::collaborator(Role::Fixer, MESSAGE))
    }
}

#[async_trait::async_trait]
impl Arbiter for Offline {
    async fn choose(&self, _request: &ArbitrationRequest) -> Result<i64> {
        Err(Error::collaborator(Role::Arbiter, MESSAGE))
    }
}
