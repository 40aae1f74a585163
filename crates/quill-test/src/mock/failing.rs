//! Collaborators that never succeed.

use std::future;

use quill_core::{
    ActionPlan, Arbiter, ArbitrationRequest, Error, Fixer, PlanRequest, Planner, RepairRequest,
    Result, Role,
};

/// Fails every call with a collaborator error.
#[derive(Debug, Clone)]
pub struct FailingCollaborator {
    message: String,
}

impl FailingCollaborator {
    /// Creates a collaborator failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait::async_trait]
impl Planner for FailingCollaborator {
    async fn plan(&self, _request: &PlanRequest) -> Result<ActionPlan> {
        Err(Error::collaborator(Role::Planner, &self.message))
    }
}

#[async_trait::async_trait]
impl Fixer for FailingCollaborator {
    async fn fix(&self, _request: &RepairRequest) -> Result<Option<ActionPlan>> {
        Err(Error::collaborator(Role::Fixer, &self.message))
    }
}

#[async_trait::async_trait]
impl Arbiter for FailingCollaborator {
    async fn choose(&self, _request: &ArbitrationRequest) -> Result<i64> {
        Err(Error::collaborator(Role::Arbiter, &self.message))
    }
}

/// Never answers; used to exercise call timeouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct StalledCollaborator;

#[async_trait::async_trait]
impl Planner for StalledCollaborator {
    async fn plan(&self, _request: &PlanRequest) -> Result<ActionPlan> {
        future::pending().await
    }
}

#[async_trait::async_trait]
impl Fixer for StalledCollaborator {
    async fn fix(&self, _request: &RepairRequest) -> Result<Option<ActionPlan>> {
        future::pending().await
    }
}

#[async_trait::async_trait]
impl Arbiter for StalledCollaborator {
    async fn choose(&self, _request: &ArbitrationRequest) -> Result<i64> {
        future::pending().await
    }
}
