//! Contracts for the external collaborators the pipeline is wired with.
//!
//! Every collaborator is an explicitly constructed instance handed to the
//! pipeline; nothing here is global.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, IntoStaticStr};
use uuid::Uuid;

use crate::Result;
use crate::history::{HistoryKey, HistoryTurn};
use crate::plan::ActionPlan;
use crate::request::{ArbitrationRequest, PlanRequest, RepairRequest};

/// Role of a text-generation collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Planner,
    Fixer,
    Arbiter,
}

/// Proposes an initial plan for an edit instruction.
#[async_trait::async_trait]
pub trait Planner: Send + Sync {
    /// Returns a plan, or an error if the model call failed.
    async fn plan(&self, request: &PlanRequest) -> Result<ActionPlan>;
}

/// Produces a complete replacement for a plan that failed a check.
#[async_trait::async_trait]
pub trait Fixer: Send + Sync {
    /// Returns a replacement plan, or `None` if the fixer gives up.
    async fn fix(&self, request: &RepairRequest) -> Result<Option<ActionPlan>>;
}

/// Picks one candidate for an ambiguous find action.
#[async_trait::async_trait]
pub trait Arbiter: Send + Sync {
    /// Returns a candidate index, or `-1` if no candidate is correct.
    async fn choose(&self, request: &ArbitrationRequest) -> Result<i64>;
}

/// Read-only access to document plain text.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the current plain-text rendering of a document.
    async fn plain_text(&self, document_id: Uuid) -> Result<String>;
}

/// Append-only per (user, document) turn log.
#[async_trait::async_trait]
pub trait ConversationHistory: Send + Sync {
    /// Appends a turn to the log for `key`.
    async fn append(&self, key: HistoryKey, turn: HistoryTurn) -> Result<()>;
}
