#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod collaborator;
mod error;
pub mod history;
pub mod operation;
pub mod plan;
mod problem;
mod request;
mod timing;

pub use collaborator::{Arbiter, ConversationHistory, DocumentStore, Fixer, Planner, Role};
pub use error::{Error, Result};
pub use history::{HistoryKey, HistoryTurn};
pub use operation::{Operation, OperationArgs, OperationKind, OperationStatus};
pub use plan::{
    ActionPlan, EditAction, EditKind, FindAction, FormatAction, FormatKind, ListType,
};
pub use problem::{Problem, ProblemClass, ProblemKind};
pub use request::{ArbitrationRequest, Candidate, PlanRequest, RepairRequest};
pub use timing::Timing;
