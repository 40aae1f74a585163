#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod agent;
mod config;
pub mod parse;
mod prompt;
mod provider;

pub use agent::{ArbiterAgent, FixerAgent, PlannerAgent};
pub use config::{CompletionConfig, CompletionConfigBuilder, ProviderKind};
pub use prompt::{PromptBuilder, plan_schema};
pub use provider::Agents;

/// Tracing target for the rig collaborators.
pub const TRACING_TARGET: &str = "quill_rig";
