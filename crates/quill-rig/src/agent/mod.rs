//! Rig agents implementing the collaborator contracts.
//!
//! Each agent owns a rig [`Agent`] with a role-specific preamble and turns a
//! pipeline request into a single prompt. Replies are parsed by
//! [`crate::parse`].

mod arbiter;
mod fixer;
mod planner;

pub use arbiter::ArbiterAgent;
pub use fixer::FixerAgent;
pub use planner::PlannerAgent;

use rig::agent::{Agent, AgentBuilder};
use rig::completion::CompletionModel;

/// Builds an agent with the shared settings.
fn build_agent<M: CompletionModel>(
    model: M,
    name: &str,
    description: &str,
    preamble: &str,
    temperature: Option<f64>,
) -> Agent<M> {
    let builder = AgentBuilder::new(model)
        .name(name)
        .description(description)
        .preamble(preamble);

    match temperature {
        Some(temperature) => builder.temperature(temperature).build(),
        None => builder.build(),
    }
}
