//! Planner agent.

use quill_core::{ActionPlan, Error, PlanRequest, Planner, Result, Role};
use rig::agent::Agent;
use rig::completion::{CompletionModel, Prompt};

use crate::TRACING_TARGET;
use crate::parse::parse_plan;
use crate::prompt::PromptBuilder;

const NAME: &str = "PlannerAgent";
const DESCRIPTION: &str = "Agent that turns an edit instruction into an action plan";

const PREAMBLE: &str = "\
You plan edits to a plain-text document.
Locate every place you need with a find action that binds a variable to an exact quote from the document.
Quote enough surrounding words that the quote occurs exactly once.
Edit and format actions refer to those variables; never invent offsets.
Reply with a single JSON object matching the plan schema and nothing else.";

const INSTRUCTION: &str = "\
Produce the action plan that carries out the edit instruction on the document above.";

/// Proposes the initial plan for an edit instruction.
pub struct PlannerAgent<M: CompletionModel> {
    agent: Agent<M>,
}

impl<M: CompletionModel> PlannerAgent<M> {
    /// Creates a planner agent for the given model.
    pub fn new(model: M, temperature: Option<f64>) -> Self {
        let agent = super::build_agent(model, NAME, DESCRIPTION, PREAMBLE, temperature);
        Self { agent }
    }

    fn build_prompt(request: &PlanRequest) -> String {
        PromptBuilder::new(INSTRUCTION)
            .with_message(&request.message)
            .with_document(&request.document_text)
            .with_schema()
            .build()
    }
}

#[async_trait::async_trait]
impl<M: CompletionModel + 'static> Planner for PlannerAgent<M> {
    #[tracing::instrument(target = TRACING_TARGET, skip_all, fields(agent = NAME))]
    async fn plan(&self, request: &PlanRequest) -> Result<ActionPlan> {
        let prompt = Self::build_prompt(request);
        let reply = self
            .agent
            .prompt(prompt.as_str())
            .await
            .map_err(|e| Error::collaborator(Role::Planner, e))?;

        tracing::debug!(
            target: TRACING_TARGET,
            reply_len = reply.len(),
            "planner replied",
        );

        parse_plan(Role::Planner, &reply)
    }
}
