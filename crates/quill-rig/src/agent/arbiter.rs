//! Arbiter agent.

use quill_core::{Arbiter, ArbitrationRequest, Error, Result, Role};
use rig::agent::Agent;
use rig::completion::{CompletionModel, Prompt};

use crate::TRACING_TARGET;
use crate::parse::parse_choice;
use crate::prompt::PromptBuilder;

const NAME: &str = "ArbiterAgent";
const DESCRIPTION: &str = "Agent that picks which occurrence of a repeated text an edit targets";

const PREAMBLE: &str = "\
You disambiguate edits to a plain-text document.
A search text occurs more than once. Each candidate shows its surrounding text with the match in brackets.
Decide which occurrence the edit instruction refers to.
Reply with the candidate's index only, or -1 if none of them fits.";

const INSTRUCTION: &str = "\
Reply with the index of the candidate the edit instruction targets, or -1.";

/// Picks one candidate for an ambiguous variable.
pub struct ArbiterAgent<M: CompletionModel> {
    agent: Agent<M>,
}

impl<M: CompletionModel> ArbiterAgent<M> {
    /// Creates an arbiter agent for the given model.
    pub fn new(model: M, temperature: Option<f64>) -> Self {
        let agent = super::build_agent(model, NAME, DESCRIPTION, PREAMBLE, temperature);
        Self { agent }
    }

    fn build_prompt(request: &ArbitrationRequest) -> String {
        PromptBuilder::new(INSTRUCTION)
            .with_message(&request.message)
            .with_plan(&request.plan)
            .with_candidates(&request.variable, &request.search_text, &request.candidates)
            .build()
    }
}

#[async_trait::async_trait]
impl<M: CompletionModel + 'static> Arbiter for ArbiterAgent<M> {
    #[tracing::instrument(
        target = TRACING_TARGET,
        skip_all,
        fields(agent = NAME, variable = %request.variable, candidates = request.candidates.len()),
    )]
    async fn choose(&self, request: &ArbitrationRequest) -> Result<i64> {
        let prompt = Self::build_prompt(request);
        let reply = self
            .agent
            .prompt(prompt.as_str())
            .await
            .map_err(|e| Error::collaborator(Role::Arbiter, e))?;

        let choice = parse_choice(&reply)?;
        tracing::debug!(target: TRACING_TARGET, choice, "arbiter replied");
        Ok(choice)
    }
}
