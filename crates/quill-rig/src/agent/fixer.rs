//! Fixer agent.

use quill_core::{ActionPlan, Error, Fixer, ProblemClass, RepairRequest, Result, Role};
use rig::agent::Agent;
use rig::completion::{CompletionModel, Prompt};

use crate::TRACING_TARGET;
use crate::parse::parse_replacement;
use crate::prompt::PromptBuilder;

const NAME: &str = "FixerAgent";
const DESCRIPTION: &str = "Agent that rewrites an action plan that failed a check";

const PREAMBLE: &str = "\
You repair action plans for plain-text document edits.
You receive a plan and the problems found in it. Return a complete replacement plan that fixes every problem while still carrying out the edit instruction.
Search texts must be exact quotes from the document.
If the plan cannot be repaired, reply with null.
Reply with a single JSON object matching the plan schema, or null, and nothing else.";

const DATAFLOW_INSTRUCTION: &str = "\
The plan's variables do not line up: every variable an edit or format action uses must be bound by exactly one find action. \
Return the complete corrected plan, or null.";

const LOCATION_INSTRUCTION: &str = "\
Some search texts were not found in the document. Quote the document exactly. \
Return the complete corrected plan, or null.";

/// Rewrites plans that failed dataflow validation or location.
pub struct FixerAgent<M: CompletionModel> {
    agent: Agent<M>,
}

impl<M: CompletionModel> FixerAgent<M> {
    /// Creates a fixer agent for the given model.
    pub fn new(model: M, temperature: Option<f64>) -> Self {
        let agent = super::build_agent(model, NAME, DESCRIPTION, PREAMBLE, temperature);
        Self { agent }
    }

    fn build_prompt(request: &RepairRequest) -> String {
        let instruction = match request.class {
            ProblemClass::Dataflow => DATAFLOW_INSTRUCTION,
            ProblemClass::Location => LOCATION_INSTRUCTION,
        };

        PromptBuilder::new(instruction)
            .with_message(&request.message)
            .with_document(&request.document_text)
            .with_plan(&request.plan)
            .with_problems(&request.problems)
            .with_schema()
            .build()
    }
}

#[async_trait::async_trait]
impl<M: CompletionModel + 'static> Fixer for FixerAgent<M> {
    #[tracing::instrument(
        target = TRACING_TARGET,
        skip_all,
        fields(agent = NAME, class = %request.class, attempt = request.attempt),
    )]
    async fn fix(&self, request: &RepairRequest) -> Result<Option<ActionPlan>> {
        let prompt = Self::build_prompt(request);
        let reply = self
            .agent
            .prompt(prompt.as_str())
            .await
            .map_err(|e| Error::collaborator(Role::Fixer, e))?;

        let replacement = parse_replacement(&reply)?;
        if replacement.is_none() {
            tracing::info!(target: TRACING_TARGET, "fixer declined");
        }

        Ok(replacement)
    }
}

#[cfg(test)]
mod tests {
    use quill_core::{Problem, ProblemKind};
    use quill_test::fixture::{FOX_DOCUMENT, dog_plan};

    use super::*;

    type TestFixer = FixerAgent<rig::providers::openai::CompletionModel>;

    fn request(class: ProblemClass) -> RepairRequest {
        RepairRequest {
            message: "add a verb".to_string(),
            document_text: FOX_DOCUMENT.to_string(),
            plan: dog_plan(),
            class,
            problems: vec![Problem::new(ProblemKind::NoMatch, "dog_pos", "'dog' not found")],
            attempt: 1,
        }
    }

    #[test]
    fn location_prompt_lists_problems() {
        let prompt = TestFixer::build_prompt(&request(ProblemClass::Location));

        assert!(prompt.contains("- no_match 'dog_pos': 'dog' not found"));
        assert!(prompt.contains("## Current Plan"));
        assert!(prompt.ends_with(LOCATION_INSTRUCTION));
    }

    #[test]
    fn instruction_follows_problem_class() {
        let prompt = TestFixer::build_prompt(&request(ProblemClass::Dataflow));
        assert!(prompt.ends_with(DATAFLOW_INSTRUCTION));
    }
}
