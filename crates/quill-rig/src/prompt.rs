//! Prompt building for the collaborator agents.

use std::fmt::Write;
use std::sync::LazyLock;

use quill_core::{ActionPlan, Candidate, FormatKind, Problem};
use strum::IntoEnumIterator;

/// Pretty-printed JSON schema of [`ActionPlan`].
static PLAN_SCHEMA: LazyLock<String> = LazyLock::new(|| {
    let schema = schemars::schema_for!(ActionPlan);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
});

/// Returns the JSON schema every plan reply must follow.
pub fn plan_schema() -> &'static str {
    &PLAN_SCHEMA
}

/// Builder for the user prompt sent to an agent.
///
/// Sections are emitted in a fixed order regardless of the order the
/// builder methods are called in.
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    instruction: String,
    message: Option<String>,
    document: Option<String>,
    plan: Option<String>,
    schema: bool,
    problems: Vec<Problem>,
    variable: Option<(String, String)>,
    candidates: Vec<Candidate>,
}

impl PromptBuilder {
    /// Creates a builder with the task instruction that ends the prompt.
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            ..Self::default()
        }
    }

    /// Adds the user's edit instruction.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds the document text.
    pub fn with_document(mut self, text: impl Into<String>) -> Self {
        self.document = Some(text.into());
        self
    }

    /// Adds the current plan as JSON.
    pub fn with_plan(mut self, plan: &ActionPlan) -> Self {
        self.plan = Some(plan.to_pretty_json());
        self
    }

    /// Adds the plan schema and the format-operation reference.
    pub fn with_schema(mut self) -> Self {
        self.schema = true;
        self
    }

    /// Adds the problems a replacement plan has to fix.
    pub fn with_problems(mut self, problems: &[Problem]) -> Self {
        self.problems = problems.to_vec();
        self
    }

    /// Adds the ambiguous variable and its candidates.
    pub fn with_candidates(
        mut self,
        variable: &str,
        search_text: &str,
        candidates: &[Candidate],
    ) -> Self {
        self.variable = Some((variable.to_string(), search_text.to_string()));
        self.candidates = candidates.to_vec();
        self
    }

    /// Builds the prompt text.
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        if let Some(message) = &self.message {
            let _ = write!(prompt, "## Edit Instruction\n\n{message}\n\n");
        }

        if let Some(document) = &self.document {
            let _ = write!(prompt, "## Document\n\n```text\n{document}\n```\n\n");
        }

        if let Some(plan) = &self.plan {
            let _ = write!(prompt, "## Current Plan\n\n```json\n{plan}\n```\n\n");
        }

        if !self.problems.is_empty() {
            prompt.push_str("## Problems\n\n");
            for problem in &self.problems {
                let _ = writeln!(prompt, "- {problem}");
            }
            prompt.push('\n');
        }

        if let Some((variable, search_text)) = &self.variable {
            let _ = write!(
                prompt,
                "## Candidates\n\nThe find action binding `{variable}` searched for \"{search_text}\" and matched {} locations:\n\n",
                self.candidates.len()
            );
            for candidate in &self.candidates {
                let _ = writeln!(
                    prompt,
                    "{}. offset {}: {}",
                    candidate.index, candidate.offset, candidate.context
                );
            }
            prompt.push('\n');
        }

        if self.schema {
            let _ = write!(
                prompt,
                "## Plan Schema\n\n```json\n{}\n```\n\n{}\n\n",
                plan_schema(),
                format_reference()
            );
        }

        prompt.push_str(&self.instruction);
        prompt
    }
}

/// Describes every format operation and its parameter.
fn format_reference() -> String {
    let mut reference = String::from("Format action types:\n");
    for kind in FormatKind::iter() {
        let parameter = match kind {
            FormatKind::Heading => "parameter: heading level 1-6",
            FormatKind::List => "parameter: \"bullet\" or \"ordered\"",
            FormatKind::CodeBlock => "parameter: language name",
            FormatKind::Link => "parameter: target URL",
            FormatKind::Bold
            | FormatKind::Italic
            | FormatKind::Underline
            | FormatKind::Strikethrough
            | FormatKind::BlockQuote => "no parameter",
        };
        let _ = writeln!(reference, "- `{kind}` ({parameter})");
    }
    reference
}

#[cfg(test)]
mod tests {
    use quill_core::ProblemKind;
    use quill_test::fixture::fox_insert_plan;

    use super::*;

    #[test]
    fn schema_describes_plan_fields() {
        let schema = plan_schema();
        assert!(schema.contains("find_actions"));
        assert!(schema.contains("position_variable"));
    }

    #[test]
    fn sections_follow_a_fixed_order() {
        let prompt = PromptBuilder::new("Reply with JSON.")
            .with_schema()
            .with_plan(&fox_insert_plan())
            .with_message("add a verb")
            .with_problems(&[Problem::new(ProblemKind::NoMatch, "fox_pos", "not found")])
            .build();

        let message = prompt.find("## Edit Instruction").unwrap();
        let plan = prompt.find("## Current Plan").unwrap();
        let problems = prompt.find("## Problems").unwrap();
        let schema = prompt.find("## Plan Schema").unwrap();

        assert!(message < plan && plan < problems && problems < schema);
        assert!(prompt.contains("no_match 'fox_pos': not found"));
        assert!(prompt.contains("`code_block` (parameter: language name)"));
        assert!(prompt.ends_with("Reply with JSON."));
    }

    #[test]
    fn candidates_are_enumerated_by_index() {
        let candidates = vec![
            Candidate {
                index: 0,
                offset: 0,
                context: "[cat] cat…".to_string(),
            },
            Candidate {
                index: 1,
                offset: 4,
                context: "cat [cat] cat".to_string(),
            },
        ];

        let prompt = PromptBuilder::new("Answer with an index.")
            .with_candidates("cat_pos", "cat", &candidates)
            .build();

        assert!(prompt.contains("matched 2 locations"));
        assert!(prompt.contains("1. offset 4: cat [cat] cat"));
    }
}
