//! Compilation of resolved plans into operations.
//!
//! Each surviving edit and format action becomes one [`Operation`] whose
//! offsets come from the [`PositionMap`]. An action missing a field its kind
//! requires is skipped on its own; the rest of the plan still compiles.

mod reclassify;

use std::str::FromStr;

use derive_more::Display;
pub use reclassify::{MAX_HEADING_LEVEL, reclassify};
use quill_core::{
    ActionPlan, EditAction, EditKind, FormatAction, FormatKind, ListType, Operation,
    OperationArgs, OperationKind,
};
use serde::Serialize;

use crate::position::PositionMap;

/// Tracing target for compilation.
pub const TRACING_TARGET: &str = "quill_pipeline::compile";

/// Why an action was left out of the compiled operations.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    #[display("position variable '{variable}' is unresolved")]
    UnresolvedVariable { variable: String },

    #[display("text is required")]
    MissingText,

    #[display("selection length is required")]
    MissingSelectionLength,

    #[display("parameter is required")]
    MissingParameter,

    #[display("heading level '{value}' is not between 1 and 6")]
    InvalidHeadingLevel { value: String },

    #[display("list type '{value}' is not 'bullet' or 'ordered'")]
    UnknownListType { value: String },

    #[display("selection ends at {end}, past the document end at {len}")]
    SelectionOutOfBounds { end: usize, len: usize },
}

/// Which part of the plan a skipped action came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionSection {
    #[display("edit")]
    Edit,
    #[display("format")]
    Format,
}

/// A single action omitted from compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompileSkip {
    /// Section of the plan the action sits in.
    pub section: ActionSection,

    /// Index within that section.
    pub index: usize,

    /// Operation the action would have produced.
    pub kind: OperationKind,

    /// Why it was skipped.
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Operations compiled from a plan, with the actions that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Compilation {
    /// Edits in plan order, followed by formats in plan order.
    pub operations: Vec<Operation>,

    /// Actions omitted for missing or invalid fields.
    pub skipped: Vec<CompileSkip>,
}

type Compiled = Result<Operation, SkipReason>;

/// Compiles resolved plans against a frozen snapshot length.
#[derive(Debug, Clone, Copy)]
pub struct PlanCompiler {
    document_len: usize,
}

impl PlanCompiler {
    /// Creates a compiler for a snapshot of `document_len` characters.
    pub fn new(document_len: usize) -> Self {
        Self { document_len }
    }

    /// Compiles every edit, then every format action.
    pub fn compile(&self, plan: &ActionPlan, positions: &PositionMap) -> Compilation {
        let mut compilation = Compilation::default();

        let edits = plan.edit_actions.iter().map(|edit| {
            let kind = OperationKind::from(edit.kind);
            (ActionSection::Edit, kind, self.edit(edit, positions))
        });
        let formats = plan.format_actions.iter().map(|format| {
            let kind = OperationKind::from(format.kind);
            (ActionSection::Format, kind, self.format(format, positions))
        });

        let mut edit_index = 0;
        let mut format_index = 0;

        for (section, kind, compiled) in edits.chain(formats) {
            let index = match section {
                ActionSection::Edit => post_increment(&mut edit_index),
                ActionSection::Format => post_increment(&mut format_index),
            };

            match compiled {
                Ok(operation) => compilation.operations.push(operation),
                Err(reason) => {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        %section,
                        index,
                        %kind,
                        %reason,
                        "action skipped"
                    );
                    compilation.skipped.push(CompileSkip {
                        section,
                        index,
                        kind,
                        reason,
                    });
                }
            }
        }

        tracing::debug!(
            target: TRACING_TARGET,
            operations = compilation.operations.len(),
            skipped = compilation.skipped.len(),
            "plan compiled"
        );

        compilation
    }

    fn edit(&self, edit: &EditAction, positions: &PositionMap) -> Compiled {
        let start = self.start(&edit.position_variable, positions)?;
        let explanation = edit.explanation.clone();

        let args = match edit.kind {
            EditKind::Insert => OperationArgs::Insert {
                position: start,
                text: required_text(edit)?,
                explanation,
            },
            EditKind::Delete => OperationArgs::Delete {
                start,
                end: self.end(start, edit.selection_length)?,
                explanation,
            },
            EditKind::Replace => OperationArgs::Replace {
                start,
                end: self.end(start, edit.selection_length)?,
                text: required_text(edit)?,
                explanation,
            },
        };

        Ok(Operation::new(edit.kind.into(), args))
    }

    fn format(&self, format: &FormatAction, positions: &PositionMap) -> Compiled {
        let start = self.start(&format.position_variable, positions)?;
        let end = self.end(start, format.selection_length)?;
        let explanation = format.explanation.clone();

        let args = match format.kind {
            FormatKind::Bold
            | FormatKind::Italic
            | FormatKind::Underline
            | FormatKind::Strikethrough
            | FormatKind::BlockQuote => OperationArgs::Style {
                start,
                end,
                explanation,
            },
            FormatKind::Heading => OperationArgs::Heading {
                start,
                end,
                level: heading_level(required_parameter(format)?)?,
                explanation,
            },
            FormatKind::List => {
                let value = required_parameter(format)?;
                let list_type =
                    ListType::from_str(value.trim()).map_err(|_| SkipReason::UnknownListType {
                        value: value.to_string(),
                    })?;
                OperationArgs::List {
                    start,
                    end,
                    list_type,
                    explanation,
                }
            }
            FormatKind::CodeBlock => OperationArgs::CodeBlock {
                start,
                end,
                language: required_parameter(format)?.to_string(),
                explanation,
            },
            FormatKind::Link => OperationArgs::Link {
                start,
                end,
                url: required_parameter(format)?.to_string(),
                explanation,
            },
        };

        Ok(Operation::new(format.kind.into(), args))
    }

    fn start(&self, variable: &str, positions: &PositionMap) -> Result<usize, SkipReason> {
        let start = positions
            .offset(variable)
            .ok_or_else(|| SkipReason::UnresolvedVariable {
                variable: variable.to_string(),
            })?;

        if start > self.document_len {
            return Err(SkipReason::SelectionOutOfBounds {
                end: start,
                len: self.document_len,
            });
        }
        Ok(start)
    }

    fn end(&self, start: usize, selection_length: Option<usize>) -> Result<usize, SkipReason> {
        let length = selection_length.ok_or(SkipReason::MissingSelectionLength)?;
        let end = start.saturating_add(length);

        if end > self.document_len {
            return Err(SkipReason::SelectionOutOfBounds {
                end,
                len: self.document_len,
            });
        }
        Ok(end)
    }
}

fn post_increment(counter: &mut usize) -> usize {
    let current = *counter;
    *counter += 1;
    current
}

fn required_text(edit: &EditAction) -> Result<String, SkipReason> {
    edit.text.clone().ok_or(SkipReason::MissingText)
}

fn required_parameter(format: &FormatAction) -> Result<&str, SkipReason> {
    format
        .parameter
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .ok_or(SkipReason::MissingParameter)
}

fn heading_level(value: &str) -> Result<u8, SkipReason> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|level| (1..=MAX_HEADING_LEVEL as u8).contains(level))
        .ok_or_else(|| SkipReason::InvalidHeadingLevel {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use quill_core::{FindAction, OperationStatus};

    use super::*;

    fn positions(bindings: &[(&str, usize)]) -> PositionMap {
        bindings
            .iter()
            .map(|(name, offset)| (name.to_string(), *offset))
            .collect()
    }

    #[test]
    fn insert_compiles_at_the_bound_offset() {
        let plan = ActionPlan::new()
            .with_find(FindAction::new("fox_pos", "fox"))
            .with_edit(EditAction::insert("fox_pos", " jumps"));

        let compilation = PlanCompiler::new(19).compile(&plan, &positions(&[("fox_pos", 16)]));

        assert!(compilation.skipped.is_empty());
        let [operation] = compilation.operations.as_slice() else {
            panic!("expected one operation");
        };
        assert_eq!(operation.kind(), OperationKind::Insert);
        assert_eq!(operation.status(), OperationStatus::Suggested);
        assert_eq!(
            operation.args(),
            &OperationArgs::Insert {
                position: 16,
                text: " jumps".to_string(),
                explanation: String::new(),
            }
        );
    }

    #[test]
    fn edits_precede_formats_in_plan_order() {
        let plan = ActionPlan::new()
            .with_format(FormatAction::new(FormatKind::Bold, "a", 2))
            .with_edit(EditAction::delete("a", 2))
            .with_format(FormatAction::heading("b", 3, 2))
            .with_edit(EditAction::replace("b", 1, "X"));

        let compilation =
            PlanCompiler::new(10).compile(&plan, &positions(&[("a", 0), ("b", 5)]));

        let kinds: Vec<_> = compilation.operations.iter().map(Operation::kind).collect();
        assert_eq!(
            kinds,
            vec![
                OperationKind::Delete,
                OperationKind::Replace,
                OperationKind::Bold,
                OperationKind::Heading,
            ]
        );
        assert_eq!(compilation.operations[0].range(), (0, 2));
        assert_eq!(compilation.operations[3].range(), (5, 8));
    }

    #[test]
    fn operation_ids_are_unique() {
        let plan = ActionPlan::new()
            .with_edit(EditAction::insert("a", "x"))
            .with_edit(EditAction::insert("a", "y"));

        let compilation = PlanCompiler::new(5).compile(&plan, &positions(&[("a", 1)]));
        assert_ne!(compilation.operations[0].id(), compilation.operations[1].id());
    }

    #[test]
    fn missing_fields_skip_only_that_action() {
        let mut no_text = EditAction::insert("a", "");
        no_text.text = None;

        let plan = ActionPlan::new()
            .with_edit(no_text)
            .with_edit(EditAction::delete("a", 1))
            .with_format(FormatAction::new(FormatKind::CodeBlock, "a", 1))
            .with_format(FormatAction::new(FormatKind::List, "a", 1).with_parameter("numbered"))
            .with_format(FormatAction::heading("a", 1, 9))
            .with_format(FormatAction::new(FormatKind::List, "a", 1).with_parameter("Bullet"));

        let compilation = PlanCompiler::new(5).compile(&plan, &positions(&[("a", 0)]));

        assert_eq!(compilation.operations.len(), 2);
        let reasons: Vec<_> = compilation
            .skipped
            .iter()
            .map(|skip| (skip.section, skip.index, skip.reason.clone()))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (ActionSection::Edit, 0, SkipReason::MissingText),
                (ActionSection::Format, 0, SkipReason::MissingParameter),
                (
                    ActionSection::Format,
                    1,
                    SkipReason::UnknownListType {
                        value: "numbered".to_string()
                    }
                ),
                (
                    ActionSection::Format,
                    2,
                    SkipReason::InvalidHeadingLevel {
                        value: "9".to_string()
                    }
                ),
            ]
        );
    }

    #[test]
    fn out_of_bounds_and_unresolved_are_skipped() {
        let plan = ActionPlan::new()
            .with_edit(EditAction::delete("a", 10))
            .with_edit(EditAction::insert("ghost", "x"));

        let compilation = PlanCompiler::new(5).compile(&plan, &positions(&[("a", 2)]));

        assert!(compilation.operations.is_empty());
        assert_eq!(
            compilation.skipped[0].reason,
            SkipReason::SelectionOutOfBounds { end: 12, len: 5 }
        );
        assert_eq!(
            compilation.skipped[1].reason,
            SkipReason::UnresolvedVariable {
                variable: "ghost".to_string()
            }
        );
    }

    #[test]
    fn skip_serializes_flat() {
        let skip = CompileSkip {
            section: ActionSection::Format,
            index: 1,
            kind: OperationKind::Link,
            reason: SkipReason::MissingParameter,
        };

        let json = serde_json::to_value(&skip).unwrap();
        assert_eq!(json["reason"], "missing_parameter");
        assert_eq!(json["kind"], "link");
        assert_eq!(json["section"], "format");
    }
}
