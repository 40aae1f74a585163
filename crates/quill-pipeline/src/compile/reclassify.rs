//! Turning markdown-styled replace edits into format actions.
//!
//! Planners often express "make this bold" as a replace edit whose new text
//! is the old text wrapped in `**`. Applying that literally would write the
//! markers into the document, so such edits become format actions instead.

use quill_core::{ActionPlan, EditAction, EditKind, FormatAction, FormatKind};

/// Deepest heading level a document supports.
pub const MAX_HEADING_LEVEL: usize = 6;

/// Formatting implied by the shape of a replacement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Styling {
    BoldItalic,
    Bold,
    Italic,
    Heading(usize),
}

impl Styling {
    fn detect(text: &str) -> Option<Self> {
        if wrapped_in(text, "***") {
            return Some(Self::BoldItalic);
        }
        if wrapped_in(text, "**") || wrapped_in(text, "__") {
            return Some(Self::Bold);
        }
        if wrapped_in(text, "*") || wrapped_in(text, "_") {
            return Some(Self::Italic);
        }

        let hashes = text.chars().take_while(|&c| c == '#').count();
        (hashes > 0).then(|| Self::Heading(hashes.min(MAX_HEADING_LEVEL)))
    }

    fn actions(self, edit: &EditAction) -> Vec<FormatAction> {
        let action = |kind: FormatKind| FormatAction {
            kind,
            position_variable: edit.position_variable.clone(),
            selection_length: edit.selection_length,
            parameter: None,
            explanation: edit.explanation.clone(),
        };

        match self {
            Self::BoldItalic => vec![action(FormatKind::Bold), action(FormatKind::Italic)],
            Self::Bold => vec![action(FormatKind::Bold)],
            Self::Italic => vec![action(FormatKind::Italic)],
            Self::Heading(level) => {
                vec![action(FormatKind::Heading).with_parameter(level.to_string())]
            }
        }
    }
}

/// Returns true if `text` is `marker`, non-empty content, `marker`.
///
/// The content may not itself start or end with the marker's character, so
/// `**x**` is not read as `*` around `*x*`.
fn wrapped_in(text: &str, marker: &str) -> bool {
    let Some(inner) = text
        .strip_prefix(marker)
        .and_then(|rest| rest.strip_suffix(marker))
    else {
        return false;
    };

    let Some(delimiter) = marker.chars().next() else {
        return false;
    };

    !inner.trim().is_empty() && !inner.starts_with(delimiter) && !inner.ends_with(delimiter)
}

/// Moves styled replace edits out of the plan's edits and into its formats.
///
/// Reclassified format actions are appended after the existing ones, in the
/// order their edits appeared. Returns the number of edits reclassified.
pub fn reclassify(plan: &mut ActionPlan) -> usize {
    let mut kept = Vec::with_capacity(plan.edit_actions.len());
    let mut reclassified = 0;

    for edit in std::mem::take(&mut plan.edit_actions) {
        let styling = match (&edit.kind, &edit.text) {
            (EditKind::Replace, Some(text)) => Styling::detect(text),
            _ => None,
        };

        match styling {
            Some(styling) => {
                tracing::debug!(
                    target: super::TRACING_TARGET,
                    variable = %edit.position_variable,
                    ?styling,
                    "replace edit reclassified as formatting"
                );
                plan.format_actions.extend(styling.actions(&edit));
                reclassified += 1;
            }
            None => kept.push(edit),
        }
    }

    plan.edit_actions = kept;
    reclassified
}
