//! Structured payloads of compiled operations.

use serde::Serialize;

use crate::plan::ListType;

/// Arguments of an [`Operation`](super::Operation), one shape per kind.
///
/// Serialized untagged so callers see a plain object; the owning
/// operation's `type` identifies the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OperationArgs {
    /// Insert `text` at `position`.
    Insert {
        position: usize,
        text: String,
        explanation: String,
    },
    /// Remove `start..end`.
    Delete {
        start: usize,
        end: usize,
        explanation: String,
    },
    /// Replace `start..end` with `text`.
    Replace {
        start: usize,
        end: usize,
        text: String,
        explanation: String,
    },
    /// Make `start..end` a heading.
    Heading {
        start: usize,
        end: usize,
        level: u8,
        explanation: String,
    },
    /// Turn `start..end` into a list.
    List {
        start: usize,
        end: usize,
        list_type: ListType,
        explanation: String,
    },
    /// Turn `start..end` into a code block.
    CodeBlock {
        start: usize,
        end: usize,
        language: String,
        explanation: String,
    },
    /// Link `start..end` to `url`.
    Link {
        start: usize,
        end: usize,
        url: String,
        explanation: String,
    },
    /// Parameterless inline or block style over `start..end`.
    Style {
        start: usize,
        end: usize,
        explanation: String,
    },
}

impl OperationArgs {
    /// Returns the affected character range; empty for inserts.
    pub fn range(&self) -> (usize, usize) {
        match self {
            Self::Insert { position, .. } => (*position, *position),
            Self::Delete { start, end, .. }
            | Self::Replace { start, end, .. }
            | Self::Heading { start, end, .. }
            | Self::List { start, end, .. }
            | Self::CodeBlock { start, end, .. }
            | Self::Link { start, end, .. }
            | Self::Style { start, end, .. } => (*start, *end),
        }
    }

    /// Returns the explanation attached by the planner.
    pub fn explanation(&self) -> &str {
        match self {
            Self::Insert { explanation, .. }
            | Self::Delete { explanation, .. }
            | Self::Replace { explanation, .. }
            | Self::Heading { explanation, .. }
            | Self::List { explanation, .. }
            | Self::CodeBlock { explanation, .. }
            | Self::Link { explanation, .. }
            | Self::Style { explanation, .. } => explanation,
        }
    }
}
