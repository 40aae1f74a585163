//! Compiled, executable operations.

mod args;

pub use args::OperationArgs;
use serde::Serialize;
use strum::{AsRefStr, Display, IntoStaticStr};
use uuid::Uuid;

use crate::plan::{EditKind, FormatKind};

/// Tag of a compiled operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, IntoStaticStr)]
#[derive(Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Insert,
    Delete,
    Replace,
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Heading,
    List,
    CodeBlock,
    BlockQuote,
    Link,
}

impl OperationKind {
    /// Returns whether this operation changes document text.
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::Insert | Self::Delete | Self::Replace)
    }
}

impl From<EditKind> for OperationKind {
    fn from(kind: EditKind) -> Self {
        match kind {
            EditKind::Insert => Self::Insert,
            EditKind::Delete => Self::Delete,
            EditKind::Replace => Self::Replace,
        }
    }
}

impl From<FormatKind> for OperationKind {
    fn from(kind: FormatKind) -> Self {
        match kind {
            FormatKind::Bold => Self::Bold,
            FormatKind::Italic => Self::Italic,
            FormatKind::Underline => Self::Underline,
            FormatKind::Strikethrough => Self::Strikethrough,
            FormatKind::Heading => Self::Heading,
            FormatKind::List => Self::List,
            FormatKind::CodeBlock => Self::CodeBlock,
            FormatKind::BlockQuote => Self::BlockQuote,
            FormatKind::Link => Self::Link,
        }
    }
}

/// Review status of an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    /// Awaiting user review.
    #[default]
    Suggested,
    /// Approved by the user.
    Accepted,
    /// Rejected by the user.
    Rejected,
}

/// A compiled operation against the frozen document snapshot.
///
/// Only the status changes after compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    /// Unique operation ID.
    id: Uuid,

    /// Operation tag.
    #[serde(rename = "type")]
    kind: OperationKind,

    /// Kind-specific payload.
    args: OperationArgs,

    /// Current status.
    status: OperationStatus,
}

impl Operation {
    /// Creates a suggested operation with a fresh ID.
    pub fn new(kind: OperationKind, args: OperationArgs) -> Self {
        Self {
            id: Uuid::now_v7(),
            kind,
            args,
            status: OperationStatus::Suggested,
        }
    }

    /// Returns the operation ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the operation tag.
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// Returns the payload.
    pub fn args(&self) -> &OperationArgs {
        &self.args
    }

    /// Returns the current status.
    pub fn status(&self) -> OperationStatus {
        self.status
    }

    /// Returns the affected character range.
    pub fn range(&self) -> (usize, usize) {
        self.args.range()
    }

    /// Marks the operation as accepted.
    pub fn mark_accepted(&mut self) {
        self.status = OperationStatus::Accepted;
    }

    /// Marks the operation as rejected.
    pub fn mark_rejected(&mut self) {
        self.status = OperationStatus::Rejected;
    }

    /// Returns a summary of the operation for display.
    pub fn summary(&self) -> String {
        let (start, end) = self.range();
        let location = if start == end {
            format!("offset {start}")
        } else {
            format!("offset {start}..{end}")
        };

        match self.args.explanation() {
            "" => format!("{} at {location}", self.kind),
            explanation => format!("{} at {location}: {explanation}", self.kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delete_op() -> Operation {
        Operation::new(
            OperationKind::Delete,
            OperationArgs::Delete {
                start: 2,
                end: 5,
                explanation: "remove filler".to_string(),
            },
        )
    }

    #[test]
    fn operations_start_suggested_with_unique_ids() {
        let a = delete_op();
        let b = delete_op();

        assert_eq!(a.status(), OperationStatus::Suggested);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn status_is_the_only_mutation() {
        let mut op = delete_op();
        let args = op.args().clone();

        op.mark_rejected();
        assert_eq!(op.status(), OperationStatus::Rejected);
        op.mark_accepted();
        assert_eq!(op.status(), OperationStatus::Accepted);
        assert_eq!(op.args(), &args);
    }

    #[test]
    fn summary_mentions_kind_and_range() {
        assert_eq!(delete_op().summary(), "delete at offset 2..5: remove filler");
    }

    #[test]
    fn serializes_with_type_tag() {
        let value = serde_json::to_value(delete_op()).unwrap();

        assert_eq!(value["type"], "delete");
        assert_eq!(value["status"], "suggested");
        assert_eq!(value["args"]["end"], 5);
    }

    #[test]
    fn format_kinds_map_to_operation_kinds() {
        assert_eq!(OperationKind::from(FormatKind::CodeBlock), OperationKind::CodeBlock);
        assert_eq!(OperationKind::from(EditKind::Replace), OperationKind::Replace);
        assert!(!OperationKind::Bold.is_textual());
    }
}
