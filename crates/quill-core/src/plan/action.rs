//! Find and edit actions.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// Request to locate text and bind its start offset to a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct FindAction {
    /// Name the located offset is bound to; unique within a plan.
    pub variable_name: String,

    /// Literal text to search for in the document.
    pub search_text: String,
}

impl FindAction {
    /// Creates a find action.
    pub fn new(variable_name: impl Into<String>, search_text: impl Into<String>) -> Self {
        Self {
            variable_name: variable_name.into(),
            search_text: search_text.into(),
        }
    }
}

/// Kind of a text edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EditKind {
    /// Insert text at the position.
    Insert,
    /// Delete `selection_length` characters from the position.
    Delete,
    /// Replace `selection_length` characters from the position with text.
    Replace,
}

impl EditKind {
    /// Returns whether this kind needs a `selection_length`.
    pub fn needs_selection(&self) -> bool {
        matches!(self, Self::Delete | Self::Replace)
    }

    /// Returns whether this kind needs literal `text`.
    pub fn needs_text(&self) -> bool {
        matches!(self, Self::Insert | Self::Replace)
    }
}

/// A text edit anchored at a variable bound by a [`FindAction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct EditAction {
    /// Edit kind.
    #[serde(rename = "type")]
    pub kind: EditKind,

    /// Variable holding the start offset.
    pub position_variable: String,

    /// Number of characters affected (delete and replace).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_length: Option<usize>,

    /// Literal text (insert and replace).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Why the edit is made.
    #[serde(default)]
    pub explanation: String,
}

impl EditAction {
    /// Creates an insert edit.
    pub fn insert(position_variable: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: EditKind::Insert,
            position_variable: position_variable.into(),
            selection_length: None,
            text: Some(text.into()),
            explanation: String::new(),
        }
    }

    /// Creates a delete edit.
    pub fn delete(position_variable: impl Into<String>, selection_length: usize) -> Self {
        Self {
            kind: EditKind::Delete,
            position_variable: position_variable.into(),
            selection_length: Some(selection_length),
            text: None,
            explanation: String::new(),
        }
    }

    /// Creates a replace edit.
    pub fn replace(
        position_variable: impl Into<String>,
        selection_length: usize,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: EditKind::Replace,
            position_variable: position_variable.into(),
            selection_length: Some(selection_length),
            text: Some(text.into()),
            explanation: String::new(),
        }
    }

    /// Sets the explanation.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_action_uses_type_tag() {
        let json = r#"{"type":"replace","position_variable":"p","selection_length":3,"text":"new"}"#;
        let edit: EditAction = serde_json::from_str(json).unwrap();

        assert_eq!(edit.kind, EditKind::Replace);
        assert_eq!(edit.selection_length, Some(3));
        assert!(edit.explanation.is_empty());
    }

    #[test]
    fn edit_kind_requirements() {
        assert!(EditKind::Insert.needs_text());
        assert!(!EditKind::Insert.needs_selection());
        assert!(EditKind::Delete.needs_selection());
        assert!(!EditKind::Delete.needs_text());
        assert!(EditKind::Replace.needs_selection() && EditKind::Replace.needs_text());
    }
}
