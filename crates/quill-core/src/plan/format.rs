//! Formatting actions.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Formatting operation applied to a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, EnumIter, IntoStaticStr)]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FormatKind {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    /// Parameter: heading level, 1 to 6.
    Heading,
    /// Parameter: `bullet` or `ordered`.
    List,
    /// Parameter: language name.
    CodeBlock,
    BlockQuote,
    /// Parameter: target URL.
    Link,
}

impl FormatKind {
    /// Returns whether the kind requires a parameter.
    pub fn needs_parameter(&self) -> bool {
        matches!(
            self,
            Self::Heading | Self::List | Self::CodeBlock | Self::Link
        )
    }
}

/// Type of list produced by [`FormatKind::List`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum ListType {
    Bullet,
    Ordered,
}

/// A formatting change anchored at a variable bound by a find action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct FormatAction {
    /// Formatting operation.
    #[serde(rename = "type")]
    pub kind: FormatKind,

    /// Variable holding the start offset.
    pub position_variable: String,

    /// Number of characters affected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_length: Option<usize>,

    /// Operation-specific parameter (level, list type, language, URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,

    /// Why the change is made.
    #[serde(default)]
    pub explanation: String,
}

impl FormatAction {
    /// Creates a format action without a parameter.
    pub fn new(
        kind: FormatKind,
        position_variable: impl Into<String>,
        selection_length: usize,
    ) -> Self {
        Self {
            kind,
            position_variable: position_variable.into(),
            selection_length: Some(selection_length),
            parameter: None,
            explanation: String::new(),
        }
    }

    /// Creates a heading action.
    pub fn heading(position_variable: impl Into<String>, selection_length: usize, level: u8) -> Self {
        Self::new(FormatKind::Heading, position_variable, selection_length)
            .with_parameter(level.to_string())
    }

    /// Sets the parameter.
    pub fn with_parameter(mut self, parameter: impl Into<String>) -> Self {
        self.parameter = Some(parameter.into());
        self
    }

    /// Sets the explanation.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}
