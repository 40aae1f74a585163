//! Action plans proposed by the planner.
//!
//! A plan binds document positions to names through [`FindAction`]s and
//! consumes those names from [`EditAction`]s and [`FormatAction`]s. Plans are
//! never patched in place by repair: a repaired plan replaces the old one
//! wholesale.

mod action;
mod format;

use std::collections::BTreeSet;

pub use action::{EditAction, EditKind, FindAction};
pub use format::{FormatAction, FormatKind, ListType};
use serde::{Deserialize, Serialize};

/// A planner-proposed set of find, edit and format actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct ActionPlan {
    /// Text lookups, each binding one variable.
    #[serde(default)]
    pub find_actions: Vec<FindAction>,

    /// Text edits, in application order.
    #[serde(default)]
    pub edit_actions: Vec<EditAction>,

    /// Formatting changes, in application order.
    #[serde(default)]
    pub format_actions: Vec<FormatAction>,
}

impl ActionPlan {
    /// Creates an empty plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a find action.
    pub fn with_find(mut self, action: FindAction) -> Self {
        self.find_actions.push(action);
        self
    }

    /// Adds an edit action.
    pub fn with_edit(mut self, action: EditAction) -> Self {
        self.edit_actions.push(action);
        self
    }

    /// Adds a format action.
    pub fn with_format(mut self, action: FormatAction) -> Self {
        self.format_actions.push(action);
        self
    }

    /// Returns true if the plan has no actions at all.
    pub fn is_empty(&self) -> bool {
        self.find_actions.is_empty()
            && self.edit_actions.is_empty()
            && self.format_actions.is_empty()
    }

    /// Returns the variables consumed by edit and format actions.
    pub fn input_variables(&self) -> BTreeSet<&str> {
        self.edit_actions
            .iter()
            .map(|a| a.position_variable.as_str())
            .chain(
                self.format_actions
                    .iter()
                    .map(|a| a.position_variable.as_str()),
            )
            .collect()
    }

    /// Returns the find action binding `variable`, if any.
    pub fn find(&self, variable: &str) -> Option<&FindAction> {
        self.find_actions
            .iter()
            .find(|a| a.variable_name == variable)
    }

    /// Renders the plan as pretty JSON for prompts and logs.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
