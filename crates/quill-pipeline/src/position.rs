//! Variable name to document offset bindings.

use std::collections::BTreeMap;

use derive_more::Deref;
use quill_core::ActionPlan;
use serde::{Deserialize, Serialize};

/// Resolved character offsets keyed by variable name.
///
/// Offsets index the frozen document snapshot taken at the start of the
/// request, never a partially edited document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionMap(BTreeMap<String, usize>);

impl PositionMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a variable, replacing any previous offset.
    pub fn bind(&mut self, variable: impl Into<String>, offset: usize) {
        self.0.insert(variable.into(), offset);
    }

    /// Returns the offset bound to `variable`.
    pub fn offset(&self, variable: &str) -> Option<usize> {
        self.0.get(variable).copied()
    }

    /// Moves every binding of `other` into this map.
    pub fn merge(&mut self, other: PositionMap) {
        self.0.extend(other.0);
    }

    /// Returns true if every variable the plan consumes is bound.
    pub fn is_resolved(&self, plan: &ActionPlan) -> bool {
        plan.input_variables()
            .into_iter()
            .all(|variable| self.0.contains_key(variable))
    }

    /// Keeps exactly the bindings consumed by the plan's surviving actions.
    pub fn finalize(mut self, plan: &ActionPlan) -> Self {
        let inputs = plan.input_variables();
        self.0.retain(|variable, _| inputs.contains(variable.as_str()));
        self
    }
}

impl FromIterator<(String, usize)> for PositionMap {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use quill_core::{EditAction, FindAction};

    use super::*;

    fn plan() -> ActionPlan {
        ActionPlan::new()
            .with_find(FindAction::new("used", "a"))
            .with_find(FindAction::new("spare", "b"))
            .with_edit(EditAction::delete("used", 1))
    }

    #[test]
    fn finalize_drops_unused_bindings() {
        let mut positions = PositionMap::new();
        positions.bind("used", 3);
        positions.bind("spare", 7);

        let finalized = positions.finalize(&plan());
        assert_eq!(finalized.len(), 1);
        assert_eq!(finalized.offset("used"), Some(3));
        assert_eq!(finalized.offset("spare"), None);
    }

    #[test]
    fn resolution_tracks_consumed_variables() {
        let mut positions = PositionMap::new();
        assert!(!positions.is_resolved(&plan()));

        let mut arbitrated = PositionMap::new();
        arbitrated.bind("used", 0);
        positions.merge(arbitrated);
        assert!(positions.is_resolved(&plan()));
    }

    #[test]
    fn serializes_as_a_plain_object() {
        let positions: PositionMap = [("fox_pos".to_string(), 16)].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&positions).unwrap(),
            r#"{"fox_pos":16}"#
        );
    }
}
