//! Removal of markdown the planner copies into search text.
//!
//! Documents are searched as plain text, so emphasis markers, inline code
//! ticks and heading prefixes in a search text usually cannot match. A search
//! text that occurs literally in the document is left alone: the document may
//! contain those characters itself.

use std::sync::LazyLock;

use quill_core::ActionPlan;
use regex::Regex;

use crate::snapshot::Snapshot;

/// Tracing target for sanitization.
pub const TRACING_TARGET: &str = "quill_pipeline::sanitize";

static HEADING_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#{1,6}\s+").expect("valid heading regex"));

static INLINE_MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*{1,3}|~~|`+").expect("valid marker regex"));

static UNDERSCORE_WRAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(_{1,2})(\S(?:.*?\S)?)(_{1,2})$").expect("valid wrap regex"));

/// Strips markdown from a single search text.
///
/// Returns the input unchanged if stripping would leave nothing.
pub fn strip_markup(text: &str) -> String {
    let without_heading = HEADING_PREFIX.replace(text, "");
    let without_markers = INLINE_MARKERS.replace_all(&without_heading, "");

    let stripped = match UNDERSCORE_WRAP.captures(&without_markers) {
        Some(caps) if caps[1] == caps[3] => caps[2].to_string(),
        _ => without_markers.to_string(),
    };

    if stripped.trim().is_empty() {
        text.to_string()
    } else {
        stripped
    }
}

/// Strips markdown in place from every find action whose search text does
/// not occur literally in the snapshot.
///
/// Returns the number of search texts that changed.
pub fn sanitize_plan(plan: &mut ActionPlan, snapshot: &Snapshot) -> usize {
    let mut changed = 0;

    for find in &mut plan.find_actions {
        if snapshot.text().contains(find.search_text.as_str()) {
            continue;
        }

        let cleaned = strip_markup(&find.search_text);
        if cleaned != find.search_text {
            tracing::debug!(
                target: TRACING_TARGET,
                variable = %find.variable_name,
                before = %find.search_text,
                after = %cleaned,
                "stripped markup from search text"
            );
            find.search_text = cleaned;
            changed += 1;
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use quill_core::FindAction;

    use super::*;

    #[test]
    fn strips_emphasis_and_code() {
        assert_eq!(strip_markup("**quick** brown"), "quick brown");
        assert_eq!(strip_markup("***all***"), "all");
        assert_eq!(strip_markup("run `cargo`"), "run cargo");
        assert_eq!(strip_markup("~~old~~ text"), "old text");
    }

    #[test]
    fn strips_heading_prefix() {
        assert_eq!(strip_markup("## Introduction"), "Introduction");
    }

    #[test]
    fn keeps_interior_underscores() {
        assert_eq!(strip_markup("snake_case_name"), "snake_case_name");
        assert_eq!(strip_markup("__wrapped__"), "wrapped");
        assert_eq!(strip_markup("_emph_"), "emph");
    }

    #[test]
    fn keeps_text_that_would_vanish() {
        assert_eq!(strip_markup("***"), "***");
    }

    #[test]
    fn sanitize_plan_counts_changes() {
        let snapshot = Snapshot::new("some bold and plain text");
        let mut plan = ActionPlan::new()
            .with_find(FindAction::new("a", "**bold**"))
            .with_find(FindAction::new("b", "plain"));

        assert_eq!(sanitize_plan(&mut plan, &snapshot), 1);
        assert_eq!(plan.find_actions[0].search_text, "bold");
        assert_eq!(plan.find_actions[1].search_text, "plain");
    }

    #[test]
    fn literal_markup_in_the_document_is_kept() {
        let snapshot = Snapshot::new("The formula y = x**2 + 1 uses `pow` ~~twice~~.");
        let mut plan = ActionPlan::new()
            .with_find(FindAction::new("power", "x**2"))
            .with_find(FindAction::new("code", "`pow`"))
            .with_find(FindAction::new("struck", "~~twice~~"));

        assert_eq!(sanitize_plan(&mut plan, &snapshot), 0);
        assert_eq!(plan.find_actions[0].search_text, "x**2");
        assert_eq!(plan.find_actions[1].search_text, "`pow`");
        assert_eq!(plan.find_actions[2].search_text, "~~twice~~");
    }
}
