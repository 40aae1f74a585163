//! Parsing of model replies.
//!
//! Models wrap JSON in markdown fences or add a sentence of prose around it
//! often enough that replies are unwrapped before parsing.

use std::sync::LazyLock;

use quill_core::{ActionPlan, Error, Result, Role};
use regex::Regex;

static FENCED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)```").expect("valid fence regex")
});

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+").expect("valid integer regex"));

/// Returns the contents of the first fenced block, or the trimmed reply.
pub fn strip_fences(reply: &str) -> &str {
    match FENCED.captures(reply).and_then(|caps| caps.get(1)) {
        Some(body) => body.as_str().trim(),
        None => reply.trim(),
    }
}

/// Returns the outermost `{...}` span of a reply, if any.
pub fn extract_object(reply: &str) -> Option<&str> {
    let body = strip_fences(reply);
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    (start < end).then(|| &body[start..=end])
}

/// Parses a plan from a reply.
pub fn parse_plan(role: Role, reply: &str) -> Result<ActionPlan> {
    let object = extract_object(reply)
        .ok_or_else(|| Error::collaborator(role, "reply contains no JSON object"))?;

    serde_json::from_str(object)
        .map_err(|error| Error::collaborator(role, format!("reply is not a valid plan: {error}")))
}

/// Parses a fixer reply; `null` or an empty reply means no replacement.
pub fn parse_replacement(reply: &str) -> Result<Option<ActionPlan>> {
    let body = strip_fences(reply);
    if body.is_empty() || body.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    parse_plan(Role::Fixer, body).map(Some)
}

/// Parses an arbiter reply: the first integer in the text.
pub fn parse_choice(reply: &str) -> Result<i64> {
    let found = INTEGER
        .find(strip_fences(reply))
        .ok_or_else(|| Error::collaborator(Role::Arbiter, "reply contains no integer"))?;

    found.as_str().parse().map_err(|error| {
        Error::collaborator(Role::Arbiter, format!("'{}' is not an index: {error}", found.as_str()))
    })
}
