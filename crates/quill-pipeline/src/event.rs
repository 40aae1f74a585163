//! Events published by a running pipeline.
//!
//! A run publishes zero or more [`PipelineEvent::Status`] events followed by
//! exactly one terminal event, either [`PipelineEvent::Error`] or
//! [`PipelineEvent::Result`].

use quill_core::{ActionPlan, Operation, Problem, Timing};
use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};

use crate::compile::CompileSkip;
use crate::locate::Ambiguity;
use crate::position::PositionMap;

/// Pipeline stages, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumIter, IntoStaticStr)]
#[derive(Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Planning,
    Validation,
    DataflowRepair,
    Sanitization,
    Location,
    LocationRepair,
    Arbitration,
    Reclassification,
    Compilation,
}

/// Stage-specific findings attached to an event.
///
/// Empty fields are left out of the serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Problems that block the next stage.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub problems: Vec<Problem>,

    /// Non-fatal findings.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Problem>,

    /// Find actions waiting on arbitration.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ambiguities: Vec<Ambiguity>,

    /// Actions left out of compilation.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<CompileSkip>,

    /// Offsets resolved so far.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<PositionMap>,

    /// Fixer calls made by a repair loop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<usize>,

    /// Actions rewritten by sanitization or reclassification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed: Option<usize>,
}

impl Diagnostics {
    /// Creates empty diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_problems(mut self, problems: Vec<Problem>) -> Self {
        self.problems = problems;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<Problem>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn with_ambiguities(mut self, ambiguities: Vec<Ambiguity>) -> Self {
        self.ambiguities = ambiguities;
        self
    }

    pub fn with_skipped(mut self, skipped: Vec<CompileSkip>) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn with_positions(mut self, positions: PositionMap) -> Self {
        self.positions = Some(positions);
        self
    }

    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempts = Some(attempts);
        self
    }

    pub fn with_changed(mut self, changed: usize) -> Self {
        self.changed = Some(changed);
        self
    }
}

/// Wall-clock span of one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageTiming {
    /// The stage measured.
    pub stage: Stage,

    /// Start and end timestamps.
    #[serde(flatten)]
    pub timing: Timing,

    /// Duration in milliseconds.
    pub elapsed_ms: i64,
}

impl StageTiming {
    /// Records a stage span.
    pub fn new(stage: Stage, timing: Timing) -> Self {
        Self {
            stage,
            timing,
            elapsed_ms: timing.elapsed_ms(),
        }
    }
}

/// One event of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// A stage finished.
    Status {
        stage: Stage,
        plan: ActionPlan,
        diagnostics: Diagnostics,
    },

    /// The run failed; nothing follows.
    Error {
        stage: Stage,
        message: String,
        diagnostics: Diagnostics,
    },

    /// The run succeeded; nothing follows.
    Result {
        plan: ActionPlan,
        positions: PositionMap,
        operations: Vec<Operation>,
        skipped: Vec<CompileSkip>,
        timings: Vec<StageTiming>,
    },
}

impl PipelineEvent {
    /// Returns true for the error and result events.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Status { .. })
    }

    /// Returns true for the error event.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns the stage of a status or error event.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Status { stage, .. } | Self::Error { stage, .. } => Some(*stage),
            Self::Result { .. } => None,
        }
    }

    /// Returns the event name used on the wire.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Status { .. } => "status",
            Self::Error { .. } => "error",
            Self::Result { .. } => "result",
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn stages_are_ordered() {
        let stages: Vec<_> = Stage::iter().map(|s| s.to_string()).collect();
        assert_eq!(stages.first().map(String::as_str), Some("planning"));
        assert_eq!(stages.last().map(String::as_str), Some("compilation"));
        assert_eq!(stages.len(), 9);
    }

    #[test]
    fn status_serializes_with_event_tag() {
        let event = PipelineEvent::Status {
            stage: Stage::Validation,
            plan: ActionPlan::new(),
            diagnostics: Diagnostics::new().with_attempts(0),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "status");
        assert_eq!(json["stage"], "validation");
        assert_eq!(json["diagnostics"]["attempts"], 0);
        assert!(json["diagnostics"].get("problems").is_none());
        assert!(!event.is_terminal());
    }

    #[test]
    fn error_is_terminal() {
        let event = PipelineEvent::Error {
            stage: Stage::Arbitration,
            message: "rejected".to_string(),
            diagnostics: Diagnostics::new(),
        };

        assert!(event.is_terminal());
        assert!(event.is_error());
        assert_eq!(event.stage(), Some(Stage::Arbitration));
        assert_eq!(event.event_type(), "error");
    }
}
