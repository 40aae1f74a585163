//! JSON-lines rendering of the event stream.

use std::io::Write;

use anyhow::Context;
use futures::{Stream, StreamExt};
use quill_pipeline::PipelineEvent;

use crate::TRACING_TARGET_OUTPUT;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The stream ended with a result event.
    Resolved,
    /// The stream ended with an error event.
    Failed,
    /// The stream ended without a terminal event.
    Interrupted,
}

/// Writes every event as one JSON line and returns how the run ended.
pub async fn write_events<S, W>(mut events: S, out: &mut W) -> anyhow::Result<Outcome>
where
    S: Stream<Item = PipelineEvent> + Unpin,
    W: Write,
{
    let mut outcome = Outcome::Interrupted;

    while let Some(event) = events.next().await {
        tracing::debug!(
            target: TRACING_TARGET_OUTPUT,
            event = event.event_type(),
            stage = ?event.stage(),
            "pipeline event"
        );

        serde_json::to_writer(&mut *out, &event).context("failed to serialize event")?;
        writeln!(out).context("failed to write event")?;
        out.flush().context("failed to flush output")?;

        if event.is_terminal() {
            outcome = if event.is_error() {
                Outcome::Failed
            } else {
                Outcome::Resolved
            };
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use quill_core::history::MemoryHistory;
    use quill_pipeline::{Collaborators, EditRequest, Pipeline, PipelineConfig};
    use quill_test::fixture::{FOX_DOCUMENT, dog_plan, fox_insert_plan};
    use quill_test::{FailingCollaborator, StaticDocumentStore};
    use uuid::Uuid;

    use super::*;

    fn pipeline() -> Pipeline {
        let unused = Arc::new(FailingCollaborator::new("offline"));
        let collaborators = Collaborators {
            planner: unused.clone(),
            fixer: unused.clone(),
            arbiter: unused,
            documents: Arc::new(StaticDocumentStore::new(FOX_DOCUMENT)),
            history: Arc::new(MemoryHistory::new()),
        };
        Pipeline::new(collaborators, PipelineConfig::default()).unwrap()
    }

    fn request() -> EditRequest {
        EditRequest::new(Uuid::now_v7(), Uuid::now_v7(), "add a verb")
    }

    #[tokio::test]
    async fn one_json_line_per_event() {
        let events = pipeline().run_with_plan(request(), fox_insert_plan());
        let mut out = Vec::new();

        let outcome = write_events(events, &mut out).await.unwrap();
        assert_eq!(outcome, Outcome::Resolved);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert!(lines.len() > 1);
        assert!(lines[..lines.len() - 1]
            .iter()
            .all(|line| line["event"] == "status"));
        assert_eq!(lines[lines.len() - 1]["event"], "result");
    }

    #[tokio::test]
    async fn error_event_fails_the_run() {
        let events = pipeline().run_with_plan(request(), dog_plan());
        let mut out = Vec::new();

        let outcome = write_events(events, &mut out).await.unwrap();
        assert_eq!(outcome, Outcome::Failed);

        let text = String::from_utf8(out).unwrap();
        let last: serde_json::Value = serde_json::from_str(text.lines().last().unwrap()).unwrap();
        assert_eq!(last["event"], "error");
    }
}
