#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod offline;
mod output;
mod store;
mod telemetry;

use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use quill_core::ActionPlan;
use quill_core::history::{KeyedHistory, MemoryHistory};
use quill_pipeline::{Collaborators, EditRequest, Pipeline};
use quill_rig::{Agents, CompletionConfig};
use uuid::Uuid;

use crate::config::Cli;
use crate::offline::Offline;
use crate::output::{Outcome, write_events};
use crate::store::FsDocumentStore;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "quill_cli::startup";
pub const TRACING_TARGET_CONFIG: &str = "quill_cli::config";
pub const TRACING_TARGET_OUTPUT: &str = "quill_cli::output";

#[tokio::main]
async fn main() {
    let error = match run().await {
        Ok(Outcome::Resolved) => process::exit(0),
        Ok(Outcome::Failed) => anyhow::anyhow!("edit request ended with an error event"),
        Ok(Outcome::Interrupted) => anyhow::anyhow!("event stream ended without a terminal event"),
        Err(error) => error,
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            error = format!("{error:#}"),
            "edit request failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Runs one edit request and streams its events to stdout.
async fn run() -> anyhow::Result<Outcome> {
    let cli = Cli::init();

    telemetry::init_tracing(cli.log_format)?;
    log_startup_info();
    cli.log_config();

    let plan = match &cli.request.plan {
        Some(path) => Some(read_plan(path).await?),
        None => None,
    };

    let agents = create_agents(&cli.completion, plan.is_some())?;

    let user_id = cli.request.user_id.unwrap_or_else(Uuid::now_v7);
    let document_id = cli.request.document_id.unwrap_or_else(Uuid::now_v7);
    let documents = FsDocumentStore::new().with_document(document_id, &cli.request.document);
    let history = Arc::new(KeyedHistory::new(MemoryHistory::new()));

    let collaborators = Collaborators {
        planner: agents.planner,
        fixer: agents.fixer,
        arbiter: agents.arbiter,
        documents: Arc::new(documents),
        history: history.clone(),
    };
    let pipeline =
        Pipeline::new(collaborators, cli.pipeline.clone()).context("invalid pipeline configuration")?;

    let request = EditRequest::new(user_id, document_id, cli.request.message.clone());
    let history_key = request.history_key();
    let events = match plan {
        Some(plan) => pipeline.run_with_plan(request, plan),
        None => pipeline.run(request),
    };

    let outcome = write_events(events, &mut std::io::stdout().lock()).await?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        outcome = ?outcome,
        rejections = history.inner().turns(history_key).await.len(),
        "edit request finished"
    );

    Ok(outcome)
}

/// Reads a JSON action plan from a file.
async fn read_plan(path: &Path) -> anyhow::Result<ActionPlan> {
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read plan {}", path.display()))?;

    serde_json::from_str(&json).with_context(|| format!("invalid plan {}", path.display()))
}

/// Connects the completion agents.
///
/// A supplied plan can run without an API key; any repair or arbitration the
/// plan needs then fails with a collaborator error.
fn create_agents(config: &CompletionConfig, has_plan: bool) -> anyhow::Result<Agents> {
    if has_plan && config.api_key.is_none() {
        tracing::warn!(
            target: TRACING_TARGET_CONFIG,
            "no API key set, running without a completion provider"
        );
        return Ok(Offline::agents());
    }

    Agents::connect(config).context("failed to create completion agents")
}

/// Logs startup information.
fn log_startup_info() {
    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        version = env!("CARGO_PKG_VERSION"),
        pid = process::id(),
        features = ?enabled_features(),
        "starting quill"
    );
}

/// Returns a list of enabled compile-time features.
fn enabled_features() -> Vec<&'static str> {
    [cfg!(feature = "dotenv").then_some("dotenv")]
        .into_iter()
        .flatten()
        .collect()
}
