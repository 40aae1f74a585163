//! Orchestration of the resolution stages for one edit request.

use std::sync::Arc;

use jiff::Timestamp;
use quill_core::{
    ActionPlan, Arbiter, ConversationHistory, DocumentStore, Error, Fixer, HistoryKey,
    HistoryTurn, PlanRequest, Planner, Result, Role, Timing,
};
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::arbitrate::AmbiguityArbiter;
use crate::call::call;
use crate::compile::{PlanCompiler, reclassify};
use crate::config::PipelineConfig;
use crate::event::{Diagnostics, PipelineEvent, Stage, StageTiming};
use crate::locate::TextLocator;
use crate::repair::{DataflowCheck, LocationCheck, RepairController};
use crate::sanitize::sanitize_plan;
use crate::snapshot::Snapshot;
use crate::stream::EventStream;
use crate::validate::PlanValidator;

/// Tracing target for pipeline orchestration.
pub const TRACING_TARGET: &str = "quill_pipeline::pipeline";

/// A natural-language edit instruction for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
    /// Unique request ID.
    pub id: Uuid,

    /// User issuing the instruction.
    pub user_id: Uuid,

    /// Document to edit.
    pub document_id: Uuid,

    /// The instruction.
    pub message: String,
}

impl EditRequest {
    /// Creates a request with a fresh ID.
    pub fn new(user_id: Uuid, document_id: Uuid, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            document_id,
            message: message.into(),
        }
    }

    /// Returns the conversation-history key for this request.
    pub fn history_key(&self) -> HistoryKey {
        HistoryKey::new(self.user_id, self.document_id)
    }
}

/// External collaborators a pipeline is wired with.
#[derive(Clone)]
pub struct Collaborators {
    pub planner: Arc<dyn Planner>,
    pub fixer: Arc<dyn Fixer>,
    pub arbiter: Arc<dyn Arbiter>,
    pub documents: Arc<dyn DocumentStore>,
    pub history: Arc<dyn ConversationHistory>,
}

struct PipelineInner {
    collaborators: Collaborators,
    config: PipelineConfig,
}

/// Turns edit instructions into compiled operations.
///
/// Cheap to clone; every run is independent and shares nothing mutable.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

impl Pipeline {
    /// Creates a pipeline after validating its configuration.
    pub fn new(collaborators: Collaborators, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(PipelineInner {
                collaborators,
                config,
            }),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.inner.config
    }

    /// Runs a request from planning onward on a spawned task.
    ///
    /// Must be called within a tokio runtime.
    pub fn run(&self, request: EditRequest) -> EventStream {
        self.spawn(request, None)
    }

    /// Runs a request with a caller-supplied plan, skipping the planner.
    ///
    /// Must be called within a tokio runtime.
    pub fn run_with_plan(&self, request: EditRequest, plan: ActionPlan) -> EventStream {
        self.spawn(request, Some(plan))
    }

    fn spawn(&self, request: EditRequest, plan: Option<ActionPlan>) -> EventStream {
        let (tx, rx) = mpsc::channel(self.inner.config.event_buffer);
        let request_id = request.id;
        let inner = self.inner.clone();

        let span = tracing::info_span!(
            target: TRACING_TARGET,
            "edit_request",
            request_id = %request.id,
            document_id = %request.document_id,
        );

        tokio::spawn(
            async move {
                let mut run = Run::new(&inner, &request, tx);
                run.drive(plan).await;
            }
            .instrument(span),
        );

        EventStream::new(request_id, rx)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

/// Why a run stopped before its result.
enum Halt {
    /// The consumer dropped the stream.
    Cancelled,
    /// A stage failed terminally.
    Failed {
        stage: Stage,
        error: Error,
        diagnostics: Diagnostics,
    },
}

impl Halt {
    fn at(stage: Stage, diagnostics: Diagnostics) -> impl FnOnce(Error) -> Self {
        move |error| Self::Failed {
            stage,
            error,
            diagnostics,
        }
    }
}

/// State of one in-flight request.
struct Run<'a> {
    inner: &'a PipelineInner,
    request: &'a EditRequest,
    tx: mpsc::Sender<PipelineEvent>,
    timings: Vec<StageTiming>,
}

impl<'a> Run<'a> {
    fn new(
        inner: &'a PipelineInner,
        request: &'a EditRequest,
        tx: mpsc::Sender<PipelineEvent>,
    ) -> Self {
        Self {
            inner,
            request,
            tx,
            timings: Vec::new(),
        }
    }

    async fn drive(&mut self, plan: Option<ActionPlan>) {
        let started = Timestamp::now();

        let halt = match self.execute(plan).await {
            Ok(result) => {
                let operations = match &result {
                    PipelineEvent::Result { operations, .. } => operations.len(),
                    _ => 0,
                };
                if self.tx.send(result).await.is_err() {
                    tracing::info!(target: TRACING_TARGET, "consumer dropped before result");
                    return;
                }
                tracing::info!(
                    target: TRACING_TARGET,
                    operations,
                    elapsed_ms = Timing::since(started).elapsed_ms(),
                    "edit request resolved"
                );
                return;
            }
            Err(halt) => halt,
        };

        match halt {
            Halt::Cancelled => {
                tracing::info!(target: TRACING_TARGET, "consumer dropped, request cancelled");
            }
            Halt::Failed {
                stage,
                error,
                diagnostics,
            } => self.fail(stage, error, diagnostics).await,
        }
    }

    /// Single terminal-failure path: one history rejection, one error event.
    ///
    /// A consumer that already dropped the stream cancelled the request, so
    /// nothing is recorded.
    async fn fail(&self, stage: Stage, error: Error, diagnostics: Diagnostics) {
        if self.tx.is_closed() {
            tracing::info!(
                target: TRACING_TARGET,
                %stage,
                %error,
                "consumer dropped, request cancelled"
            );
            return;
        }

        tracing::error!(target: TRACING_TARGET, %stage, %error, "edit request failed");

        let history = &self.inner.collaborators.history;
        let key = self.request.history_key();
        match history
            .append(key, HistoryTurn::rejected(&self.request.message))
            .await
        {
            Ok(()) => tracing::info!(target: TRACING_TARGET, %key, "rejection recorded"),
            Err(history_error) => tracing::error!(
                target: TRACING_TARGET,
                %key,
                error = %history_error,
                "failed to record rejection"
            ),
        }

        let event = PipelineEvent::Error {
            stage,
            message: error.to_string(),
            diagnostics,
        };
        if self.tx.send(event).await.is_err() {
            tracing::debug!(target: TRACING_TARGET, "consumer dropped before error");
        }
    }

    async fn execute(
        &mut self,
        plan: Option<ActionPlan>,
    ) -> std::result::Result<PipelineEvent, Halt> {
        let inner = self.inner;
        let request = self.request;
        let config = &inner.config;
        let collaborators = &inner.collaborators;
        let message = request.message.as_str();
        let timeout = config.collaborator_timeout();

        // Planning
        let started = Timestamp::now();
        let text = collaborators
            .documents
            .plain_text(request.document_id)
            .await
            .map_err(Halt::at(Stage::Planning, Diagnostics::new()))?;
        let snapshot = Snapshot::new(text);

        let mut plan = match plan {
            Some(plan) => plan,
            None => {
                let plan_request = PlanRequest::new(message, snapshot.text());
                call(Role::Planner, timeout, collaborators.planner.plan(&plan_request))
                    .await
                    .map_err(Halt::at(Stage::Planning, Diagnostics::new()))?
            }
        };
        self.finish(Stage::Planning, started, &plan, Diagnostics::new())
            .await?;

        // Validation
        let started = Timestamp::now();
        let validation = PlanValidator.validate(&plan);
        let clean = validation.is_clean();
        self.finish(
            Stage::Validation,
            started,
            &plan,
            Diagnostics::new()
                .with_problems(validation.problems.clone())
                .with_warnings(validation.warnings),
        )
        .await?;

        let mut repairs = RepairController::new(
            collaborators.fixer.clone(),
            config.max_repair_attempts,
            timeout,
        );

        // Dataflow repair
        if !clean {
            let started = Timestamp::now();
            let repaired = repairs
                .repair(&DataflowCheck, message, snapshot.text(), plan)
                .await
                .map_err(Halt::at(
                    Stage::DataflowRepair,
                    Diagnostics::new().with_problems(validation.problems),
                ))?;
            plan = repaired.plan;
            self.finish(
                Stage::DataflowRepair,
                started,
                &plan,
                Diagnostics::new()
                    .with_attempts(repaired.attempts)
                    .with_warnings(repaired.report.warnings),
            )
            .await?;
        }

        // Sanitization
        let started = Timestamp::now();
        let changed = sanitize_plan(&mut plan, &snapshot);
        self.finish(
            Stage::Sanitization,
            started,
            &plan,
            Diagnostics::new().with_changed(changed),
        )
        .await?;

        // Location
        let started = Timestamp::now();
        let locator = TextLocator::new(config.fuzzy_threshold);
        let mut report = locator.locate(&snapshot, &plan.find_actions);
        self.finish(
            Stage::Location,
            started,
            &plan,
            Diagnostics::new()
                .with_problems(report.mistakes.clone())
                .with_ambiguities(report.ambiguities.clone())
                .with_positions(report.positions.clone()),
        )
        .await?;

        // Location repair
        if !report.is_clean() {
            let started = Timestamp::now();
            let check = LocationCheck::new(locator, &snapshot);
            let repaired = repairs
                .repair(&check, message, snapshot.text(), plan)
                .await
                .map_err(Halt::at(
                    Stage::LocationRepair,
                    Diagnostics::new().with_problems(report.mistakes),
                ))?;
            plan = repaired.plan;
            report = repaired.report.located;
            self.finish(
                Stage::LocationRepair,
                started,
                &plan,
                Diagnostics::new()
                    .with_attempts(repaired.attempts)
                    .with_ambiguities(report.ambiguities.clone())
                    .with_positions(report.positions.clone()),
            )
            .await?;
        }

        let mut positions = report.positions;

        // Arbitration
        if !report.ambiguities.is_empty() {
            let started = Timestamp::now();
            let arbiter = AmbiguityArbiter::new(
                collaborators.arbiter.clone(),
                timeout,
                config.context_radius,
            );
            let problems: Vec<_> = report
                .ambiguities
                .iter()
                .map(|ambiguity| ambiguity.to_problem())
                .collect();
            let chosen = arbiter
                .resolve(message, &plan, &snapshot, &report.ambiguities)
                .await
                .map_err(Halt::at(
                    Stage::Arbitration,
                    Diagnostics::new()
                        .with_problems(problems)
                        .with_ambiguities(report.ambiguities.clone()),
                ))?;
            positions.merge(chosen);
            self.finish(
                Stage::Arbitration,
                started,
                &plan,
                Diagnostics::new().with_positions(positions.clone()),
            )
            .await?;
        }

        // Reclassification
        let started = Timestamp::now();
        let changed = reclassify(&mut plan);
        self.finish(
            Stage::Reclassification,
            started,
            &plan,
            Diagnostics::new().with_changed(changed),
        )
        .await?;

        // Compilation
        let started = Timestamp::now();
        let positions = positions.finalize(&plan);
        let compilation = PlanCompiler::new(snapshot.char_len()).compile(&plan, &positions);
        self.finish(
            Stage::Compilation,
            started,
            &plan,
            Diagnostics::new()
                .with_positions(positions.clone())
                .with_skipped(compilation.skipped.clone()),
        )
        .await?;

        Ok(PipelineEvent::Result {
            plan,
            positions,
            operations: compilation.operations,
            skipped: compilation.skipped,
            timings: std::mem::take(&mut self.timings),
        })
    }

    /// Records a stage's timing and publishes its status event.
    async fn finish(
        &mut self,
        stage: Stage,
        started: Timestamp,
        plan: &ActionPlan,
        diagnostics: Diagnostics,
    ) -> std::result::Result<(), Halt> {
        self.timings.push(StageTiming::new(stage, Timing::since(started)));
        tracing::debug!(target: TRACING_TARGET, %stage, "stage finished");

        let event = PipelineEvent::Status {
            stage,
            plan: plan.clone(),
            diagnostics,
        };
        self.tx.send(event).await.map_err(|_| Halt::Cancelled)
    }
}
