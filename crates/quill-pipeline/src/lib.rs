#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod arbitrate;
mod call;
pub mod compile;
mod config;
mod event;
pub mod locate;
mod pipeline;
mod position;
pub mod repair;
mod sanitize;
mod snapshot;
mod stream;
mod validate;

pub use arbitrate::{AmbiguityArbiter, NO_CANDIDATE};
pub use call::call;
pub use compile::{Compilation, CompileSkip, PlanCompiler, SkipReason};
pub use config::{PipelineConfig, PipelineConfigBuilder};
pub use event::{Diagnostics, PipelineEvent, Stage, StageTiming};
pub use locate::{Ambiguity, LocateReport, Located, TextLocator};
pub use pipeline::{Collaborators, EditRequest, Pipeline};
pub use position::PositionMap;
pub use repair::{RepairController, RepairState};
pub use sanitize::{sanitize_plan, strip_markup};
pub use snapshot::Snapshot;
pub use stream::EventStream;
pub use validate::{PlanValidator, Validation};

/// Tracing target for the main library.
pub const TRACING_TARGET: &str = "quill_pipeline";
