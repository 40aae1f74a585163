//! Command-line configuration.
//!
//! ```text
//! Cli
//! ├── request: RequestArgs         # Document, instruction, optional plan
//! ├── completion: CompletionConfig # Provider, model, API key
//! ├── pipeline: PipelineConfig     # Repair attempts, thresholds, timeouts
//! └── log_format: LogFormat
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use quill_pipeline::PipelineConfig;
use quill_rig::CompletionConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "quill")]
#[command(about = "Resolve a natural-language edit into document operations")]
#[command(version)]
pub struct Cli {
    /// What to edit.
    #[clap(flatten)]
    pub request: RequestArgs,

    /// Completion provider for the planner, fixer and arbiter.
    #[clap(flatten)]
    pub completion: CompletionConfig,

    /// Pipeline tunables.
    #[clap(flatten)]
    pub pipeline: PipelineConfig,

    /// Log output format (logs are written to stderr).
    #[arg(long, env = "QUILL_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// The edit request to run.
#[derive(Debug, Clone, Args)]
pub struct RequestArgs {
    /// Plain-text document to edit.
    #[arg(long, short = 'd', env = "QUILL_DOCUMENT")]
    pub document: PathBuf,

    /// Natural-language edit instruction.
    #[arg(long, short = 'm')]
    pub message: String,

    /// JSON action plan to use instead of asking the planner.
    #[arg(long, short = 'p')]
    pub plan: Option<PathBuf>,

    /// User the conversation history is keyed by; random when omitted.
    #[arg(long, env = "QUILL_USER_ID")]
    pub user_id: Option<Uuid>,

    /// Document id the conversation history is keyed by; random when omitted.
    #[arg(long, env = "QUILL_DOCUMENT_ID")]
    pub document_id: Option<Uuid>,
}

/// Log output format.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl Cli {
    /// Loads `.env` (if enabled) and parses the command line.
    ///
    /// The `.env` file is read first so clap's `env` fallbacks see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Logs the effective configuration, without secrets.
    pub fn log_config(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            document = %self.request.document.display(),
            plan = ?self.request.plan,
            provider = %self.completion.provider,
            model = %self.completion.model,
            api_key_set = self.completion.api_key.is_some(),
            "request configuration"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            max_repair_attempts = self.pipeline.max_repair_attempts,
            fuzzy_threshold = self.pipeline.fuzzy_threshold,
            collaborator_timeout_secs = self.pipeline.collaborator_timeout_secs,
            event_buffer = self.pipeline.event_buffer,
            context_radius = self.pipeline.context_radius,
            "pipeline configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use quill_rig::ProviderKind;

    use super::*;

    #[test]
    fn parses_a_minimal_invocation() {
        let cli = Cli::try_parse_from([
            "quill",
            "--document",
            "notes.txt",
            "--message",
            "add a verb",
        ])
        .unwrap();

        assert_eq!(cli.request.document, PathBuf::from("notes.txt"));
        assert_eq!(cli.request.plan, None);
        assert_eq!(cli.pipeline, PipelineConfig::default());
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn parses_provider_and_pipeline_overrides() {
        let user_id = Uuid::now_v7();
        let cli = Cli::try_parse_from([
            "quill",
            "-d",
            "notes.txt",
            "-m",
            "drop the middle cat",
            "--provider",
            "anthropic",
            "--model",
            "claude-sonnet-4-5",
            "--max-repair-attempts",
            "5",
            "--user-id",
            &user_id.to_string(),
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.completion.provider, ProviderKind::Anthropic);
        assert_eq!(cli.completion.model, "claude-sonnet-4-5");
        assert_eq!(cli.pipeline.max_repair_attempts, 5);
        assert_eq!(cli.request.user_id, Some(user_id));
        assert_eq!(cli.log_format, LogFormat::Json);
    }

    #[test]
    fn message_is_required() {
        assert!(Cli::try_parse_from(["quill", "--document", "notes.txt"]).is_err());
    }
}
