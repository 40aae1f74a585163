//! Pipeline configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use derive_builder::Builder;
use quill_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Tunables of the edit pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[cfg_attr(feature = "config", derive(Args))]
#[builder(
    name = "PipelineConfigBuilder",
    pattern = "owned",
    setter(into, prefix = "with"),
    build_fn(validate = "Self::validate_config")
)]
pub struct PipelineConfig {
    /// Repair attempts allowed per problem class.
    #[builder(default = "3")]
    #[cfg_attr(
        feature = "config",
        arg(long, env = "QUILL_MAX_REPAIR_ATTEMPTS", default_value_t = 3)
    )]
    pub max_repair_attempts: usize,

    /// Minimum fuzzy score (0-100) for a candidate to count as a match.
    #[builder(default = "90")]
    #[cfg_attr(
        feature = "config",
        arg(long, env = "QUILL_FUZZY_THRESHOLD", default_value_t = 90)
    )]
    pub fuzzy_threshold: u8,

    /// Upper bound on any single collaborator call, in seconds.
    #[builder(default = "60")]
    #[cfg_attr(
        feature = "config",
        arg(long, env = "QUILL_COLLABORATOR_TIMEOUT_SECS", default_value_t = 60)
    )]
    pub collaborator_timeout_secs: u64,

    /// Capacity of the event channel between pipeline task and consumer.
    #[builder(default = "32")]
    #[cfg_attr(
        feature = "config",
        arg(long, env = "QUILL_EVENT_BUFFER", default_value_t = 32)
    )]
    pub event_buffer: usize,

    /// Characters of surrounding text shown per arbitration candidate.
    #[builder(default = "40")]
    #[cfg_attr(
        feature = "config",
        arg(long, env = "QUILL_CONTEXT_RADIUS", default_value_t = 40)
    )]
    pub context_radius: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_repair_attempts: 3,
            fuzzy_threshold: 90,
            collaborator_timeout_secs: 60,
            event_buffer: 32,
            context_radius: 40,
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::default()
    }

    /// Returns the collaborator call timeout.
    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_secs(self.collaborator_timeout_secs)
    }

    /// Validates values that came from outside the builder (CLI, files).
    pub fn validate(&self) -> Result<()> {
        check(
            self.max_repair_attempts,
            self.fuzzy_threshold,
            self.collaborator_timeout_secs,
            self.event_buffer,
        )
        .map_err(Error::config)
    }
}

impl PipelineConfigBuilder {
    fn validate_config(&self) -> std::result::Result<(), String> {
        let defaults = PipelineConfig::default();
        check(
            self.max_repair_attempts
                .unwrap_or(defaults.max_repair_attempts),
            self.fuzzy_threshold.unwrap_or(defaults.fuzzy_threshold),
            self.collaborator_timeout_secs
                .unwrap_or(defaults.collaborator_timeout_secs),
            self.event_buffer.unwrap_or(defaults.event_buffer),
        )
    }
}

fn check(
    attempts: usize,
    threshold: u8,
    timeout_secs: u64,
    buffer: usize,
) -> std::result::Result<(), String> {
    if attempts == 0 {
        return Err("max_repair_attempts must be at least 1".to_string());
    }
    if !(1..=100).contains(&threshold) {
        return Err(format!("fuzzy_threshold must be in 1..=100, got {threshold}"));
    }
    if timeout_secs == 0 {
        return Err("collaborator_timeout_secs must be greater than 0".to_string());
    }
    if buffer == 0 {
        return Err("event_buffer must be at least 1".to_string());
    }
    Ok(())
}
