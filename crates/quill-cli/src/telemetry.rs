//! Tracing initialization.

use std::io::{self, IsTerminal};

use anyhow::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogFormat;

/// Initializes the tracing subscriber, writing to stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info`:
///
/// ```bash
/// RUST_LOG=quill_pipeline=debug,quill_rig=trace quill ...
/// ```
///
/// # Errors
///
/// Returns an error if the filter is invalid or a subscriber is already set.
pub fn init_tracing(format: LogFormat) -> anyhow::Result<()> {
    let env_filter = create_env_filter()?;
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(true)
                    .with_ansi(io::stderr().is_terminal()),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_current_span(true),
            )
            .try_init(),
    };

    result.context("failed to initialize tracing")
}

fn create_env_filter() -> anyhow::Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to create env filter")
}
