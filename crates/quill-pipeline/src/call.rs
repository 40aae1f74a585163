//! Bounded collaborator calls.

use std::future::Future;
use std::time::Duration;

use quill_core::{Error, Result, Role};

/// Tracing target for collaborator calls.
pub const TRACING_TARGET: &str = "quill_pipeline::call";

/// Awaits a collaborator call, failing with [`Error::Timeout`] after `limit`.
///
/// A timeout is reported exactly like any other collaborator failure.
pub async fn call<T, F>(role: Role, limit: Duration, future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => {
            if let Err(error) = &result {
                tracing::warn!(target: TRACING_TARGET, %role, %error, "collaborator call failed");
            }
            result
        }
        Err(_) => {
            tracing::warn!(
                target: TRACING_TARGET,
                %role,
                limit_ms = limit.as_millis() as u64,
                "collaborator call timed out"
            );
            Err(Error::timeout(role, limit))
        }
    }
}
