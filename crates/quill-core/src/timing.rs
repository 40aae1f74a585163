//! Timing information for pipeline stages.
//!
//! This module provides the [`Timing`] struct for capturing start and end
//! timestamps of a stage.

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Timing information for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    /// When the operation started.
    pub started_at: Timestamp,
    /// When the operation ended.
    pub ended_at: Timestamp,
}

impl Timing {
    /// Create a new timing with the given start and end timestamps.
    pub fn new(started_at: Timestamp, ended_at: Timestamp) -> Self {
        Self {
            started_at,
            ended_at,
        }
    }

    /// Create a timing that started at `started_at` and ends now.
    pub fn since(started_at: Timestamp) -> Self {
        Self::new(started_at, Timestamp::now())
    }

    /// Get the duration of the operation.
    pub fn duration(&self) -> SignedDuration {
        self.ended_at.duration_since(self.started_at)
    }

    /// Get the duration in whole milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        self.duration().as_millis() as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timing_measures_between_timestamps() {
        let start = Timestamp::now();
        let duration = SignedDuration::from_millis(250);

        let timing = Timing::new(start, start + duration);

        assert_eq!(timing.started_at, start);
        assert_eq!(timing.duration(), duration);
        assert_eq!(timing.elapsed_ms(), 250);
    }

    #[test]
    fn timing_since_is_not_negative() {
        let timing = Timing::since(Timestamp::now());
        assert!(timing.elapsed_ms() >= 0);
    }
}
