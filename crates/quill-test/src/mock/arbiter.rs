//! Scripted arbiter.

use std::collections::VecDeque;
use std::sync::Mutex;

use quill_core::{Arbiter, ArbitrationRequest, Error, Result, Role};

use super::lock;

/// Arbiter that answers from a queue of candidate indices.
///
/// Running out of answers is reported as a collaborator failure.
#[derive(Debug)]
pub struct ScriptedArbiter {
    answers: Mutex<VecDeque<i64>>,
    requests: Mutex<Vec<ArbitrationRequest>>,
}

impl ScriptedArbiter {
    /// Creates an arbiter answering with `answers` in order.
    pub fn new(answers: impl IntoIterator<Item = i64>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<ArbitrationRequest> {
        lock(&self.requests).clone()
    }

    /// Returns the number of calls received so far.
    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }
}

#[async_trait::async_trait]
impl Arbiter for ScriptedArbiter {
    async fn choose(&self, request: &ArbitrationRequest) -> Result<i64> {
        lock(&self.requests).push(request.clone());

        lock(&self.answers)
            .pop_front()
            .ok_or_else(|| Error::collaborator(Role::Arbiter, "script exhausted"))
    }
}
