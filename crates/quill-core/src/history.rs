//! Conversation history primitives.
//!
//! The pipeline only ever appends one kind of turn: a rejection with an empty
//! plan, written when a request fails terminally. Appends for the same
//! (user, document) pair must not interleave, which [`KeyedHistory`]
//! guarantees for any inner store.

use std::collections::HashMap;
use std::sync::Arc;

use derive_more::Display;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::Result;
use crate::collaborator::ConversationHistory;
use crate::plan::ActionPlan;

/// Tracing target for history writes.
pub const TRACING_TARGET: &str = "quill_core::history";

/// Identifies one conversation log.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[display("{user_id}/{document_id}")]
pub struct HistoryKey {
    /// User who sent the edit request.
    pub user_id: Uuid,

    /// Document the request targets.
    pub document_id: Uuid,
}

impl HistoryKey {
    /// Creates a history key.
    pub fn new(user_id: Uuid, document_id: Uuid) -> Self {
        Self {
            user_id,
            document_id,
        }
    }
}

/// Outcome recorded for a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Accept,
    Reject,
}

/// One turn of the conversation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTurn {
    /// The user's instruction.
    pub message: String,

    /// The plan recorded for the turn.
    pub plan: ActionPlan,

    /// Whether the turn was accepted or rejected.
    pub decision: Decision,

    /// When the turn was recorded.
    pub created_at: Timestamp,
}

impl HistoryTurn {
    /// Creates a synthetic rejected turn with an empty plan.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            plan: ActionPlan::new(),
            decision: Decision::Reject,
            created_at: Timestamp::now(),
        }
    }
}

/// In-memory conversation history.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    turns: Mutex<HashMap<HistoryKey, Vec<HistoryTurn>>>,
}

impl MemoryHistory {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the turns recorded for `key`.
    pub async fn turns(&self, key: HistoryKey) -> Vec<HistoryTurn> {
        self.turns
            .lock()
            .await
            .get(&key)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns the total number of turns across all keys.
    pub async fn len(&self) -> usize {
        self.turns.lock().await.values().map(Vec::len).sum()
    }

    /// Returns true if no turn has been recorded.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl ConversationHistory for MemoryHistory {
    async fn append(&self, key: HistoryKey, turn: HistoryTurn) -> Result<()> {
        self.turns.lock().await.entry(key).or_default().push(turn);
        Ok(())
    }
}

#[async_trait::async_trait]
impl<H: ConversationHistory + ?Sized> ConversationHistory for Arc<H> {
    async fn append(&self, key: HistoryKey, turn: HistoryTurn) -> Result<()> {
        (**self).append(key, turn).await
    }
}

/// Serializes appends per [`HistoryKey`] in front of any history store.
///
/// Appends for different keys proceed concurrently. A key's lock is dropped
/// once no append for it is in flight.
pub struct KeyedHistory<H> {
    inner: H,
    locks: Mutex<HashMap<HistoryKey, Arc<Mutex<()>>>>,
}

impl<H> KeyedHistory<H> {
    /// Wraps an inner history store.
    pub fn new(inner: H) -> Self {
        Self {
            inner,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the inner store.
    pub fn inner(&self) -> &H {
        &self.inner
    }
}

#[async_trait::async_trait]
impl<H: ConversationHistory> ConversationHistory for KeyedHistory<H> {
    async fn append(&self, key: HistoryKey, turn: HistoryTurn) -> Result<()> {
        let lock = self.locks.lock().await.entry(key).or_default().clone();

        let result = {
            let _guard = lock.lock().await;
            tracing::debug!(target: TRACING_TARGET, %key, decision = ?turn.decision, "appending history turn");
            self.inner.append(key, turn).await
        };

        // Only the map and this call hold the lock: nobody is queued behind us.
        let mut locks = self.locks.lock().await;
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&key);
        }

        result
    }
}
