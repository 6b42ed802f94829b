//! Undo/redo history for the creator canvas.
//!
//! The log is a sequence of batches with a cursor on the last applied one.
//! Each batch holds one or more actions that undo and redo together. The
//! manager never touches editor state itself: `undo` hands back the batch
//! whose `before` states the caller restores, `redo` the batch whose
//! `after` states it reapplies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use thiserror::Error;

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum number of batches to keep.
pub const MAX_UNDO_HISTORY: usize = 50;

/// History errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to capture snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// What kind of edit an action records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Text,
    Drawing,
    Shape,
    Table,
    Image,
    Note,
}

/// A single reversible edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryAction {
    pub kind: ActionKind,
    /// Index of the page the edit happened on.
    pub page_index: usize,
    /// State to restore on undo.
    pub before: Value,
    /// State to reapply on redo.
    pub after: Value,
    /// Milliseconds since the UNIX epoch.
    pub timestamp: u64,
}

impl HistoryAction {
    /// Create an action stamped with the current time.
    pub fn new(kind: ActionKind, page_index: usize, before: Value, after: Value) -> Self {
        Self {
            kind,
            page_index,
            before,
            after,
            timestamp: now_millis(),
        }
    }

    /// Create an action from typed states.
    pub fn capture<T: Serialize + ?Sized>(
        kind: ActionKind,
        page_index: usize,
        before: &T,
        after: &T,
    ) -> Result<Self, HistoryError> {
        Ok(Self::new(
            kind,
            page_index,
            serde_json::to_value(before)?,
            serde_json::to_value(after)?,
        ))
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Actions that undo and redo as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryBatch {
    actions: Vec<HistoryAction>,
}

impl HistoryBatch {
    /// Group actions into one undo step.
    pub fn new(actions: Vec<HistoryAction>) -> Self {
        Self { actions }
    }

    /// A batch holding one action.
    pub fn single(action: HistoryAction) -> Self {
        Self {
            actions: vec![action],
        }
    }

    /// Actions in the order they were committed.
    pub fn actions(&self) -> &[HistoryAction] {
        &self.actions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HistoryAction> {
        self.actions.iter()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl From<Vec<HistoryAction>> for HistoryBatch {
    fn from(actions: Vec<HistoryAction>) -> Self {
        Self::new(actions)
    }
}

impl<'a> IntoIterator for &'a HistoryBatch {
    type Item = &'a HistoryAction;
    type IntoIter = std::slice::Iter<'a, HistoryAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// Collects the actions of one compound edit (e.g. a multi-item move).
#[derive(Debug, Default)]
pub struct BatchBuilder {
    actions: Vec<HistoryAction>,
}

impl BatchBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: HistoryAction) -> &mut Self {
        self.actions.push(action);
        self
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The finished batch, or `None` if nothing was pushed.
    pub fn finish(self) -> Option<HistoryBatch> {
        if self.actions.is_empty() {
            None
        } else {
            Some(HistoryBatch::new(self.actions))
        }
    }
}

/// Bounded undo/redo log.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    batches: VecDeque<HistoryBatch>,
    /// Number of batches currently applied. Batches at and past this index
    /// form the redo future.
    applied: usize,
    max_batches: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    /// Create a manager keeping [`MAX_UNDO_HISTORY`] batches.
    pub fn new() -> Self {
        Self::with_capacity(MAX_UNDO_HISTORY)
    }

    /// Create a manager keeping at most `max_batches` (at least one).
    pub fn with_capacity(max_batches: usize) -> Self {
        Self {
            batches: VecDeque::new(),
            applied: 0,
            max_batches: max_batches.max(1),
        }
    }

    /// Record a committed edit. Drops any redo future and evicts the
    /// oldest batch when over capacity.
    pub fn record(&mut self, batch: HistoryBatch) {
        let discarded = self.batches.len() - self.applied;
        if discarded > 0 {
            log::debug!("Discarding {} redo batch(es)", discarded);
            self.batches.truncate(self.applied);
        }

        self.batches.push_back(batch);
        self.applied += 1;

        if self.batches.len() > self.max_batches {
            self.batches.pop_front();
            self.applied -= 1;
            log::debug!("History full, evicted oldest batch");
        }
        log::debug!("Recorded batch {}/{}", self.applied, self.batches.len());
    }

    /// Record a single action as its own batch.
    pub fn record_action(&mut self, action: HistoryAction) {
        self.record(HistoryBatch::single(action));
    }

    /// Step back. Returns the batch whose `before` states should be restored.
    pub fn undo(&mut self) -> Option<&HistoryBatch> {
        if self.applied == 0 {
            return None;
        }
        self.applied -= 1;
        log::debug!("Undo to {}/{}", self.applied, self.batches.len());
        self.batches.get(self.applied)
    }

    /// Step forward. Returns the batch whose `after` states should be reapplied.
    pub fn redo(&mut self) -> Option<&HistoryBatch> {
        if self.applied >= self.batches.len() {
            return None;
        }
        self.applied += 1;
        log::debug!("Redo to {}/{}", self.applied, self.batches.len());
        self.batches.get(self.applied - 1)
    }

    /// The batch `undo` would return, without moving.
    pub fn peek_undo(&self) -> Option<&HistoryBatch> {
        self.applied.checked_sub(1).and_then(|i| self.batches.get(i))
    }

    /// The batch `redo` would return, without moving.
    pub fn peek_redo(&self) -> Option<&HistoryBatch> {
        self.batches.get(self.applied)
    }

    pub fn can_undo(&self) -> bool {
        self.applied > 0
    }

    pub fn can_redo(&self) -> bool {
        self.applied < self.batches.len()
    }

    /// Index of the last applied batch, `None` when nothing is applied.
    pub fn current_index(&self) -> Option<usize> {
        self.applied.checked_sub(1)
    }

    /// Number of stored batches (applied and redoable).
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn max_batches(&self) -> usize {
        self.max_batches
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.batches.clear();
        self.applied = 0;
    }
}
