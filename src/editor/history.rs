//! Linear undo/redo history over snapshots.
//!
//! The store keeps a bounded list of snapshots and a cursor. The snapshot
//! under the cursor is the visible state. Committing while the cursor is
//! behind the end drops the redo branch; history never forks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::editor::collection::ElementCollection;

/// Default maximum number of snapshots to keep.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Immutable copy of an element collection plus what produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Elements as they were after the edit.
    pub elements: ElementCollection,

    /// Human-readable description of the edit.
    pub description: String,

    /// When the edit was committed.
    pub timestamp: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(elements: ElementCollection, description: impl Into<String>) -> Self {
        Self {
            elements,
            description: description.into(),
            timestamp: Utc::now(),
        }
    }

    /// Snapshot of the state a session starts from.
    pub fn initial(elements: ElementCollection) -> Self {
        Self::new(elements, "Initial state")
    }
}

/// Bounded snapshot history with a cursor.
///
/// Invariant: `cursor < snapshots.len()` and `snapshots` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHistory<T>", bound(deserialize = "T: Deserialize<'de>"))]
pub struct HistoryStore<T> {
    snapshots: Vec<T>,
    cursor: usize,
    capacity: usize,

    /// Total number of snapshots evicted by the capacity bound.
    #[serde(default)]
    evicted: usize,
}

impl<T> HistoryStore<T> {
    /// A history holding only `initial`, with the default capacity.
    pub fn new(initial: T) -> Self {
        Self::with_capacity(initial, DEFAULT_HISTORY_CAPACITY)
    }

    /// A history holding only `initial`. A zero capacity is raised to one.
    pub fn with_capacity(initial: T, capacity: usize) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            capacity: capacity.max(1),
            evicted: 0,
        }
    }

    /// Record `snapshot` as the new current state.
    ///
    /// Snapshots after the cursor are discarded, then the oldest ones are
    /// evicted until the capacity holds.
    #[must_use]
    pub fn commit(mut self, snapshot: T) -> Self {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(snapshot);
        self.cursor = self.snapshots.len() - 1;
        self.enforce_capacity();
        self
    }

    /// Step back one snapshot; no-op at the oldest one.
    #[must_use]
    pub fn undo(mut self) -> Self {
        if self.can_undo() {
            self.cursor -= 1;
        }
        self
    }

    /// Step forward one snapshot; no-op at the newest one.
    #[must_use]
    pub fn redo(mut self) -> Self {
        if self.can_redo() {
            self.cursor += 1;
        }
        self
    }

    /// The visible snapshot.
    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Always false; a history holds at least its initial snapshot.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn evicted(&self) -> usize {
        self.evicted
    }

    /// Oldest first.
    pub fn snapshots(&self) -> &[T] {
        &self.snapshots
    }

    /// Change the capacity.
    ///
    /// Shrinking evicts undo snapshots from the front first and then redo
    /// snapshots from the back. The current snapshot is never evicted, so
    /// `current()` is the same before and after.
    #[must_use]
    pub fn with_new_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self.enforce_capacity();
        self
    }

    fn enforce_capacity(&mut self) {
        if self.snapshots.len() <= self.capacity {
            return;
        }
        let overflow = self.snapshots.len() - self.capacity;
        let front = overflow.min(self.cursor);
        self.snapshots.drain(..front);
        self.cursor -= front;
        self.evicted += front;

        let back = overflow - front;
        if back > 0 {
            self.snapshots.truncate(self.snapshots.len() - back);
        }
        tracing::debug!(front, back, capacity = self.capacity, "evicted history snapshots");
    }
}

#[derive(Deserialize)]
struct RawHistory<T> {
    snapshots: Vec<T>,
    cursor: usize,
    capacity: usize,
    #[serde(default)]
    evicted: usize,
}

impl<T> TryFrom<RawHistory<T>> for HistoryStore<T> {
    type Error = String;

    fn try_from(raw: RawHistory<T>) -> std::result::Result<Self, Self::Error> {
        if raw.snapshots.is_empty() {
            return Err("history must hold at least one snapshot".to_string());
        }
        if raw.cursor >= raw.snapshots.len() {
            return Err(format!(
                "history cursor {} outside {} snapshots",
                raw.cursor,
                raw.snapshots.len()
            ));
        }
        let mut store = HistoryStore {
            snapshots: raw.snapshots,
            cursor: raw.cursor,
            capacity: raw.capacity.max(1),
            evicted: raw.evicted,
        };
        store.enforce_capacity();
        Ok(store)
    }
}
