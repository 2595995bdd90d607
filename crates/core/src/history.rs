//! Bin history: the per-bin state machine and its read snapshot.
//!
//! `BinHistory` is the pure core of a bin entity. It holds no locks and does
//! no IO; the registry wraps one instance per bin in a single-consumer task,
//! which is what makes the mutations here safe without internal
//! synchronization.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::record::RequestRecord;

/// Fixed-capacity, insertion-ordered request history for one bin.
#[derive(Debug, Clone)]
pub struct BinHistory {
    records: VecDeque<RequestRecord>,
    max_size: usize,
}

impl BinHistory {
    /// Create an empty history with the given capacity.
    ///
    /// `max_size` is clamped to at least 1; a zero-capacity bin could never
    /// hold the record just appended.
    pub fn new(max_size: usize) -> Self {
        let max_size = max_size.max(1);
        Self {
            records: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Append a record, evicting from the front while over capacity.
    ///
    /// Returns the number of records evicted (0 or 1 for single appends).
    pub fn append(&mut self, record: RequestRecord) -> usize {
        self.records.push_back(record);
        let mut evicted = 0;
        while self.records.len() > self.max_size {
            self.records.pop_front();
            evicted += 1;
        }
        evicted
    }

    /// Reset to empty. Idempotent; capacity is retained.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Configured capacity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Owned snapshot of the current state, oldest record first.
    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot {
            records: self.records.iter().cloned().collect(),
            max_size: self.max_size,
        }
    }
}

/// Owned, immutable view of a bin's history at one point in time.
///
/// Snapshots share no state with the live bin: once taken they never change,
/// no matter what the bin does next.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Retained records, oldest first.
    pub records: Vec<RequestRecord>,
    /// The bin's configured capacity at snapshot time.
    pub max_size: usize,
}

impl HistorySnapshot {
    /// Empty snapshot for a bin that has never been written.
    pub fn empty(max_size: usize) -> Self {
        Self {
            records: Vec::new(),
            max_size,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
