//! Batch dispatch types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Classification of a captured per-item failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemErrorKind {
    /// The processor returned an error for this item
    Processor,
    /// The item exceeded the configured per-item timeout
    Timeout,
    /// The processor panicked while handling this item
    Panic,
}

/// Failure recorded for a single item
///
/// Captured at the worker/aggregator boundary so that per-item failures are
/// visible in the result set instead of aborting the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemError {
    /// Failure classification
    pub kind: ItemErrorKind,
    /// Error message
    pub message: String,
    /// Optional structured details
    pub details: Option<serde_json::Value>,
}

impl ItemError {
    /// Failure reported by the processor itself
    pub fn processor(message: impl Into<String>) -> Self {
        Self {
            kind: ItemErrorKind::Processor,
            message: message.into(),
            details: None,
        }
    }

    /// Failure caused by a per-item timeout
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: ItemErrorKind::Timeout,
            message: message.into(),
            details: None,
        }
    }

    /// Failure caused by a processor panic
    pub fn panic(message: impl Into<String>) -> Self {
        Self {
            kind: ItemErrorKind::Panic,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details to this failure
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl std::fmt::Display for ItemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ItemError {}

/// Outcome of an individual item in a batch
#[derive(Debug, Clone)]
pub struct ItemOutcome<T> {
    /// Index of the item in the original input sequence
    pub index: usize,
    /// The result (Ok or Err)
    pub result: std::result::Result<T, ItemError>,
    /// Time taken for this item
    pub duration: Duration,
}

/// Index-aligned collection of per-item outcomes
///
/// Invariant: `len()` equals the input length and `get(i)` is the outcome
/// for `inputs[i]`, regardless of the order in which items completed.
#[derive(Debug)]
pub struct BatchResults<T> {
    batch_id: Uuid,
    items: Vec<ItemOutcome<T>>,
    started_at: DateTime<Utc>,
    total_duration: Duration,
}

impl<T> BatchResults<T> {
    pub(crate) fn new(
        batch_id: Uuid,
        items: Vec<ItemOutcome<T>>,
        started_at: DateTime<Utc>,
        total_duration: Duration,
    ) -> Self {
        Self {
            batch_id,
            items,
            started_at,
            total_duration,
        }
    }

    /// Identifier assigned to this run
    pub fn batch_id(&self) -> Uuid {
        self.batch_id
    }

    /// Number of items in the batch
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True for an empty batch
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Outcome for the item at `index`
    pub fn get(&self, index: usize) -> Option<&ItemOutcome<T>> {
        self.items.get(index)
    }

    /// Iterate outcomes in index order
    pub fn iter(&self) -> impl Iterator<Item = &ItemOutcome<T>> {
        self.items.iter()
    }

    /// Iterate successful items as `(index, value)`
    pub fn successes(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().map(|v| (outcome.index, v)))
    }

    /// Iterate failed items as `(index, error)`
    pub fn failures(&self) -> impl Iterator<Item = (usize, &ItemError)> {
        self.items
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|e| (outcome.index, e)))
    }

    /// Number of successful items
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|o| o.result.is_ok()).count()
    }

    /// Number of failed items
    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }

    /// Consume into the underlying outcome vector
    pub fn into_items(self) -> Vec<ItemOutcome<T>> {
        self.items
    }

    /// Consume into per-item results, dropping timing metadata
    pub fn into_values(self) -> Vec<std::result::Result<T, ItemError>> {
        self.items.into_iter().map(|o| o.result).collect()
    }

    /// Summary statistics for this run
    pub fn summary(&self) -> BatchSummary {
        let total = self.items.len();
        let succeeded = self.succeeded();
        let avg_duration = if total > 0 {
            Duration::from_nanos((self.total_duration.as_nanos() / total as u128) as u64)
        } else {
            Duration::ZERO
        };

        BatchSummary {
            batch_id: self.batch_id,
            total,
            succeeded,
            failed: total - succeeded,
            total_duration: self.total_duration,
            avg_duration,
            started_at: self.started_at,
            completed_at: self.started_at
                + chrono::Duration::from_std(self.total_duration).unwrap_or_default(),
        }
    }
}

/// Summary of a dispatch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Identifier of the run
    pub batch_id: Uuid,
    /// Total items processed
    pub total: usize,
    /// Successful items
    pub succeeded: usize,
    /// Failed items
    pub failed: usize,
    /// Total wall-clock time for the run
    pub total_duration: Duration,
    /// Average time per item
    pub avg_duration: Duration,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the run completed
    pub completed_at: DateTime<Utc>,
}

/// Concatenated output of a chunked run
#[derive(Debug)]
pub struct ChunkedResults<T> {
    /// Rows from all successful chunks, concatenated in chunk order
    pub values: Vec<T>,
    /// Failed chunks as `(chunk index, error)`; these contribute no rows
    pub failed_chunks: Vec<(usize, ItemError)>,
}

impl<T> ChunkedResults<T> {
    /// True when every chunk succeeded
    pub fn is_complete(&self) -> bool {
        self.failed_chunks.is_empty()
    }
}
