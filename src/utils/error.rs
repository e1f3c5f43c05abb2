//! Error handling for the parallel runner
//!
//! Errors in this crate split into two layers: `RunnerError` aborts a whole
//! `run` call (bad configuration, cancelled batch), while per-item failures
//! are captured as [`crate::core::ItemError`] values inside the result set
//! and never abort the batch.

use thiserror::Error;

/// Result type alias for the parallel runner
pub type Result<T> = std::result::Result<T, RunnerError>;

/// Errors that abort a dispatch run as a whole
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A cancelled run left items that never reached a terminal state
    #[error("Incomplete batch: {resolved} items resolved, unresolved indices {unresolved:?}")]
    Incomplete {
        /// Number of items that reached a terminal state
        resolved: usize,
        /// Indices of items that never started
        unresolved: Vec<usize>,
    },

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
