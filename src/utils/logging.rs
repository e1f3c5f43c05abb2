//! Logging setup for the parallel runner

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::utils::error::{Result, RunnerError};

/// Initialize the global tracing subscriber
///
/// Honors `RUST_LOG` when set; otherwise falls back to the given level
/// (or `INFO`). Fails if a subscriber is already installed.
pub fn init_logger(level: Option<Level>) -> Result<()> {
    let level = level.unwrap_or(Level::INFO);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| RunnerError::Internal(format!("Failed to initialize logger: {e}")))
}
