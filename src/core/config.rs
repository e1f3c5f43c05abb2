//! Configuration for thread-pool dispatch runs

use serde::{Deserialize, Serialize};

use crate::utils::error::{Result, RunnerError};

/// Default worker count when none is configured
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// Configuration for a [`Dispatcher`](crate::core::Dispatcher)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Maximum number of concurrently executing workers (default: 4)
    pub max_workers: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

impl DispatchConfig {
    /// Create a new config
    pub fn new() -> Self {
        Self::default()
    }

    /// Size the pool to the number of available CPUs
    pub fn auto() -> Self {
        Self {
            max_workers: num_cpus::get().max(1),
        }
    }

    /// Set the worker bound
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Reject invalid configurations before any work is scheduled
    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(RunnerError::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
