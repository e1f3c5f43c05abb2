//! Core batch dispatch components
//!
//! This module provides the thread-pool and async dispatchers along with
//! their shared result, configuration, and cancellation types.

mod async_dispatch;
mod cancel;
mod config;
mod dispatcher;
mod runner;
mod types;


// Re-export all public types
pub use async_dispatch::{AsyncDispatchConfig, AsyncDispatcher, execute_batch};
pub use cancel::CancelToken;
pub use config::{DEFAULT_MAX_WORKERS, DispatchConfig};
pub use dispatcher::Dispatcher;
pub use runner::split_chunks;
pub use types::{
    BatchResults, BatchSummary, ChunkedResults, ItemError, ItemErrorKind, ItemOutcome,
};
