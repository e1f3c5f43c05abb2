//! # parallel-runner-rs
//!
//! A bounded concurrent batch dispatcher: run a caller-supplied processor
//! over an ordered collection of payloads (tables, requests, rows) on a
//! fixed-size worker pool, and get back an index-aligned set of per-item
//! outcomes.
//!
//! ## Features
//!
//! - **Bounded concurrency**: at most `max_workers` items execute at once;
//!   the rest queue until a slot frees
//! - **Per-item isolation**: processor errors (and panics, on the thread
//!   pool) are captured as typed failures without aborting the batch
//! - **Index-aligned results**: `results[i]` always corresponds to
//!   `inputs[i]`, regardless of completion order
//! - **Sync and async**: a scoped thread pool for blocking processors and a
//!   future-driven dispatcher for async ones
//! - **Cooperative cancellation**: un-started items are skipped and reported
//!   as unresolved, in-flight items finish
//! - **Keyed and chunked runs**: process named payloads into a keyed map, or
//!   split one large payload into chunks and concatenate the outputs
//!
//! ## Quick Start
//!
//! ```rust
//! use parallel_runner::{DispatchConfig, Dispatcher};
//!
//! let dispatcher = Dispatcher::new(DispatchConfig::new().with_max_workers(2));
//! let results = dispatcher
//!     .run(vec!["a", "b", "c"], |s| Ok::<_, String>(s.to_uppercase()))
//!     .unwrap();
//!
//! assert_eq!(results.len(), 3);
//! let values: Vec<String> = results.into_values().into_iter().map(|r| r.unwrap()).collect();
//! assert_eq!(values, vec!["A", "B", "C"]);
//! ```
//!
//! ## Async Dispatch
//!
//! ```rust
//! use parallel_runner::{AsyncDispatchConfig, AsyncDispatcher};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher = AsyncDispatcher::new(AsyncDispatchConfig::new().with_concurrency(5));
//! let results = dispatcher
//!     .execute(vec![1, 2, 3], |n| async move { Ok::<_, String>(n * 2) })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(results.succeeded(), 3);
//! # }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod core;
pub mod utils;

// Re-export main types
pub use crate::core::{
    AsyncDispatchConfig, AsyncDispatcher, BatchResults, BatchSummary, CancelToken, ChunkedResults,
    DEFAULT_MAX_WORKERS, DispatchConfig, Dispatcher, ItemError, ItemErrorKind, ItemOutcome,
    execute_batch, split_chunks,
};
pub use crate::utils::error::{Result, RunnerError};
pub use crate::utils::logging::init_logger;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
