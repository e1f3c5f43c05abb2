//! Utility modules for the parallel runner
//!
//! - **error**: Error handling and the crate-wide `Result` alias
//! - **logging**: Tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{Result, RunnerError};
