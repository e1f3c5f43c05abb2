//! Thread-pool batch dispatcher
//!
//! Runs a caller-supplied processor over an ordered sequence of payloads on
//! a fixed-size pool of worker threads. Results come back index-aligned with
//! the input regardless of completion order, and a failure for one item
//! never aborts the others.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use chrono::Utc;
use crossbeam::channel;
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::cancel::CancelToken;
use crate::core::config::DispatchConfig;
use crate::core::types::{BatchResults, ItemError, ItemOutcome};
use crate::utils::error::{Result, RunnerError};

/// Batch dispatcher backed by a per-run pool of scoped worker threads
///
/// The dispatcher is an explicitly constructed value with no process-wide
/// state: workers are spawned when `run` is called and joined before it
/// returns, so dropping the dispatcher leaks nothing.
pub struct Dispatcher {
    config: DispatchConfig,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new(config: DispatchConfig) -> Self {
        Self { config }
    }

    /// Create a dispatcher with the given worker bound
    pub fn with_max_workers(max_workers: usize) -> Self {
        Self::new(DispatchConfig::new().with_max_workers(max_workers))
    }

    /// Current configuration
    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Run `processor` over every input, returning index-aligned outcomes
    ///
    /// At most `max_workers` items execute concurrently. Processor errors
    /// and panics are captured per item; `run` itself fails only on invalid
    /// configuration.
    pub fn run<P, T, E, F>(&self, inputs: Vec<P>, processor: F) -> Result<BatchResults<T>>
    where
        P: Send,
        T: Send,
        E: fmt::Display,
        F: Fn(P) -> std::result::Result<T, E> + Sync,
    {
        self.run_inner(inputs, processor, None)
    }

    /// Like [`run`](Self::run), but checks `token` before launching each item
    ///
    /// After cancellation, un-started items never launch and in-flight items
    /// finish normally. If any item is left unresolved the run fails with
    /// [`RunnerError::Incomplete`] naming those indices.
    pub fn run_with_token<P, T, E, F>(
        &self,
        inputs: Vec<P>,
        processor: F,
        token: &CancelToken,
    ) -> Result<BatchResults<T>>
    where
        P: Send,
        T: Send,
        E: fmt::Display,
        F: Fn(P) -> std::result::Result<T, E> + Sync,
    {
        self.run_inner(inputs, processor, Some(token))
    }

    fn run_inner<P, T, E, F>(
        &self,
        inputs: Vec<P>,
        processor: F,
        token: Option<&CancelToken>,
    ) -> Result<BatchResults<T>>
    where
        P: Send,
        T: Send,
        E: fmt::Display,
        F: Fn(P) -> std::result::Result<T, E> + Sync,
    {
        self.config.validate()?;

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let started = Instant::now();
        let total = inputs.len();

        if total == 0 {
            return Ok(BatchResults::new(
                batch_id,
                Vec::new(),
                started_at,
                started.elapsed(),
            ));
        }

        let workers = self.config.max_workers.min(total);
        debug!(%batch_id, total, workers, "dispatching batch");

        // Queue sized to the batch, so feeding it never blocks.
        let (tx, rx) = channel::bounded(total);
        for pair in inputs.into_iter().enumerate() {
            tx.send(pair)
                .map_err(|_| RunnerError::Internal("work queue disconnected".to_string()))?;
        }
        drop(tx);

        // One slot per input index; each worker writes only the slots of the
        // items it consumed, so a slot is written at most once.
        let slots: Mutex<Vec<Option<ItemOutcome<T>>>> =
            Mutex::new((0..total).map(|_| None).collect());

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let rx = rx.clone();
                let slots = &slots;
                let processor = &processor;
                scope.spawn(move || {
                    while let Ok((index, payload)) = rx.recv() {
                        if token.is_some_and(|t| t.is_cancelled()) {
                            continue;
                        }

                        let item_started = Instant::now();
                        let result =
                            match panic::catch_unwind(AssertUnwindSafe(|| processor(payload))) {
                                Ok(Ok(value)) => Ok(value),
                                Ok(Err(error)) => Err(ItemError::processor(error.to_string())),
                                Err(payload) => {
                                    Err(ItemError::panic(panic_message(payload.as_ref())))
                                }
                            };

                        if let Err(error) = &result {
                            warn!(%batch_id, index, %error, "item failed");
                        }

                        slots.lock()[index] = Some(ItemOutcome {
                            index,
                            result,
                            duration: item_started.elapsed(),
                        });
                    }
                });
            }
        });

        let mut outcomes = Vec::with_capacity(total);
        let mut unresolved = Vec::new();
        for (index, slot) in slots.into_inner().into_iter().enumerate() {
            match slot {
                Some(outcome) => outcomes.push(outcome),
                None => unresolved.push(index),
            }
        }

        if !unresolved.is_empty() {
            info!(
                %batch_id,
                resolved = outcomes.len(),
                unresolved = unresolved.len(),
                "batch cancelled before completion"
            );
            return Err(RunnerError::Incomplete {
                resolved: outcomes.len(),
                unresolved,
            });
        }

        let results = BatchResults::new(batch_id, outcomes, started_at, started.elapsed());
        info!(
            %batch_id,
            total,
            succeeded = results.succeeded(),
            failed = results.failed(),
            "batch completed"
        );
        Ok(results)
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "processor panicked".to_string()
    }
}
