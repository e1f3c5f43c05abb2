//! Async batch dispatch - concurrent future-based processing
//!
//! Counterpart to the thread-pool [`Dispatcher`](crate::core::Dispatcher)
//! for processors that are themselves async (e.g. remote inference calls).
//! Items are driven concurrently up to the configured bound and collected
//! back into input order.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::cancel::CancelToken;
use crate::core::types::{BatchResults, ItemError, ItemOutcome};
use crate::utils::error::{Result, RunnerError};

/// Configuration for async batch dispatch
#[derive(Debug, Clone)]
pub struct AsyncDispatchConfig {
    /// Maximum concurrent items (default: 10)
    pub concurrency: usize,
    /// Timeout per individual item (default: none)
    pub item_timeout: Option<Duration>,
}

impl Default for AsyncDispatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            item_timeout: None,
        }
    }
}

impl AsyncDispatchConfig {
    /// Create a new config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the concurrency bound
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set a timeout per item
    pub fn with_item_timeout(mut self, timeout: Duration) -> Self {
        self.item_timeout = Some(timeout);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(RunnerError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Async batch dispatcher for concurrent item processing
pub struct AsyncDispatcher {
    config: AsyncDispatchConfig,
}

impl AsyncDispatcher {
    /// Create a new async dispatcher
    pub fn new(config: AsyncDispatchConfig) -> Self {
        Self { config }
    }

    /// Current configuration
    pub fn config(&self) -> &AsyncDispatchConfig {
        &self.config
    }

    /// Execute a batch of async operations concurrently
    ///
    /// Returns outcomes in the same order as the input items; completion
    /// order is unspecified. Operation errors and timeouts are captured per
    /// item and never abort the batch.
    pub async fn execute<P, T, E, F, Fut>(
        &self,
        items: impl IntoIterator<Item = P>,
        operation: F,
    ) -> Result<BatchResults<T>>
    where
        P: Send + 'static,
        T: Send + 'static,
        E: fmt::Display,
        F: Fn(P) -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send,
    {
        self.execute_inner(items, operation, None).await
    }

    /// Like [`execute`](Self::execute), with cooperative cancellation
    ///
    /// Items not yet started when `token` is cancelled never launch; the run
    /// then fails with [`RunnerError::Incomplete`] naming their indices.
    pub async fn execute_with_token<P, T, E, F, Fut>(
        &self,
        items: impl IntoIterator<Item = P>,
        operation: F,
        token: &CancelToken,
    ) -> Result<BatchResults<T>>
    where
        P: Send + 'static,
        T: Send + 'static,
        E: fmt::Display,
        F: Fn(P) -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send,
    {
        self.execute_inner(items, operation, Some(token.clone()))
            .await
    }

    async fn execute_inner<P, T, E, F, Fut>(
        &self,
        items: impl IntoIterator<Item = P>,
        operation: F,
        token: Option<CancelToken>,
    ) -> Result<BatchResults<T>>
    where
        P: Send + 'static,
        T: Send + 'static,
        E: fmt::Display,
        F: Fn(P) -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send,
    {
        self.config.validate()?;

        let batch_id = Uuid::new_v4();
        let started_at = Utc::now();
        let started = Instant::now();
        let indexed: Vec<(usize, P)> = items.into_iter().enumerate().collect();
        let total = indexed.len();

        if total == 0 {
            return Ok(BatchResults::new(
                batch_id,
                Vec::new(),
                started_at,
                started.elapsed(),
            ));
        }

        let concurrency = self.config.concurrency;
        let item_timeout = self.config.item_timeout;
        debug!(%batch_id, total, concurrency, "dispatching async batch");

        let mut collected: Vec<(usize, Option<ItemOutcome<T>>)> = stream::iter(indexed)
            .map(|(index, item)| {
                let op = operation.clone();
                let token = token.clone();

                async move {
                    if token.is_some_and(|t| t.is_cancelled()) {
                        return (index, None);
                    }

                    let item_started = Instant::now();
                    let result = match item_timeout {
                        Some(limit) => match tokio::time::timeout(limit, op(item)).await {
                            Ok(inner) => inner.map_err(|e| ItemError::processor(e.to_string())),
                            Err(_) => Err(ItemError::timeout(format!(
                                "item {} timed out after {:?}",
                                index, limit
                            ))),
                        },
                        None => op(item).await.map_err(|e| ItemError::processor(e.to_string())),
                    };

                    if let Err(error) = &result {
                        warn!(%batch_id, index, %error, "async item failed");
                    }

                    (
                        index,
                        Some(ItemOutcome {
                            index,
                            result,
                            duration: item_started.elapsed(),
                        }),
                    )
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        // Restore input order before handing results back.
        collected.sort_by_key(|(index, _)| *index);

        let mut outcomes = Vec::with_capacity(total);
        let mut unresolved = Vec::new();
        for (index, slot) in collected {
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
                "async batch cancelled before completion"
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
            "async batch completed"
        );
        Ok(results)
    }
}

impl Default for AsyncDispatcher {
    fn default() -> Self {
        Self::new(AsyncDispatchConfig::default())
    }
}

/// Convenience function for one-off batch execution without an explicit dispatcher
pub async fn execute_batch<P, T, E, F, Fut>(
    items: impl IntoIterator<Item = P>,
    operation: F,
    config: Option<AsyncDispatchConfig>,
) -> Result<BatchResults<T>>
where
    P: Send + 'static,
    T: Send + 'static,
    E: fmt::Display,
    F: Fn(P) -> Fut + Send + Sync + Clone + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send,
{
    let dispatcher = AsyncDispatcher::new(config.unwrap_or_default());
    dispatcher.execute(items, operation).await
}
