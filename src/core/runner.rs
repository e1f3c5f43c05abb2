//! Higher-level run shapes over the thread-pool dispatcher
//!
//! Two entry points for the common "collection of tables" workloads: a keyed
//! run over named payloads, and a chunked run that splits one large payload
//! into roughly equal parts and concatenates the outputs.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::core::dispatcher::Dispatcher;
use crate::core::types::{ChunkedResults, ItemError};
use crate::utils::error::{Result, RunnerError};

impl Dispatcher {
    /// Run `processor` over a collection of keyed payloads
    ///
    /// Returns a map from each key to its item's outcome. Failures surface
    /// as typed `Err` entries; they never abort the other items.
    pub fn run_keyed<K, P, T, E, F>(
        &self,
        inputs: impl IntoIterator<Item = (K, P)>,
        processor: F,
    ) -> Result<HashMap<K, std::result::Result<T, ItemError>>>
    where
        K: Eq + Hash,
        P: Send,
        T: Send,
        E: fmt::Display,
        F: Fn(P) -> std::result::Result<T, E> + Sync,
    {
        let (keys, payloads): (Vec<K>, Vec<P>) = inputs.into_iter().unzip();
        let results = self.run(payloads, processor)?;

        Ok(keys
            .into_iter()
            .zip(results.into_items())
            .map(|(key, outcome)| (key, outcome.result))
            .collect())
    }

    /// Split `rows` into chunks, process each chunk, and concatenate outputs
    ///
    /// `n_splits` defaults to the configured worker count. Outputs keep chunk
    /// order; a failed chunk contributes no rows and is reported in
    /// [`ChunkedResults::failed_chunks`].
    pub fn run_chunked<P, T, E, F>(
        &self,
        rows: Vec<P>,
        n_splits: Option<usize>,
        processor: F,
    ) -> Result<ChunkedResults<T>>
    where
        P: Send,
        T: Send,
        E: fmt::Display,
        F: Fn(Vec<P>) -> std::result::Result<Vec<T>, E> + Sync,
    {
        let n_splits = n_splits.unwrap_or(self.config().max_workers);
        let chunks = split_chunks(rows, n_splits)?;
        let results = self.run(chunks, processor)?;

        let mut values = Vec::new();
        let mut failed_chunks = Vec::new();
        for outcome in results.into_items() {
            match outcome.result {
                Ok(mut chunk_rows) => values.append(&mut chunk_rows),
                Err(error) => failed_chunks.push((outcome.index, error)),
            }
        }

        Ok(ChunkedResults {
            values,
            failed_chunks,
        })
    }
}

/// Split `rows` into `n_splits` chunks of near-equal size, preserving order
///
/// The first `rows.len() % n_splits` chunks receive one extra element; when
/// `n_splits` exceeds the row count the trailing chunks are empty. Exactly
/// `n_splits` chunks are always returned.
pub fn split_chunks<P>(rows: Vec<P>, n_splits: usize) -> Result<Vec<Vec<P>>> {
    if n_splits == 0 {
        return Err(RunnerError::Config(
            "n_splits must be at least 1".to_string(),
        ));
    }

    let total = rows.len();
    let base = total / n_splits;
    let extra = total % n_splits;

    let mut chunks = Vec::with_capacity(n_splits);
    let mut rows = rows.into_iter();
    for i in 0..n_splits {
        let size = base + usize::from(i < extra);
        chunks.push(rows.by_ref().take(size).collect());
    }

    Ok(chunks)
}
