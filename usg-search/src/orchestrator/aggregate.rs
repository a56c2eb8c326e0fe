//! Core aggregator: one task per binding, merged through a channel.
//!
//! Completion protocol:
//!
//! 1. spawn one worker per binding, each holding a clone of the sender
//! 2. drop the original sender, so the channel closes exactly when the last
//!    worker has delivered (or died)
//! 3. drain the receiver until it closes
//! 4. join the workers; any that panicked are accounted for with an error item
//!
//! Dropping the aggregation future aborts every worker still running.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::binding::QueryBinding;
use crate::config::AggregatorConfig;
use crate::error::{BackendError, SearchError};
use crate::types::{Backend, SearchItem};

/// Runs query bindings concurrently and merges their items.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    config: AggregatorConfig,
}

impl Aggregator {
    /// Create an aggregator with the given configuration.
    pub fn new(config: AggregatorConfig) -> Self {
        Self { config }
    }

    /// Execute every binding concurrently and collect one item per binding.
    ///
    /// The returned items are in completion order, which is
    /// nondeterministic; dispatch on [`SearchItem::backend`] rather than on
    /// position. An empty `bindings` yields `Ok(vec![])`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::AllBackendsFailed`] only if **every** binding
    /// failed. Partial failures are reported inside the returned items.
    pub async fn handle_search(
        &self,
        bindings: Vec<QueryBinding>,
    ) -> Result<Vec<SearchItem>, SearchError> {
        let submitted = bindings.len();
        if submitted == 0 {
            return Ok(Vec::new());
        }

        // Capacity covers every worker, so sends never wait on the collector.
        let (tx, mut rx) = mpsc::channel::<SearchItem>(submitted);
        let deadline = self.config.deadline_seconds;

        let mut workers = Workers(
            bindings
                .into_iter()
                .map(|binding| {
                    let backend = binding.backend();
                    let tx = tx.clone();
                    let handle = tokio::spawn(async move {
                        let item = run_binding(binding, deadline).await;
                        if tx.send(item).await.is_err() {
                            tracing::debug!(%backend, "collector gone before delivery");
                        }
                    });
                    (backend, handle)
                })
                .collect(),
        );
        drop(tx);

        let mut items = Vec::with_capacity(submitted);
        while let Some(item) = rx.recv().await {
            items.push(item);
        }

        for (backend, handle) in &mut workers.0 {
            if let Err(err) = handle.await {
                tracing::error!(%backend, error = %err, "backend worker did not complete");
                items.push(SearchItem::failure(*backend, &BackendError::Panicked));
            }
        }

        let failed = items.iter().filter(|item| item.is_error()).count();
        tracing::debug!(submitted, failed, "aggregation complete");

        if failed == items.len() {
            let summary = items
                .iter()
                .map(|item| format!("{}: {}", item.backend, item.error.as_deref().unwrap_or("")))
                .collect::<Vec<_>>()
                .join("; ");
            tracing::warn!(submitted, "every search backend failed");
            return Err(SearchError::AllBackendsFailed(summary));
        }

        Ok(items)
    }
}

/// Spawned workers, aborted on drop so that a cancelled aggregation does not
/// leave backend calls running.
struct Workers(Vec<(Backend, JoinHandle<()>)>);

impl Drop for Workers {
    fn drop(&mut self) {
        for (_, handle) in &self.0 {
            handle.abort();
        }
    }
}

/// Execute bindings with the default configuration (no aggregator deadline).
///
/// # Errors
///
/// Same as [`Aggregator::handle_search`].
pub async fn handle_search(bindings: Vec<QueryBinding>) -> Result<Vec<SearchItem>, SearchError> {
    Aggregator::default().handle_search(bindings).await
}

async fn run_binding(binding: QueryBinding, deadline_seconds: Option<u64>) -> SearchItem {
    let Some(secs) = deadline_seconds else {
        return binding.execute().await;
    };

    let backend = binding.backend();
    match tokio::time::timeout(Duration::from_secs(secs), binding.execute()).await {
        Ok(item) => item,
        Err(_) => {
            let err = BackendError::Timeout(secs);
            tracing::warn!(%backend, error = %err, "backend exceeded aggregator deadline");
            SearchItem::failure(backend, &err)
        }
    }
}
