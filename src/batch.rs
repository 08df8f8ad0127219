//! Batch fan-out over a shared query engine.
//!
//! Queries in a batch are independent: they share an immutable index
//! through the engine and never block each other. The coordinator owns
//! a dedicated rayon pool so batch work cannot starve an application's
//! global pool.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{bounded, Receiver};
use rayon::prelude::*;
use tracing::debug;

use crate::engine::{MatchRecord, QueryEngine};
use crate::error::{Error, Result};

/// Cooperative cancellation flag, checked between queries.
///
/// Cloning shares the flag, so one handle can cancel a batch running
/// on other threads. Cancellation never corrupts state: queries that
/// already completed keep their results.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Outcome of one query in a batch.
///
/// Either a complete, internally consistent result set or an explicit
/// error; never a silently truncated set.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Position of the query in the input batch.
    pub query_id: usize,
    pub result: Result<Vec<MatchRecord>>,
}

/// Runs many queries against one engine on a dedicated thread pool.
pub struct BatchCoordinator {
    engine: Arc<QueryEngine>,
    pool: rayon::ThreadPool,
}

impl BatchCoordinator {
    /// Builds a pool sized by the engine's configured `worker_count`.
    pub fn new(engine: Arc<QueryEngine>) -> Result<Self> {
        let workers = engine.config().worker_count;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("namelink-batch-{i}"))
            .build()
            .map_err(|e| Error::InvalidArgument(format!("failed to start batch pool: {e}")))?;
        Ok(Self { engine, pool })
    }

    /// Runs every query and returns one outcome per input, in input
    /// order regardless of worker interleaving.
    ///
    /// A failed query is reported in place and never aborts the rest
    /// of the batch.
    pub fn run_batch(&self, queries: &[String]) -> Vec<BatchOutcome> {
        self.run_batch_with(queries, &CancellationToken::new(), None)
    }

    /// [`Self::run_batch`] with cooperative cancellation and an
    /// optional deadline, both checked at per-query granularity.
    /// Queries that had not started when the batch was cut off report
    /// [`Error::Cancelled`].
    pub fn run_batch_with(
        &self,
        queries: &[String],
        token: &CancellationToken,
        deadline: Option<Instant>,
    ) -> Vec<BatchOutcome> {
        let engine = &self.engine;
        let outcomes: Vec<BatchOutcome> = self.pool.install(|| {
            queries
                .par_iter()
                .enumerate()
                .map(|(query_id, query)| {
                    let cut_off = token.is_cancelled()
                        || deadline.is_some_and(|d| Instant::now() >= d);
                    let result = if cut_off {
                        Err(Error::Cancelled)
                    } else {
                        engine.query(query)
                    };
                    BatchOutcome { query_id, result }
                })
                .collect()
        });
        debug!(
            queries = queries.len(),
            failed = outcomes.iter().filter(|o| o.result.is_err()).count(),
            "batch complete"
        );
        outcomes
    }

    /// Streams outcomes as they complete, in completion order; the
    /// `query_id` ties each outcome back to its input.
    ///
    /// The channel is bounded at twice the worker count, so a slow
    /// consumer applies backpressure instead of buffering the whole
    /// batch in memory. Dropping the receiver stops the remaining
    /// producers.
    pub fn stream_batch(
        &self,
        queries: Vec<String>,
        token: CancellationToken,
    ) -> Receiver<BatchOutcome> {
        let (tx, rx) = bounded(self.pool.current_num_threads().max(1) * 2);
        let engine = Arc::clone(&self.engine);
        self.pool.spawn(move || {
            let _ = queries
                .into_par_iter()
                .enumerate()
                .try_for_each(|(query_id, query)| {
                    let result = if token.is_cancelled() {
                        Err(Error::Cancelled)
                    } else {
                        engine.query(&query)
                    };
                    tx.send(BatchOutcome { query_id, result })
                        .map_err(|_| ())
                });
        });
        rx
    }
}
