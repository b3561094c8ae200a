//! Bounded worker pool for one backend run

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::channel::ChannelConfig;
use crate::request::RequestParams;
use crate::response::RequestOutcome;
use crate::traits::InferenceClient;
use crate::worker::{Worker, WorkerStats};

/// Number of workers for a run: `max(1, min(concurrency, prompts))`
pub fn effective_parallelism(concurrency: usize, prompts: usize) -> usize {
    concurrency.min(prompts).max(1)
}

/// Spawns a fixed pool of workers over a prompt list
///
/// Workers pull indices from a shared cursor, so at most `parallelism`
/// requests are in flight and every prompt is sent exactly once.
#[derive(Clone)]
pub struct Dispatcher {
    client: Arc<dyn InferenceClient>,
    request_timeout: Duration,
    channel: ChannelConfig,
}

impl Dispatcher {
    /// Create a dispatcher sharing `client` across every pool it spawns
    pub fn new(
        client: Arc<dyn InferenceClient>,
        request_timeout: Duration,
        channel: ChannelConfig,
    ) -> Self {
        Self {
            client,
            request_timeout,
            channel,
        }
    }

    /// Start the pool and return a handle over its outcomes
    pub fn spawn(
        &self,
        base_url: &str,
        prompts: Arc<[String]>,
        concurrency: usize,
        params: Arc<RequestParams>,
    ) -> Dispatch {
        let parallelism = effective_parallelism(concurrency, prompts.len());
        let (tx, rx) = mpsc::channel(self.channel.outcome_buffer);
        let cursor = Arc::new(AtomicUsize::new(0));
        let base_url: Arc<str> = Arc::from(base_url);

        tracing::debug!(
            base_url = %base_url,
            prompts = prompts.len(),
            parallelism,
            "Spawning worker pool"
        );

        let workers = (0..parallelism)
            .map(|id| {
                let worker = Worker::new(
                    id,
                    Arc::clone(&self.client),
                    Arc::clone(&base_url),
                    Arc::clone(&prompts),
                    Arc::clone(&cursor),
                    tx.clone(),
                    Arc::clone(&params),
                    self.request_timeout,
                );
                tokio::spawn(worker.run())
            })
            .collect();

        // Only workers hold senders now; the channel closes when the last one exits.
        drop(tx);

        Dispatch {
            outcomes: rx,
            workers,
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("request_timeout", &self.request_timeout)
            .field("channel", &self.channel)
            .finish()
    }
}

/// A running worker pool
pub struct Dispatch {
    outcomes: mpsc::Receiver<RequestOutcome>,
    workers: Vec<JoinHandle<WorkerStats>>,
}

impl Dispatch {
    /// Number of workers in the pool
    pub fn parallelism(&self) -> usize {
        self.workers.len()
    }

    /// Next outcome in completion order, `None` once every worker is done
    pub async fn next(&mut self) -> Option<RequestOutcome> {
        self.outcomes.recv().await
    }

    /// Drain every outcome, calling `on_outcome` as each one arrives, then
    /// join the workers
    pub async fn collect(
        mut self,
        mut on_outcome: impl FnMut(&RequestOutcome),
    ) -> Vec<RequestOutcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.next().await {
            on_outcome(&outcome);
            outcomes.push(outcome);
        }

        let mut stats = WorkerStats::new();
        for (worker_id, handle) in self.workers.into_iter().enumerate() {
            match handle.await {
                Ok(worker_stats) => stats.merge(&worker_stats),
                Err(e) => tracing::error!(worker_id, error = %e, "Worker task panicked"),
            }
        }

        tracing::debug!(
            completed = stats.completed,
            errors = stats.errors,
            "Worker pool drained"
        );

        outcomes
    }
}
