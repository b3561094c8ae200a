//! Worker execution loop

use crate::request::{ChatRequest, RequestParams};
use crate::response::RequestOutcome;
use crate::traits::InferenceClient;
use crate::ClientError;

use super::stats::WorkerStats;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// Worker executes requests in a loop: claim -> execute -> report -> repeat
///
/// Workers are tokio tasks spawned by the dispatcher. They share the client,
/// the prompt list and the cursor via Arc, and send outcomes through an mpsc
/// channel.
pub struct Worker {
    /// Worker identifier within its pool
    id: usize,

    /// Inference client (shared across workers via Arc)
    client: Arc<dyn InferenceClient>,

    /// Normalized backend base URL
    base_url: Arc<str>,

    /// Prompts for this run, in submission order
    prompts: Arc<[String]>,

    /// Shared cursor into `prompts`
    cursor: Arc<AtomicUsize>,

    /// Channel sender for outcomes
    outcomes_tx: mpsc::Sender<RequestOutcome>,

    /// Model and sampling parameters
    params: Arc<RequestParams>,

    /// Hard cap per request
    request_timeout: Duration,
}

impl Worker {
    /// Create a new worker
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        client: Arc<dyn InferenceClient>,
        base_url: Arc<str>,
        prompts: Arc<[String]>,
        cursor: Arc<AtomicUsize>,
        outcomes_tx: mpsc::Sender<RequestOutcome>,
        params: Arc<RequestParams>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            id,
            client,
            base_url,
            prompts,
            cursor,
            outcomes_tx,
            params,
            request_timeout,
        }
    }

    /// Run the worker loop until the prompt list is exhausted
    pub async fn run(self) -> WorkerStats {
        let mut stats = WorkerStats::new();
        stats.start();

        tracing::debug!(worker_id = self.id, base_url = %self.base_url, "Worker started");

        while let Some(index) = self.claim_next() {
            let outcome = self.execute_one(&self.prompts[index]).await;
            stats.record(&outcome);

            if let Some(failure) = &outcome.error {
                tracing::debug!(
                    worker_id = self.id,
                    prompt_index = index,
                    kind = %failure.kind,
                    error = %failure.message,
                    "Request failed"
                );
            }

            if self.outcomes_tx.send(outcome).await.is_err() {
                tracing::warn!(worker_id = self.id, "Outcome channel closed, worker stopping");
                break;
            }
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            completed = stats.completed,
            errors = stats.errors,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "Worker finished"
        );

        stats
    }

    /// Send one prompt and measure it
    ///
    /// Latency runs from just before the send to the full response, or to the
    /// failure point. A request still running at `request_timeout` is dropped
    /// and recorded as a timeout.
    async fn execute_one(&self, prompt: &str) -> RequestOutcome {
        let request = ChatRequest::for_prompt(&self.params, prompt);

        let start = Instant::now();
        let result = tokio::time::timeout(
            self.request_timeout,
            self.client.chat_completion(&self.base_url, &request),
        )
        .await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(Ok(usage)) => RequestOutcome::success(latency_ms, usage),
            Ok(Err(err)) => RequestOutcome::failure(latency_ms, err),
            Err(_) => {
                RequestOutcome::failure(latency_ms, ClientError::Timeout(self.request_timeout))
            }
        }
    }

    /// Claim the next prompt index, or `None` once every prompt is taken
    fn claim_next(&self) -> Option<usize> {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        (index < self.prompts.len()).then_some(index)
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("base_url", &self.base_url)
            .field("prompts", &self.prompts.len())
            .field("params", &self.params)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
