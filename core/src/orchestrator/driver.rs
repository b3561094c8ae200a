//! Health probe, dispatch and statistics for a single backend

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::Backend;
use crate::metrics::OutcomeStats;
use crate::request::RequestParams;
use crate::summary::BackendResult;
use crate::traits::{InferenceClient, ProgressSink};

use super::dispatcher::Dispatcher;

/// Runs one backend end to end and produces its [`BackendResult`]
#[derive(Clone)]
pub struct BackendDriver {
    client: Arc<dyn InferenceClient>,
    dispatcher: Dispatcher,
    health_timeout: Duration,
}

impl BackendDriver {
    /// Create a driver; the same client serves probes and requests
    pub fn new(
        client: Arc<dyn InferenceClient>,
        dispatcher: Dispatcher,
        health_timeout: Duration,
    ) -> Self {
        Self {
            client,
            dispatcher,
            health_timeout,
        }
    }

    /// Benchmark `backend` with every prompt in `prompts`
    ///
    /// An unhealthy backend gets no requests at all. For a healthy one,
    /// `duration_s` spans the whole batch from first dispatch to last outcome.
    pub async fn run(
        &self,
        backend: &Backend,
        prompts: Arc<[String]>,
        concurrency: usize,
        params: Arc<RequestParams>,
        progress: &dyn ProgressSink,
    ) -> BackendResult {
        let url = backend.normalized_url();

        if let Err(reason) = self.probe(url).await {
            tracing::warn!(backend = %backend.name, url, reason = %reason, "Health check failed");
            return BackendResult::unhealthy(
                &backend.name,
                format!("Health check failed at {url}/health"),
            );
        }

        let total_requests = prompts.len();
        let start = Instant::now();
        let dispatch = self.dispatcher.spawn(url, prompts, concurrency, params);
        let outcomes = dispatch
            .collect(|outcome| progress.request_completed(backend, outcome))
            .await;
        let duration = start.elapsed();

        if outcomes.len() != total_requests {
            tracing::error!(
                backend = %backend.name,
                expected = total_requests,
                received = outcomes.len(),
                "Missing outcomes, counting them as failures"
            );
        }

        BackendResult::Healthy(
            OutcomeStats::from_outcomes(&outcomes, total_requests, duration)
                .into_metrics(&backend.name, url),
        )
    }

    async fn probe(&self, url: &str) -> Result<(), String> {
        match tokio::time::timeout(self.health_timeout, self.client.health_check(url)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(e.to_string()),
            Err(_) => Err(format!("no response within {:?}", self.health_timeout)),
        }
    }
}

impl std::fmt::Debug for BackendDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendDriver")
            .field("dispatcher", &self.dispatcher)
            .field("health_timeout", &self.health_timeout)
            .finish()
    }
}
