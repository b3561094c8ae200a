//! Orchestrator execution logic

use std::sync::Arc;

use crate::config::RunConfig;
use crate::request::RequestParams;
use crate::summary::{BackendResult, Summary};
use crate::traits::ProgressSink;

use super::driver::BackendDriver;

/// Orchestrator runs every configured backend, one after another
///
/// Backends never overlap in time: each gets the whole client-side
/// concurrency budget for its own run.
pub struct Orchestrator {
    /// Validated run configuration
    pub(crate) config: RunConfig,

    /// Per-backend driver (shared client, dispatcher, probe timeout)
    pub(crate) driver: BackendDriver,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// Use `OrchestratorBuilder` for a validated construction.
    pub fn new(config: RunConfig, driver: BackendDriver) -> Self {
        Self { config, driver }
    }

    /// Get the run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every backend and assemble the summary
    ///
    /// The first `num_prompts` prompts are used. Unhealthy backends become
    /// degraded results and the run moves on; nothing here returns an error.
    /// Callers map [`Summary::all_ok`] to the process status.
    pub async fn run(&self, prompts: &[String], progress: &dyn ProgressSink) -> Summary {
        let params = &self.config.params;

        let take = params.num_prompts.min(prompts.len());
        if take < params.num_prompts {
            tracing::warn!(
                requested = params.num_prompts,
                available = prompts.len(),
                "Fewer prompts available than requested, using all of them"
            );
        }
        let prompts: Arc<[String]> = prompts[..take].into();
        let request_params = Arc::new(RequestParams::from(params));

        tracing::info!(
            backends = self.config.backends.len(),
            model = %params.model,
            prompts = take,
            concurrency = params.concurrency,
            "Starting benchmark"
        );

        let mut summary = Summary::new(params.clone());

        for backend in &self.config.backends {
            progress.backend_started(backend, prompts.len());
            tracing::info!(backend = %backend.name, url = backend.normalized_url(), "Running backend");

            let result = self
                .driver
                .run(
                    backend,
                    Arc::clone(&prompts),
                    params.concurrency,
                    Arc::clone(&request_params),
                    progress,
                )
                .await;

            match &result {
                BackendResult::Healthy(m) => tracing::info!(
                    backend = %m.backend,
                    duration_s = m.duration_s,
                    successful = m.successful_requests,
                    failed = m.failed_requests,
                    rps = m.request_throughput_rps,
                    p50_ms = m.p50_latency_ms,
                    p99_ms = m.p99_latency_ms,
                    "Backend finished"
                ),
                BackendResult::Unhealthy { backend, error } => {
                    tracing::warn!(backend = %backend, error = %error, "Backend skipped")
                }
            }

            progress.backend_finished(backend, &result);
            summary.results.push(result);
        }

        tracing::info!(
            all_ok = summary.all_ok(),
            failed_backends = summary.failures().count(),
            "Benchmark completed"
        );

        summary
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("driver", &self.driver)
            .finish()
    }
}
