//! Builder pattern for Orchestrator construction

use std::sync::Arc;

use crate::config::RunConfig;
use crate::error::{BenchError, BenchResult};
use crate::traits::InferenceClient;

use super::dispatcher::Dispatcher;
use super::driver::BackendDriver;
use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with a validated configuration
///
/// # Example
///
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new()
///     .config(config)
///     .client(Arc::new(OpenAiClient::new()?))
///     .build()?;
///
/// let summary = orchestrator.run(&prompts, &NoProgress).await;
/// ```
#[derive(Default)]
pub struct OrchestratorBuilder {
    config: Option<RunConfig>,
    client: Option<Arc<dyn InferenceClient>>,
}

impl OrchestratorBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the run configuration
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the inference client
    pub fn client(mut self, client: Arc<dyn InferenceClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if the config or client is not set, or if the
    /// configuration fails validation.
    pub fn build(self) -> BenchResult<Orchestrator> {
        let config = self
            .config
            .ok_or_else(|| BenchError::missing_config("config"))?;

        let client = self
            .client
            .ok_or_else(|| BenchError::missing_config("client"))?;

        config.validate()?;

        let dispatcher = Dispatcher::new(
            Arc::clone(&client),
            config.timeouts.request,
            config.channel,
        );
        let driver = BackendDriver::new(client, dispatcher, config.timeouts.health);

        Ok(Orchestrator::new(config, driver))
    }
}
