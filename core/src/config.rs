//! Run configuration types
//!
//! A [`RunConfig`] is assembled once at process start (from flags and
//! environment) and passed by reference into the orchestrator. Nothing in the
//! core reads global state.

use crate::channel::ChannelConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-request timeout applied to every chat completion
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for the liveness probe issued before any load is applied
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

/// One inference endpoint under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backend {
    /// Display name used in reports
    pub name: String,
    /// Base URL, e.g. `http://10.0.0.5:8000`
    pub url: String,
}

impl Backend {
    /// Create a new backend
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Base URL with trailing path separators removed
    pub fn normalized_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Run parameters recorded in every summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunParameters {
    /// Model identifier sent in every request
    pub model: String,
    /// Number of prompts requested for the run
    pub num_prompts: usize,
    /// Client-side concurrency per backend
    pub concurrency: usize,
    /// `max_tokens` sent in every request
    pub max_output_tokens: u32,
    /// Sampling temperature sent in every request
    pub temperature: f64,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            model: String::new(),
            num_prompts: 0,
            concurrency: 0,
            max_output_tokens: 0,
            temperature: 0.0,
        }
    }
}

/// Timeouts used by the backend driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Hard cap per chat completion request
    pub request: Duration,
    /// Cap for the health probe
    pub health: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: DEFAULT_REQUEST_TIMEOUT,
            health: DEFAULT_HEALTH_TIMEOUT,
        }
    }
}

/// Fully resolved benchmark configuration
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Backends in benchmark order
    pub backends: Vec<Backend>,
    /// Run parameters
    pub params: RunParameters,
    /// Request and probe timeouts
    pub timeouts: Timeouts,
    /// Outcome channel sizing
    pub channel: ChannelConfig,
}

impl RunConfig {
    /// Create a config with default timeouts and channel sizing
    pub fn new(backends: Vec<Backend>, params: RunParameters) -> Self {
        Self {
            backends,
            params,
            timeouts: Timeouts::default(),
            channel: ChannelConfig::default(),
        }
    }

    /// Override the timeouts
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.params.num_prompts == 0 {
            return Err(ConfigError::InvalidPromptCount(
                "num_prompts must be at least 1".into(),
            ));
        }

        if !self.params.temperature.is_finite() {
            return Err(ConfigError::InvalidTemperature(self.params.temperature));
        }

        for (idx, backend) in self.backends.iter().enumerate() {
            if backend.name.trim().is_empty() {
                return Err(ConfigError::InvalidBackend(format!(
                    "backend #{idx} has an empty name"
                )));
            }
            if backend.normalized_url().trim().is_empty() {
                return Err(ConfigError::InvalidBackend(format!(
                    "backend '{}' has an empty url",
                    backend.name
                )));
            }
        }

        if self.timeouts.request.is_zero() || self.timeouts.health.is_zero() {
            return Err(ConfigError::InvalidTimeout(
                "timeouts must be non-zero".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid prompt count
    #[error("Invalid prompt count: {0}")]
    InvalidPromptCount(String),

    /// Non-finite temperature
    #[error("Invalid temperature: {0}")]
    InvalidTemperature(f64),

    /// Backend entry is unusable
    #[error("Invalid backend: {0}")]
    InvalidBackend(String),

    /// Zero timeout
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> RunParameters {
        RunParameters {
            model: "llama-3-8b".into(),
            num_prompts: 100,
            concurrency: 8,
            max_output_tokens: 128,
            temperature: 0.0,
        }
    }

    #[test]
    fn test_normalized_url_strips_trailing_slashes() {
        let backend = Backend::new("vllm", "http://localhost:8000//");
        assert_eq!(backend.normalized_url(), "http://localhost:8000");

        let backend = Backend::new("sglang", "http://localhost:30000");
        assert_eq!(backend.normalized_url(), "http://localhost:30000");
    }

    #[test]
    fn test_default_timeouts() {
        let timeouts = Timeouts::default();
        assert_eq!(timeouts.request, Duration::from_secs(60));
        assert_eq!(timeouts.health, Duration::from_secs(3));
    }

    #[test]
    fn test_config_validation_valid() {
        let config = RunConfig::new(vec![Backend::new("a", "http://a")], params());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_concurrency_is_allowed() {
        let mut p = params();
        p.concurrency = 0;
        let config = RunConfig::new(vec![Backend::new("a", "http://a")], p);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_zero_prompts() {
        let mut p = params();
        p.num_prompts = 0;
        let config = RunConfig::new(vec![], p);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPromptCount(_))
        ));
    }

    #[test]
    fn test_config_validation_nan_temperature() {
        let mut p = params();
        p.temperature = f64::NAN;
        let config = RunConfig::new(vec![], p);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTemperature(_))
        ));
    }

    #[test]
    fn test_config_validation_empty_url() {
        let config = RunConfig::new(vec![Backend::new("a", "/")], params());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBackend(_))
        ));
    }

    #[test]
    fn test_backend_deserialization_ignores_extra_keys() {
        let json = r#"[{"name": "vllm", "url": "http://h:8000/", "gpu": "h100"}]"#;
        let backends: Vec<Backend> = serde_json::from_str(json).unwrap();
        assert_eq!(backends, vec![Backend::new("vllm", "http://h:8000/")]);
    }
}
