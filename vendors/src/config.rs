//! Transport configuration

use std::time::Duration;

use thiserror::Error;

/// Configuration validation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// A timeout value is out of acceptable range.
    #[error("invalid connect timeout: {0:?}")]
    InvalidTimeout(Duration),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(String),
}

/// Connection settings for [`OpenAiClient`](crate::OpenAiClient).
///
/// There is no overall request timeout here: the benchmark engine enforces
/// its own per-request and health-probe caps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// TCP connect timeout
    pub connect_timeout: Duration,

    /// Idle keep-alive connections kept per host
    pub pool_max_idle_per_host: usize,

    /// `User-Agent` header
    pub user_agent: String,
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            pool_max_idle_per_host: 256,
            user_agent: concat!("serve-bench/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the idle pool size per host.
    pub fn with_pool_max_idle_per_host(mut self, size: usize) -> Self {
        self.pool_max_idle_per_host = size;
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        // 100ms to 5m
        if self.connect_timeout < Duration::from_millis(100)
            || self.connect_timeout > Duration::from_secs(300)
        {
            return Err(ConfigValidationError::InvalidTimeout(self.connect_timeout));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.user_agent.starts_with("serve-bench/"));
    }

    #[test]
    fn test_connect_timeout_bounds() {
        let too_short = ClientConfig::default().with_connect_timeout(Duration::from_millis(10));
        assert_eq!(
            too_short.validate(),
            Err(ConfigValidationError::InvalidTimeout(Duration::from_millis(10)))
        );

        let too_long = ClientConfig::default().with_connect_timeout(Duration::from_secs(600));
        assert!(too_long.validate().is_err());
    }
}
