//! Error types for serve-bench-core

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Coarse classification of a failed request
///
/// Kept next to the human-readable message so callers can branch on the
/// cause without parsing strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request exceeded its time budget
    Timeout,
    /// The backend could not be reached
    ConnectionRefused,
    /// Non-2xx status or a body that could not be decoded
    Protocol,
    /// Anything else
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Timeout => write!(f, "timeout"),
            ErrorKind::ConnectionRefused => write!(f, "connection_refused"),
            ErrorKind::Protocol => write!(f, "protocol"),
            ErrorKind::Other => write!(f, "other"),
        }
    }
}

/// Errors produced by an [`InferenceClient`](crate::traits::InferenceClient)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Request timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// TCP connect failed or the peer refused the connection
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    /// Backend answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body (may be empty)
        body: String,
    },

    /// Response body was not the expected JSON shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Any other transport failure
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Timeout(_) => ErrorKind::Timeout,
            ClientError::ConnectionRefused(_) => ErrorKind::ConnectionRefused,
            ClientError::Status { .. } | ClientError::MalformedResponse(_) => ErrorKind::Protocol,
            ClientError::Other(_) => ErrorKind::Other,
        }
    }
}

/// Core error type
#[derive(Debug, Error)]
pub enum BenchError {
    /// Invalid run configuration
    #[error("configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A builder was missing a required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

impl BenchError {
    /// Create a missing-field error
    pub fn missing_config(field: &'static str) -> Self {
        BenchError::MissingField(field)
    }
}

/// Result type alias
pub type BenchResult<T> = std::result::Result<T, BenchError>;
