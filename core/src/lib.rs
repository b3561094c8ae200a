//! serve-bench-core: benchmark engine for LLM inference endpoints
//!
//! This crate holds everything that does not touch the network or the
//! filesystem directly:
//!
//! - Run configuration and the request/response wire types
//! - The `InferenceClient` and `ProgressSink` seams
//! - Bounded worker pool, backend driver and multi-backend orchestrator
//! - Percentile and throughput math
//! - The `Summary` document and aggregation of stored summaries

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod request;
pub mod response;
pub mod summary;
pub mod traits;
pub mod worker;

pub use channel::ChannelConfig;
pub use config::{Backend, ConfigError, RunConfig, RunParameters, Timeouts};
pub use error::*;
pub use metrics::{percentile, round2, OutcomeStats};
pub use orchestrator::{aggregate_summaries, Orchestrator, OrchestratorBuilder};
pub use request::*;
pub use response::*;
pub use summary::{BackendMetrics, BackendResult, ResultsDocument, Summary};
pub use traits::*;
pub use worker::{Worker, WorkerStats};

#[cfg(test)]
mod test_support;
