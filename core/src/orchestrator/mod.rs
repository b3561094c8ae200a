//! Orchestration of a benchmark run
//!
//! Layering, leaves first:
//! - [`Dispatcher`] spawns a bounded worker pool for one backend and streams
//!   outcomes back in completion order
//! - [`BackendDriver`] probes a backend, dispatches the prompts, and turns the
//!   outcomes into a [`BackendResult`](crate::summary::BackendResult)
//! - [`Orchestrator`] runs the driver over every backend sequentially and
//!   assembles the [`Summary`](crate::summary::Summary)
//! - [`aggregate_summaries`] merges stored summaries without running anything
//!
//! # Example
//!
//! ```ignore
//! use serve_bench_core::{NoProgress, OrchestratorBuilder};
//!
//! let orchestrator = OrchestratorBuilder::new()
//!     .config(config)
//!     .client(client)
//!     .build()?;
//!
//! let summary = orchestrator.run(&prompts, &NoProgress).await;
//! std::process::exit(if summary.all_ok() { 0 } else { 1 });
//! ```

mod aggregator;
mod builder;
mod dispatcher;
mod driver;
mod executor;

pub use aggregator::aggregate_summaries;
pub use builder::OrchestratorBuilder;
pub use dispatcher::{effective_parallelism, Dispatch, Dispatcher};
pub use driver::BackendDriver;
pub use executor::Orchestrator;
