//! HTTP transport for serve-bench
//!
//! Provides [`OpenAiClient`], the `InferenceClient` used against servers
//! that expose the OpenAI chat completions API (vLLM, SGLang, TGI, ...).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod openai;

pub use config::{ClientConfig, ConfigValidationError};
pub use openai::OpenAiClient;
