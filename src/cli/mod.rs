//! CLI argument parsing and command dispatch

mod commands;
mod progress;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use serve_bench_core::{Backend, RunParameters};

pub use progress::ConsoleProgress;

#[derive(Parser, Debug)]
#[command(name = "serve-bench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Benchmark every backend and write the summary
    Run(RunArgs),
    /// Merge stored summaries into one
    Aggregate(AggregateArgs),
}

/// Backends as given in `BACKENDS_JSON`
#[derive(Debug, Clone, PartialEq)]
pub struct BackendList(pub Vec<Backend>);

#[derive(Args, Debug)]
pub struct RunArgs {
    /// JSON array of backends, e.g. '[{"name":"vllm","url":"http://localhost:8000"}]'
    #[arg(long, env = "BACKENDS_JSON", value_parser = parse_backends)]
    pub backends: BackendList,

    /// Model identifier sent in every request
    #[arg(long, env = "MODEL_ID")]
    pub model_id: String,

    /// Number of prompts sent to each backend
    #[arg(long, env = "NUM_PROMPTS")]
    pub num_prompts: usize,

    /// Requests in flight per backend
    #[arg(long, env = "CONCURRENCY")]
    pub concurrency: usize,

    /// ShareGPT-style JSON dataset
    #[arg(long, env = "DATASET_PATH")]
    pub dataset_path: PathBuf,

    /// Where to write the JSON summary (skipped when empty)
    #[arg(long, env = "OUTPUT_FILE")]
    pub output_file: Option<PathBuf>,

    /// Where to write the text report (skipped when empty)
    #[arg(long, env = "TEXT_OUTPUT_FILE")]
    pub text_output_file: Option<PathBuf>,

    /// `max_tokens` for every request
    #[arg(long, env = "MAX_OUTPUT_TOKENS", default_value_t = 128)]
    pub max_output_tokens: u32,

    /// Sampling temperature for every request
    #[arg(long, env = "TEMPERATURE", default_value_t = 0.0)]
    pub temperature: f64,

    /// URL the default dataset is fetched from when its local copy is corrupt
    #[arg(long, env = "DATASET_URL")]
    pub dataset_url: Option<String>,

    /// File name of the default dataset
    #[arg(long, env = "DEFAULT_DATASET")]
    pub default_dataset: Option<String>,
}

#[derive(Args, Debug)]
pub struct AggregateArgs {
    /// Destination for the combined summary
    pub dest: PathBuf,

    /// Stored summaries, combined in the given order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Also render the combined summary as a text report
    #[arg(long, value_name = "PATH")]
    pub text_report: Option<PathBuf>,

    /// Model recorded in the combined summary
    #[arg(long, env = "MODEL_ID", default_value = "")]
    pub model_id: String,

    /// Prompt count recorded in the combined summary
    #[arg(long, env = "NUM_PROMPTS", default_value = "0", value_parser = lenient::<usize>)]
    pub num_prompts: usize,

    /// Concurrency recorded in the combined summary
    #[arg(long, env = "CONCURRENCY", default_value = "0", value_parser = lenient::<usize>)]
    pub concurrency: usize,

    /// Max output tokens recorded in the combined summary
    #[arg(long, env = "MAX_OUTPUT_TOKENS", default_value = "0", value_parser = lenient::<u32>)]
    pub max_output_tokens: u32,

    /// Temperature recorded in the combined summary
    #[arg(long, env = "TEMPERATURE", default_value = "0.0", value_parser = lenient::<f64>)]
    pub temperature: f64,
}

impl RunArgs {
    /// Run parameters for the summary and the requests
    pub fn params(&self) -> RunParameters {
        RunParameters {
            model: self.model_id.clone(),
            num_prompts: self.num_prompts,
            concurrency: self.concurrency,
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }
}

impl AggregateArgs {
    /// Run parameters stamped onto the combined summary
    pub fn params(&self) -> RunParameters {
        RunParameters {
            model: self.model_id.clone(),
            num_prompts: self.num_prompts,
            concurrency: self.concurrency,
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
        }
    }
}

impl Cli {
    /// Execute the selected command
    pub async fn run(self) -> Result<ExitCode> {
        match self.command {
            Commands::Run(args) => commands::run(args).await,
            Commands::Aggregate(args) => commands::aggregate(args),
        }
    }
}

fn parse_backends(raw: &str) -> Result<BackendList, String> {
    serde_json::from_str::<Vec<Backend>>(raw)
        .map(BackendList)
        .map_err(|e| format!("expected a JSON array of {{\"name\", \"url\"}} objects: {e}"))
}

/// Parse a number, treating an empty string as the type's zero value
fn lenient<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr + Default,
    T::Err: std::fmt::Display,
{
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(T::default());
    }
    raw.parse().map_err(|e: T::Err| e.to_string())
}

/// Treat an empty path (e.g. `OUTPUT_FILE=`) as unset
pub(crate) fn non_empty(path: Option<PathBuf>) -> Option<PathBuf> {
    path.filter(|p| !p.as_os_str().is_empty())
}
