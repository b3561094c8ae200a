//! `run` and `aggregate` command implementations

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use serve_bench_core::{OrchestratorBuilder, RunConfig, Summary};
use serve_bench_report::render_now;
use serve_bench_samplers::DatasetSource;
use serve_bench_storage::{aggregate_files, write_summary, write_text_report};
use serve_bench_vendors::OpenAiClient;

use super::{non_empty, AggregateArgs, ConsoleProgress, RunArgs};

/// Benchmark every backend; failure status when any backend was unhealthy
pub async fn run(args: RunArgs) -> Result<ExitCode> {
    let config = RunConfig::new(args.backends.0.clone(), args.params());
    let client = OpenAiClient::new().context("Failed to create HTTP client")?;
    let orchestrator = OrchestratorBuilder::new()
        .config(config)
        .client(Arc::new(client))
        .build()
        .context("Invalid benchmark configuration")?;

    let prompts = DatasetSource::new(&args.dataset_path)
        .with_fallback(args.dataset_url.clone(), args.default_dataset.clone())
        .load_prompts(args.num_prompts)
        .await
        .with_context(|| format!("Failed to load dataset from {}", args.dataset_path.display()))?;

    tracing::info!(prompts = prompts.len(), "Dataset ready");

    let summary = orchestrator.run(&prompts, &ConsoleProgress::new()).await;

    if let Some(path) = non_empty(args.output_file) {
        write_summary(&path, &summary)?;
        println!("\nResults saved to {}", display_path(&path));
    }

    if let Some(path) = non_empty(args.text_output_file) {
        write_report(&path, &summary)?;
        println!("Text report saved to {}", display_path(&path));
    }

    Ok(exit_code(&summary))
}

/// Combine stored summaries; any unreadable input aborts before writing
pub fn aggregate(args: AggregateArgs) -> Result<ExitCode> {
    let summary = aggregate_files(&args.dest, &args.inputs, args.params())
        .context("Aggregation failed")?;
    println!("Results saved to {}", display_path(&args.dest));

    if let Some(path) = non_empty(args.text_report) {
        write_report(&path, &summary)?;
        println!("Text report saved to {}", display_path(&path));
    }

    Ok(ExitCode::SUCCESS)
}

fn write_report(path: &Path, summary: &Summary) -> Result<()> {
    write_text_report(path, &render_now(summary))?;
    Ok(())
}

fn exit_code(summary: &Summary) -> ExitCode {
    if summary.all_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn display_path(path: &Path) -> String {
    std::fs::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}
