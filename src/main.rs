//! planrun — plan-and-execute agent runtime
//!
//! Usage:
//!   planrun "Add a todo to buy milk"
//!   planrun --model llama3.2 "Calculate (41*7)+13"
//!
//! Submits one prompt, waits for the run to reach a terminal state, and
//! prints the full run record as JSON. Requires a local Ollama server for
//! plan generation.

use anyhow::Context;
use clap::Parser;
use planrun_planner::OllamaPlanner;
use planrun_runtime::{ExecutorConfig, Runtime};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "planrun",
    about = "Convert a natural-language request into tool invocations and execute them",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// The natural-language request to plan and execute
    prompt: String,

    /// Ollama model used for plan generation
    #[arg(short, long, default_value = "gpt-oss")]
    model: String,

    /// Ollama chat endpoint
    #[arg(long, default_value = "http://localhost:11434/api/chat")]
    ollama_url: String,

    /// Total attempts per step, including the first
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    /// Delay before the first retry, in milliseconds
    #[arg(long, default_value_t = 1000)]
    initial_delay_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let planner = Arc::new(OllamaPlanner::new(&cli.model).with_base_url(&cli.ollama_url));
    let tools = planrun_tools::create_default_registry();
    let config = ExecutorConfig {
        max_attempts: cli.max_attempts,
        initial_delay: Duration::from_millis(cli.initial_delay_ms),
        ..Default::default()
    };
    let runtime = Runtime::new(planner, tools, config);

    let run_id = runtime.create_run(&cli.prompt);
    runtime.wait(&run_id).await;

    let run = runtime
        .get_run(&run_id)
        .await
        .context("run disappeared from store")?;
    println!("{}", serde_json::to_string_pretty(&run)?);
    Ok(())
}
