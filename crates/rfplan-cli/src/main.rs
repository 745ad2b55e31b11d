//! rfplan: run LOS predictions against the planner API from the terminal.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use rfplan::{
    HttpBackend, LosChart, LosPipeline, LosPredictionRequest, LosResponse, PlannerConfig,
    ProfileAligner, TaskOrchestrator,
};

/// Radio site planner command-line client
#[derive(Parser)]
#[command(name = "rfplan")]
#[command(about = "Submit LOS predictions and align their profiles", long_about = None)]
#[command(version)]
struct Cli {
    /// Planner configuration file (TOML)
    #[arg(long, global = true, env = "RFPLAN_CONFIG")]
    config: Option<PathBuf>,

    /// Planner API base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Delay between status polls, in milliseconds
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    /// Largest profile shift searched, in samples
    #[arg(long, global = true)]
    max_skew: Option<usize>,

    /// Point budget for aligned profile series
    #[arg(long, global = true)]
    max_points: Option<usize>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a LOS prediction and print the aligned chart as JSON
    Los {
        /// LOS request body (JSON)
        #[arg(long)]
        request: PathBuf,
    },

    /// Align a saved LOS response without contacting the API
    Align {
        /// LOS result body (JSON)
        #[arg(long)]
        response: PathBuf,
    },

    /// Query the status of a submitted job once
    Status {
        /// Job identifier returned at submission
        task_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    rfplan::logging::init_logging_with(match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    });

    let config = load_config(&cli)?;
    match cli.command {
        Commands::Los { request } => run_los(&config, &request).await,
        Commands::Align { response } => run_align(&config, &response),
        Commands::Status { task_id } => run_status(&config, &task_id).await,
    }
}

fn load_config(cli: &Cli) -> Result<PlannerConfig> {
    let mut config = match &cli.config {
        Some(path) => PlannerConfig::from_file(path)?,
        None => PlannerConfig::default(),
    };
    config.apply_env()?;

    if let Some(url) = &cli.api_url {
        config.api_url = url.clone();
    }
    if let Some(ms) = cli.poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(skew) = cli.max_skew {
        config.max_skew = skew;
    }
    if let Some(points) = cli.max_points {
        config.max_points = points;
    }

    config.validate()?;
    Ok(config)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_chart(chart: &LosChart) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(chart)?);
    Ok(())
}

async fn run_los(config: &PlannerConfig, path: &Path) -> Result<()> {
    let request: LosPredictionRequest = read_json(path)?;
    let mut pipeline = LosPipeline::from_config(config)?;

    let handle = pipeline.submit(&request).await?;
    tracing::info!(task_id = %handle.id(), "waiting for LOS result (Ctrl-C to cancel)");

    let watcher = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            watcher.cancel();
        }
    });

    let chart = pipeline
        .complete(&handle)
        .await
        .with_context(|| format!("LOS run {} ended in state {}", handle.id(), pipeline.state()))?;
    print_chart(&chart)
}

fn run_align(config: &PlannerConfig, path: &Path) -> Result<()> {
    let response: LosResponse = read_json(path)?;
    let aligner = ProfileAligner::new(config.align_config());
    let chart = LosChart::from_response(&aligner, None, response)?;
    print_chart(&chart)
}

async fn run_status(config: &PlannerConfig, task_id: &str) -> Result<()> {
    let backend = HttpBackend::from_config(config)?;
    let orchestrator = TaskOrchestrator::new(Arc::new(backend));
    let report = orchestrator.status(task_id).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
