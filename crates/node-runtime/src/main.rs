//! # Epichain Node
//!
//! Runs a standalone node until Ctrl+C, then persists the ledger.
//!
//! ```text
//! epi-node --solve prime-integer-factorization '{"o":242}'
//! ```
//!
//! Configuration comes from `EPI_*` environment variables; see
//! [`node_runtime::NodeConfig`]. Command-line flags take precedence.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use node_runtime::{NodeConfig, NodeRuntime};
use shared_bus::EventFilter;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Epichain node: solves problems and keeps the block tree
#[derive(Parser, Debug)]
#[command(name = "epi-node")]
#[command(about = "Standalone proof-of-useful-work ledger node")]
struct Args {
    /// Directory holding the persisted ledger (overrides EPI_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Queue a problem instance at startup; may be repeated
    #[arg(
        long = "solve",
        num_args = 2,
        value_names = ["PROBLEM", "PARAMETERS"],
        action = clap::ArgAction::Append
    )]
    solve: Vec<String>,
}

impl Args {
    /// `--solve` values as (problem, parameters) pairs.
    fn problems(&self) -> impl Iterator<Item = (&str, &str)> {
        self.solve
            .chunks_exact(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_thread_ids(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = NodeConfig::from_env().context("failed to load configuration")?;
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    let runtime = NodeRuntime::start(config).context("failed to start node")?;

    let mut events = runtime.subscribe(EventFilter::all());
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            info!(topic = ?event.topic(), "Ledger event: {:?}", event);
        }
    });

    for (problem, parameters) in args.problems() {
        runtime
            .solve_problem(problem, parameters)
            .context("failed to queue problem")?;
    }

    info!("Node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    tokio::task::spawn_blocking(move || runtime.shutdown())
        .await
        .context("shutdown task failed")?
        .context("node did not shut down cleanly")?;

    Ok(())
}
