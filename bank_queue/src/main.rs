//! Bank queue console simulation
//!
//! Serves a batch of customers VIP-first and prints the totals.
//!
//! Usage:
//!   cargo run --bin bank_queue -- --config bank.toml --pace-ms 500

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bank_queue::config::{self, SimulationConfig};
use bank_queue::driver::SimulationDriver;
use bank_queue::queue::Strategy;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(about = "Serve a batch of bank customers, VIPs first")]
struct Args {
    /// TOML file with the customer batch; the built-in sample is used otherwise
    #[arg(short, long, env = "BANK_QUEUE_CONFIG")]
    config: Option<PathBuf>,
    /// Pause between services in milliseconds
    #[arg(long)]
    pace_ms: Option<u64>,
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    config::configure_tracing();

    let mut sim_config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(pace_ms) = args.pace_ms {
        sim_config.pacing_ms = pace_ms;
    }
    if let Some(strategy) = args.strategy {
        sim_config.strategy = strategy;
    }

    println!("\n=== Welcome to Bank Queue Simulation ===\n");

    let mut queue = sim_config
        .initial_queue()
        .context("building the initial queue")?;
    let driver = SimulationDriver::new().with_pacing(Duration::from_millis(sim_config.pacing_ms));

    let mut out = io::stdout().lock();
    driver.display(&queue, &mut out).context("writing queue")?;
    let report = driver.run(&mut queue, &mut out).context("writing service log")?;

    writeln!(out, "{}\n", report).context("writing report")?;
    Ok(())
}
