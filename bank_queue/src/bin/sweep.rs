//! Parallel sweep over seeded bank simulations
//!
//! Each scenario serves the configured initial batch plus randomly arriving
//! customers in simulated time. Scenario `i` uses seed `arrivals.seed + i`,
//! wrapping at `u64::MAX`. With `--json` stdout carries only the summary.
//!
//! Usage:
//!   cargo run --release --bin sweep -- --scenarios 200 --json

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use bank_queue::ArrivalProcess;
use bank_queue::config::{self, SimulationConfig};
use bank_queue::queue::Strategy;
use bank_queue::scenario::{SweepSummary, build_scenario, scenario_seed};
use clap::Parser;
use des::parallel::{ParallelRunner, simple_progress_reporter};
use tracing::info;

#[derive(Debug, Parser)]
#[command(about = "Run many seeded bank simulations in parallel")]
struct Args {
    #[arg(short, long, env = "BANK_QUEUE_CONFIG")]
    config: Option<PathBuf>,
    #[arg(short = 'n', long, default_value_t = 100)]
    scenarios: usize,
    /// Worker threads; rayon's default pool when omitted
    #[arg(short, long)]
    threads: Option<usize>,
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,
    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    config::configure_tracing();

    let mut sim_config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(strategy) = args.strategy {
        sim_config.strategy = strategy;
    }

    let arrivals = ArrivalProcess::new(&sim_config.arrivals, sim_config.arrivals.seed)
        .context("building the arrival process")?;
    let base_seed = sim_config.arrivals.seed;

    info!(
        scenarios = args.scenarios,
        strategy = %sim_config.strategy,
        max_customers = sim_config.arrivals.max_customers,
        "starting sweep"
    );
    let start = Instant::now();

    let mut runner = ParallelRunner::new(args.scenarios, |scenario_id| {
        build_scenario(
            &sim_config.customers,
            &arrivals,
            scenario_seed(base_seed, scenario_id),
            sim_config.strategy,
        )
    });
    if !args.json {
        runner = runner.progress(simple_progress_reporter((args.scenarios / 10).max(1)));
    }
    if let Some(threads) = args.threads {
        runner = runner.num_threads(threads);
    }
    let results = runner.run(sim_config.arrivals.run_until);

    info!(elapsed_s = start.elapsed().as_secs_f64(), "sweep finished");

    let summary = SweepSummary::from_results(&results);
    if args.json {
        let json = serde_json::to_string_pretty(&summary).context("serializing summary")?;
        println!("{}", json);
    } else {
        println!("\n=== Sweep Summary ===");
        println!("Scenarios: {} ({} failed)", summary.scenarios, summary.failed);
        println!("Mean customers served: {:.2}", summary.mean_customers_served);
        println!("Mean VIPs served: {:.2}", summary.mean_vip_served);
        println!("Mean service time: {:.2} s", summary.mean_service_time);
        println!("Mean queue wait: {:.2} ticks", summary.mean_queue_wait);
        println!("Longest queue: {}", summary.max_queue_length);
        println!("Rejected arrivals: {}", summary.rejected);
    }
    Ok(())
}
