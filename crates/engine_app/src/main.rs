//! # computer_sim
//!
//! Plays a scenario file against a world running the modular computer
//! system and logs everything observable: examine text, popups, sounds and
//! deletions.
//!
//! ## Startup Sequence
//!
//! 1. Parse CLI flags and load the scenario.
//! 2. Build a [`SystemRunner`] with the scenario config (CLI overrides win).
//! 3. Register prototypes and spawn the starting entities.
//! 4. Run the tick loop until the steps run out.

mod scenario;
mod tick;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_system::{ExecutionRole, SystemRunner};
use modular_computer::ModularComputerSystem;
use scenario::Scenario;
use tick::{TickConfig, TickLoop};

#[derive(Parser)]
#[command(name = "computer_sim", about = "Run a modular computer scenario")]
struct Args {
    /// Path to the scenario JSON file
    #[arg(default_value = "scenarios/computer_lab.json")]
    scenario: PathBuf,

    /// Execution role: authoritative (server) or observer (client)
    #[arg(short, long)]
    role: Option<ExecutionRole>,

    /// Ticks per second (overrides the scenario config)
    #[arg(short, long)]
    tick_rate: Option<f64>,

    /// Stop after this many ticks (0 = run every step)
    #[arg(short, long)]
    max_ticks: Option<u64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("computer_sim=info".parse()?))
        .init();

    let args = Args::parse();

    info!(path = %args.scenario.display(), "loading scenario");
    let scenario = Scenario::load(&args.scenario)?;

    let mut config = scenario.config.clone();
    if let Some(role) = args.role {
        config.role = role;
    }
    if let Some(tick_rate) = args.tick_rate {
        config.tick_rate = tick_rate;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }
    anyhow::ensure!(config.tick_rate > 0.0, "tick rate must be positive");

    info!(name = %config.name, role = %config.role, "simulation starting");

    let tick_config = TickConfig {
        tick_rate: config.tick_rate,
        max_ticks: config.max_ticks,
    };
    let mut runner = SystemRunner::new(config)?;
    runner.add_system(&ModularComputerSystem)?;
    let labels = scenario.populate(&mut runner)?;

    let mut tick_loop = TickLoop::new(tick_config, runner, labels, scenario.steps);
    tick_loop.run()?;

    info!("simulation finished");
    Ok(())
}
