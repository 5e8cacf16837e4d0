use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use antkitchen::config::load_config;
use antkitchen::simulation::Simulation;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

/// Command-line arguments for AntKitchen.
#[derive(Parser)]
#[command(name = "AntKitchen", version, about = "Headless ant swarm kitchen simulation")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate.
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per tick.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Seed for the random generator.
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Log a status line every N ticks, 0 disables.
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    macroquad::rand::srand(cli.seed);

    let mut sim = Simulation::new(&config)?;
    for _ in 0..cli.ticks {
        sim.update(cli.dt);
        if cli.report_every > 0 && sim.tick % cli.report_every == 0 {
            report(&sim);
        }
    }

    info!(
        "Finished after {} ticks: {} of {} ants alive, {} deaths, total scent {:.1}",
        sim.tick,
        sim.population.alive_count(),
        sim.population.len(),
        sim.population.deaths(),
        sim.scent.total()
    );
    Ok(())
}

fn report(sim: &Simulation) {
    info!(
        "Tick {}: {} alive, {} deaths, total scent {:.1}",
        sim.tick,
        sim.population.alive_count(),
        sim.population.deaths(),
        sim.scent.total()
    );
}

/// Main entry point for the AntKitchen simulation.
fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
