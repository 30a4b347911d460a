//! Command-line driver for the grid simulations.
//!
//! Runs either the game-of-life variant or the predator-prey ecosystem,
//! stepping a fixed number of ticks or interactively on ENTER. Frames are
//! printed to stdout; diagnostics go to stderr.

mod telemetry;

use anyhow::{bail, Context, Result};
use cellsim_core::{EcosystemConfig, LifeConfig};
use cellsim_world::{Ecosystem, Life, PREDATOR_SYMBOL, PREY_SYMBOL};
use std::io::{self, BufRead, Write};
use tracing::info;

fn main() -> Result<()> {
    telemetry::init_telemetry()?;

    let args: Vec<String> = std::env::args().collect();
    let variant = args.get(1).map(String::as_str).unwrap_or("life");
    let ticks = match args.get(2) {
        Some(raw) => Some(
            raw.parse::<u64>()
                .with_context(|| format!("invalid tick count '{}'", raw))?,
        ),
        None => None,
    };
    let config_path = args.get(3);

    match variant {
        "life" => run_life(ticks, config_path),
        "eco" => run_ecosystem(ticks, config_path),
        other => bail!("unknown simulation '{}', expected 'life' or 'eco'", other),
    }
}

fn run_life(ticks: Option<u64>, config_path: Option<&String>) -> Result<()> {
    let config: LifeConfig = load_config(config_path)?;
    let mut sim = Life::from_config(&config)?;

    info!(
        width = config.grid.width,
        height = config.grid.height,
        seeds = config.seeds.len(),
        "starting life simulation"
    );

    print_frame(&sim.render(), sim.generation());
    match ticks {
        Some(count) => {
            for _ in 0..count {
                sim.tick();
                print_frame(&sim.render(), sim.generation());
            }
        }
        None => {
            while await_step()? {
                sim.tick();
                print_frame(&sim.render(), sim.generation());
            }
        }
    }

    info!(
        generations = sim.generation(),
        population = sim.population(),
        "life simulation finished"
    );
    Ok(())
}

fn run_ecosystem(ticks: Option<u64>, config_path: Option<&String>) -> Result<()> {
    let config: EcosystemConfig = load_config(config_path)?;
    let mut sim = Ecosystem::from_config(&config)?;

    info!(
        width = config.grid.width,
        height = config.grid.height,
        predators = config.predators.len(),
        prey = config.prey.len(),
        rng_seed = config.rng_seed,
        "starting ecosystem simulation"
    );

    print_eco_frame(&sim.render(), sim.ticks());
    match ticks {
        Some(count) => {
            for _ in 0..count {
                sim.tick();
                print_eco_frame(&sim.render(), sim.ticks());
            }
        }
        None => {
            while await_step()? {
                sim.tick();
                print_eco_frame(&sim.render(), sim.ticks());
            }
        }
    }

    let census = sim.census();
    let stats = sim.stats();
    info!(
        ticks = stats.ticks,
        predators = census.predators,
        prey = census.prey,
        births = stats.births,
        deaths = stats.deaths,
        kills = stats.kills,
        "ecosystem simulation finished"
    );
    Ok(())
}

/// Read a scenario from a JSON file, or fall back to the built-in defaults
fn load_config<T>(path: Option<&String>) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse config file {}", path))
        }
        None => Ok(T::default()),
    }
}

fn print_frame(frame: &str, tick: u64) {
    println!("--- tick {} ---", tick);
    println!("{}", frame);
    println!();
}

fn print_eco_frame(frame: &str, tick: u64) {
    println!("--- tick {} ---", tick);
    println!("predator = {}", PREDATOR_SYMBOL);
    println!("prey     = {}", PREY_SYMBOL);
    println!("{}", frame);
    println!();
}

/// Block for ENTER; `q` or end of input stops the loop
fn await_step() -> Result<bool> {
    print!("[enter to step, q to quit] ");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(false);
    }
    Ok(!matches!(line.trim(), "q" | "quit"))
}
