use crate::direction::Vec2;
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the colony simulation
#[derive(Parser, Debug)]
#[command(name = "ant_colony_sim", about = "🐜 Ant colonies foraging under a hungry snake")]
pub struct Args {
    /// Number of ticks to run
    #[arg(short = 't', long, default_value_t = 3600)]
    pub ticks: u64,

    /// Simulated milliseconds per tick
    #[arg(long, default_value_t = 16.0)]
    pub dt_ms: f64,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// TOML file overriding the default tuning
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Position of the first colony as `x,y` (defaults to the world centre)
    #[arg(long, value_name = "X,Y")]
    pub colony: Option<Vec2>,

    /// Found a new colony whenever the primary colony can afford one
    #[arg(long, default_value_t = false)]
    pub expand: bool,

    /// Suppress the event log (for benchmarks)
    #[arg(long, default_value_t = false)]
    pub suppress_events: bool,
}
