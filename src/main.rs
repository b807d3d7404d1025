use ant_colony_sim::prelude::*;
use ant_colony_sim::simulation::report;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();

    // stdout carries the event log; diagnostics go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(&args) {
        eprintln!("{} {}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(|| fastrand::u64(..));
    tracing::info!(seed, "starting simulation");

    // Build the world and place the first colony
    let mut sim = Simulation::new(config, seed)?;
    let home = args.colony.unwrap_or_else(|| sim.world().bounds().center());
    sim.issue_placement(home)?;

    // Run simulation
    let runtime = sim.run(args);

    // Print results
    report::print_summary(&sim.summary(), args, runtime);

    Ok(())
}
