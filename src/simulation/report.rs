use crate::cli::Args;
use crate::ids::ColonyId;
use crate::simulation::clock::Phase;
use crate::simulation::engine::Simulation;
use crate::simulation::events::{SpiderEvent, TickEvents};
use crate::simulation::stats::Summary;
use colored::Colorize;
use std::time::Duration;

/// Print the noteworthy events of one tick
pub fn log_events(args: &Args, sim: &Simulation, events: &TickEvents) {
    if args.suppress_events || events.is_quiet() {
        return;
    }
    let tick = sim.tick_count();

    if let Some(phase) = events.phase_change {
        let line = match phase {
            Phase::Night => "night falls, the snake sleeps".blue(),
            Phase::Day => "day breaks, the snake wakes".yellow(),
        };
        println!("{} {} {}", "🌗".normal(), format!("[{tick}]").dimmed(), line);
    }

    for id in &events.captures {
        println!(
            "{} {} {} {}",
            "🐍".red(),
            format!("[{tick}]").dimmed(),
            format!("{id}").bright_red(),
            "was eaten by the snake".red()
        );
    }

    for id in &events.founded {
        log_founding(args, sim, *id);
    }

    match events.spider {
        Some(SpiderEvent::Appeared(p)) => println!(
            "{} {} {} {}",
            "🕷".magenta(),
            format!("[{tick}]").dimmed(),
            "a spider crawled out at".magenta(),
            p.to_string().bright_magenta()
        ),
        Some(SpiderEvent::Left) => println!(
            "{} {} {}",
            "🕷".magenta(),
            format!("[{tick}]").dimmed(),
            "the spider is gone".magenta()
        ),
        None => {}
    }

    for (command, result) in &events.commands {
        if let Err(err) = result {
            println!(
                "{} {} {} {}",
                "⚠".yellow(),
                format!("[{tick}]").dimmed(),
                command.to_string().yellow(),
                format!("failed: {err}").dimmed()
            );
        }
    }
}

/// Print a colony founding
pub fn log_founding(args: &Args, sim: &Simulation, id: ColonyId) {
    if args.suppress_events {
        return;
    }
    let Some(colony) = sim.colony(id) else {
        return;
    };
    println!(
        "{} {} {} {}",
        "🏠".green(),
        format!("[{}]", sim.tick_count()).dimmed(),
        format!("{id}").bright_green(),
        format!("founded at {}", colony.position).green()
    );
}

/// Print the end-of-run summary
pub fn print_summary(summary: &Summary, args: &Args, runtime: Duration) {
    println!(
        "\n{}\n{} {:.3} ms {} {} {} {} {} {} {} {} {}",
        "===".bright_blue().bold(),
        "⏱️  Simulation Latency:".green().bold(),
        runtime.as_secs_f64() * 1000.0,
        format!("({} ticks of {} ms)", summary.ticks, args.dt_ms).dimmed(),
        "|".dimmed(),
        format!("ants={}", summary.ants).cyan(),
        format!("colonies={}", summary.colonies).cyan(),
        format!("captures={}", summary.captures).cyan(),
        format!("minerals={:.1}", summary.stock.minerals).cyan(),
        format!("plants={:.1}", summary.stock.plants).cyan(),
        format!("phase={}", summary.phase).cyan(),
        format!("snake_length={}", summary.snake_length).cyan(),
    );
    println!(
        "{} {} {} {} {}",
        "🌿".green(),
        format!("rock_nodes={}", summary.rocks).dimmed(),
        format!("plant_nodes={}", summary.plants).dimmed(),
        format!("bush_nodes={}", summary.bushes).dimmed(),
        format!(
            "abundance={:.2} danger={:.2}",
            summary.abundance, summary.danger
        )
        .dimmed(),
    );
}
