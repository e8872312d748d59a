// scout_sim/src/main.rs

use std::process::ExitCode;

use clap::Parser;
use scout_sim::cli::Cli;
use scout_sim::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG takes precedence over --log-level.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), SimError> {
    let mut config = load_scenario(&cli.scenario)?;
    cli.apply_overrides(&mut config);

    if cli.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    info!(
        "scout_sim v{}: seed {}, up to {} frames",
        env!("CARGO_PKG_VERSION"),
        config.simulation.seed,
        config.simulation.frames
    );
    let mut simulation = Simulation::new(config, cli.debug_dir.clone())?;
    let target = simulation.world().target;
    info!(
        "World has {} obstacles; target at ({:.2}, {:.2})",
        simulation.world().obstacles.len(),
        target.x,
        target.y
    );

    let summary = simulation.run()?;
    if !summary.signaled {
        info!("Target not reached within the frame budget");
    }
    Ok(())
}
