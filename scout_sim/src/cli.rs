// scout_sim/src/cli.rs

use clap::Parser;
use std::path::PathBuf;

use crate::simulation::config::ScenarioConfig;

/// Scout: a closed-loop simulator for the scout steering controller.
///
/// This struct defines the command-line arguments of the `scout_sim` binary.
/// Values given here override the scenario file.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the scenario TOML file to run.
    #[arg(short, long, default_value = "assets/scenarios/default.toml")]
    pub scenario: PathBuf,

    /// Maximum number of frames to simulate.
    #[arg(short, long)]
    pub frames: Option<usize>,

    /// Write per-frame debug overlays into this directory.
    #[arg(long)]
    pub debug_dir: Option<PathBuf>,

    /// Log filter, e.g. `info` or `scout_core=debug`. `RUST_LOG` wins when set.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Override the world generation seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the fully resolved scenario as TOML and exit.
    #[arg(long, default_value_t = false)]
    pub print_config: bool,
}

impl Cli {
    /// Applies the command-line overrides on top of a loaded scenario.
    pub fn apply_overrides(&self, config: &mut ScenarioConfig) {
        if let Some(frames) = self.frames {
            config.simulation.frames = frames;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
    }
}
