// scout_sim/src/simulation/config/mod.rs

//! This module handles loading and validating the scenario configuration from
//! disk and the environment.

pub mod structs;

use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use tracing::info;

use crate::simulation::core::error::SimError;
pub use structs::{CameraConfig, ScenarioConfig, SimulationSection, VehicleConfig, WorldConfig};

/// Prefix of the environment variables that override scenario values,
/// e.g. `SCOUT_SIMULATION__SEED=7`.
pub const ENV_PREFIX: &str = "SCOUT_";

/// Loads a scenario file, then applies `SCOUT_`-prefixed environment overrides.
pub fn load_scenario(path: &Path) -> Result<ScenarioConfig, SimError> {
    if !path.is_file() {
        return Err(SimError::ScenarioNotFound(path.to_path_buf()));
    }
    info!("Loading scenario from: {}", path.display());

    let config: ScenarioConfig = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()?;
    config.validate()?;
    Ok(config)
}

/// Parses a scenario from TOML text, without environment overrides.
pub fn parse_scenario(text: &str) -> Result<ScenarioConfig, SimError> {
    let config: ScenarioConfig = Figment::new().merge(Toml::string(text)).extract()?;
    config.validate()?;
    Ok(config)
}

impl ScenarioConfig {
    /// Checks the simulator sections. The controller section is checked when the
    /// controller is built.
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: String| Err(SimError::InvalidScenario(msg));

        if !(self.simulation.frame_period_s > 0.0) {
            return invalid(format!(
                "frame_period_s must be positive, got {}",
                self.simulation.frame_period_s
            ));
        }

        let world = &self.world;
        if !(world.size_m > 0.0) {
            return invalid(format!("world size must be positive, got {}", world.size_m));
        }
        let [min_radius, max_radius] = world.obstacle_radius_m;
        if !(min_radius > 0.0 && min_radius <= max_radius) {
            return invalid(format!(
                "obstacle_radius_m must satisfy 0 < min <= max, got [{min_radius}, {max_radius}]"
            ));
        }
        let inside = |x: f64, y: f64| (0.0..=world.size_m).contains(&x) && (0.0..=world.size_m).contains(&y);
        if !inside(world.start_pose[0], world.start_pose[1]) {
            return invalid("start_pose lies outside the world".to_string());
        }
        if let Some([x, y]) = world.target {
            if !inside(x, y) {
                return invalid("target lies outside the world".to_string());
            }
        }

        let camera = &self.camera;
        if camera.image_width == 0 || camera.image_height == 0 {
            return invalid("camera image must not be empty".to_string());
        }
        if !(camera.view_depth_m > 0.0 && camera.view_width_m > 0.0) {
            return invalid("camera footprint must have a positive size".to_string());
        }

        let vehicle = &self.vehicle;
        if !(vehicle.max_speed_mps >= 0.0 && vehicle.max_turn_rate_dps >= 0.0 && vehicle.radius_m >= 0.0) {
            return invalid("vehicle limits must be non-negative".to_string());
        }
        Ok(())
    }
}
