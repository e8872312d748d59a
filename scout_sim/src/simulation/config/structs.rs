// scout_sim/src/simulation/config/structs.rs

use scout_core::prelude::ControllerConfig;
use serde::{Deserialize, Serialize};

// =========================================================================
// == Top-Level Configuration ==
// =========================================================================

/// # ScenarioConfig
/// Everything a simulation run needs. This struct is the root of the data parsed
/// from a `scenario.toml` file; every section may be omitted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    pub simulation: SimulationSection,
    pub world: WorldConfig,
    pub camera: CameraConfig,
    pub vehicle: VehicleConfig,
    pub controller: ControllerConfig,
}

// =========================================================================
// == Configuration Sub-Structs ==
// These map directly to the sections in a scenario file.
// =========================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSection {
    /// Seed for the world generator. The same seed always builds the same world.
    pub seed: u64,
    /// Maximum number of camera frames to process.
    pub frames: usize,
    /// Simulated time between frames, in seconds.
    pub frame_period_s: f64,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            seed: 0,
            frames: 600,
            frame_period_s: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldConfig {
    /// Side length of the square arena, in metres. Its edges are walls.
    pub size_m: f64,
    pub obstacle_count: usize,
    /// `[min, max]` obstacle radius.
    pub obstacle_radius_m: [f64; 2],
    /// Target position; placed at random when absent.
    pub target: Option<[f64; 2]>,
    pub target_radius_m: f64,
    /// `[x, y, heading_deg]`.
    pub start_pose: [f64; 3],
    /// Obstacles are never generated closer than this to the start or the target.
    pub clearance_m: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            size_m: 10.0,
            obstacle_count: 8,
            obstacle_radius_m: [0.2, 0.5],
            target: None,
            target_radius_m: 0.1,
            start_pose: [1.0, 1.0, 45.0],
            clearance_m: 1.0,
        }
    }
}

/// A downward-looking camera whose image covers a rectangle of ground directly
/// ahead of the vehicle. The bottom image row is nearest the vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraConfig {
    pub image_width: usize,
    pub image_height: usize,
    /// How far ahead the footprint reaches.
    pub view_depth_m: f64,
    /// Lateral extent of the footprint, centred on the vehicle.
    pub view_width_m: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            image_width: 320,
            image_height: 240,
            view_depth_m: 2.0,
            view_width_m: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleConfig {
    /// Forward speed with both wheels at 100% duty.
    pub max_speed_mps: f64,
    /// Turn rate with the wheels at opposite 100% duties.
    pub max_turn_rate_dps: f64,
    /// Footprint radius used for contact checks.
    pub radius_m: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            max_speed_mps: 0.5,
            max_turn_rate_dps: 90.0,
            radius_m: 0.15,
        }
    }
}
