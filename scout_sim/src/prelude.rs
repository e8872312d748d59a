// scout_sim/src/prelude.rs

// Re-export the entire scout_core prelude so the pure controller types are at hand.
pub use scout_core::prelude::*;

// Re-export common simulation-specific types.
pub use crate::simulation::config::structs::*;
pub use crate::simulation::config::{load_scenario, parse_scenario};
pub use crate::simulation::core::error::SimError;
pub use crate::simulation::core::pose::Pose2;
pub use crate::simulation::core::prng::SimulationRng;
pub use crate::simulation::runner::{RunSummary, Simulation};
pub use crate::simulation::sensors::{CameraFrame, CameraModel, SyntheticDetector, SyntheticSegmenter};
pub use crate::simulation::vehicle::DiffDriveVehicle;
pub use crate::simulation::world::{Obstacle, World};
