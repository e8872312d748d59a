// scout_core/src/control/mod.rs

//! The reactive steering controller and its building blocks.

mod config;
mod debug;
mod error;
pub mod iteration;
pub mod pid;
pub mod probes;
mod steering;
pub mod transforms;

pub use config::{ControllerConfig, ProbeConfig};
pub use error::ControlError;
pub use pid::{Axis, PidController, PidGains, VelocitySmoother};
pub use probes::CollisionProbes;
pub use steering::SteeringController;
pub use transforms::ScaleTransform;
