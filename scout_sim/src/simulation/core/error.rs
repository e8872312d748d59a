// scout_sim/src/simulation/core/error.rs

use std::path::PathBuf;

use scout_core::prelude::{AutonomyError, ControlError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Scenario file not found: {0}")]
    ScenarioNotFound(PathBuf),

    #[error("Failed to load scenario: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Failed to serialize scenario: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to write debug image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error(transparent)]
    Autonomy(#[from] AutonomyError),
}

impl From<figment::Error> for SimError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
