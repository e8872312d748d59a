// scout_core/src/control/error.rs

use thiserror::Error;

use crate::planning::PlanningError;
use crate::types::GridShape;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    #[error("Invalid controller configuration: {0}")]
    InvalidConfig(String),

    #[error("The supplied map has no cells.")]
    EmptyMap,

    #[error("Map shape {found:?} does not match the configured grid shape {expected:?}.")]
    ShapeMismatch {
        expected: GridShape,
        found: GridShape,
    },

    #[error("No map has been supplied to the controller yet.")]
    MapNotSet,

    #[error(transparent)]
    Planning(#[from] PlanningError),
}
