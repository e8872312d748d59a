// scout_core/src/planning/error.rs

use thiserror::Error;

use crate::types::GridShape;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanningError {
    #[error("The planning grid has no cells.")]
    EmptyGrid,

    #[error("Cost field shape {cost:?} does not match occupancy grid shape {grid:?}.")]
    ShapeMismatch { grid: GridShape, cost: GridShape },

    #[error("Smoothing window must be odd and non-zero, got {0}.")]
    InvalidSmoothingWindow(usize),

    #[error("Smoothing stride must be non-zero.")]
    InvalidStride,

    #[error("Step cost must be positive and finite, got {0}.")]
    InvalidStepCost(f64),
}
