// scout_core/src/planning/mod.rs

//! Grid path planning.
//!
//! - **A\* Search** ([`PathFinder`]): 8-connected search over a binary
//!   occupancy grid with an optional additive cost field.
//! - **Smoothing** ([`smoothing::box_smooth`]): a decimated moving average of
//!   the raw path, used for heading estimation and rendering.
//!
//! ```rust,ignore
//! let mut finder = PathFinder::new(PlannerConfig::default())?;
//! finder.set_maps(expanded_map, Some(cost_field))?;
//! if let Some(heading) = finder.initial_heading(start, goal, AngleUnit::Radians) {
//!     // steer along `heading`
//! }
//! ```

mod astar;
mod error;
pub mod grid;
pub mod smoothing;

pub use astar::{Path, PathFinder};
pub use error::PlanningError;

use serde::{Deserialize, Serialize};

/// How [`PathFinder::initial_heading`] turns the first smoothed segment into an angle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingMethod {
    /// `acos(dx / hypot)`: always in `[0, pi]`, so it cannot tell a segment
    /// heading up the image from its mirror heading down.
    #[default]
    Acos,
    /// `atan2(-dy, dx)` with the row axis flipped, so "up the image" is `+pi/2`.
    Atan2,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AngleUnit {
    Radians,
    Degrees,
}

/// A* and smoothing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Cost added for every move; diagonal moves add a further `0.414` of it.
    pub step_cost: f64,
    /// Number of raw cells averaged per smoothed sample. Must be odd.
    pub smoothing_window: usize,
    /// Keep every n-th averaged sample.
    pub smoothing_stride: usize,
    pub heading_method: HeadingMethod,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            step_cost: 10.0,
            smoothing_window: 25,
            smoothing_stride: 7,
            heading_method: HeadingMethod::Acos,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<(), PlanningError> {
        if !self.step_cost.is_finite() || self.step_cost <= 0.0 {
            return Err(PlanningError::InvalidStepCost(self.step_cost));
        }
        if self.smoothing_window == 0 || self.smoothing_window % 2 == 0 {
            return Err(PlanningError::InvalidSmoothingWindow(self.smoothing_window));
        }
        if self.smoothing_stride == 0 {
            return Err(PlanningError::InvalidStride);
        }
        Ok(())
    }
}
