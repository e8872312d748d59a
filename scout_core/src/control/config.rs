// scout_core/src/control/config.rs

use serde::{Deserialize, Serialize};

use super::error::ControlError;
use super::pid::PidGains;
use super::probes::CollisionProbes;
use crate::mapping::{BlurThreshold, CostFieldConfig};
use crate::planning::PlannerConfig;
use crate::types::GridShape;

// =========================================================================
// == Top-Level Controller Configuration ==
// =========================================================================

/// # ControllerConfig
/// Every tunable of the steering controller. Immutable once the controller is
/// built; to change it, build a new controller. PID gains are the exception:
/// they can be retuned in place with `SteeringController::retune_pid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Shape every incoming mask is resized to.
    pub grid_shape: GridShape,
    pub probes: ProbeConfig,
    /// Signal once the target's centre row exceeds `rows - min_signal_distance`.
    pub min_signal_distance: usize,
    /// Obstacle dilation producing the map the planner searches.
    pub dilation: BlurThreshold,
    /// Repulsive cost field derived from the dilated map.
    pub cost_field: CostFieldConfig,
    pub planner: PlannerConfig,
    /// When absent, the raw linear command passes through unsmoothed.
    pub linear_pid: Option<PidGains>,
    /// When absent, the raw angular command passes through unsmoothed.
    pub angular_pid: Option<PidGains>,
    /// Fixed time step fed to both PID loops, in seconds.
    pub pid_sample_period: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            grid_shape: GridShape::default(),
            probes: ProbeConfig::default(),
            min_signal_distance: 15,
            dilation: BlurThreshold::default(),
            cost_field: CostFieldConfig::default(),
            planner: PlannerConfig::default(),
            linear_pid: None,
            angular_pid: None,
            pid_sample_period: 0.1,
        }
    }
}

// =========================================================================
// == Sub-Structs ==
// =========================================================================

/// Left-side collision probes. Right-side probes mirror the column offsets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// `(d_row, d_col)` offsets from the forward reference point `(rows - 1, cols / 2)`.
    pub left_offsets: Vec<(isize, isize)>,
    /// Side length of each square probe block, in cells.
    pub block_size: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            left_offsets: vec![(-10, -15), (-20, -12), (-30, -10)],
            block_size: 4,
        }
    }
}

// =========================================================================
// == Validation ==
// =========================================================================

impl ControllerConfig {
    /// Rejects configurations that could only fail later, at first use.
    pub fn validate(&self) -> Result<(), ControlError> {
        if self.grid_shape.is_empty() {
            return Err(invalid("grid_shape must have non-zero rows and cols"));
        }

        check_kernel("dilation", self.dilation.kernel, self.dilation.sigma)?;
        if !self.dilation.offset.is_finite() || !(0.0..1.0).contains(&self.dilation.offset) {
            return Err(invalid(format!(
                "dilation.offset must lie in [0, 1), got {}",
                self.dilation.offset
            )));
        }

        check_kernel("cost_field", self.cost_field.kernel, self.cost_field.sigma)?;
        if !self.cost_field.multiplier.is_finite() || self.cost_field.multiplier < 0.0 {
            return Err(invalid(format!(
                "cost_field.multiplier must be finite and non-negative, got {}",
                self.cost_field.multiplier
            )));
        }

        self.planner.validate()?;

        if self.probes.block_size == 0 {
            return Err(invalid("probes.block_size must be non-zero"));
        }
        let probes = CollisionProbes::new(&self.probes, self.grid_shape);
        if let Some(block) = probes.first_outside() {
            return Err(invalid(format!(
                "probe block at {:?} (size {}) does not fit in a {}x{} grid",
                block, self.probes.block_size, self.grid_shape.rows, self.grid_shape.cols
            )));
        }

        if self.min_signal_distance > self.grid_shape.rows {
            return Err(invalid(format!(
                "min_signal_distance {} exceeds grid rows {}",
                self.min_signal_distance, self.grid_shape.rows
            )));
        }

        if !self.pid_sample_period.is_finite() || self.pid_sample_period <= 0.0 {
            return Err(invalid(format!(
                "pid_sample_period must be positive, got {}",
                self.pid_sample_period
            )));
        }
        for (name, gains) in [("linear_pid", &self.linear_pid), ("angular_pid", &self.angular_pid)] {
            if let Some(gains) = gains {
                if !gains.is_finite() {
                    return Err(invalid(format!("{name} gains must be finite")));
                }
            }
        }

        Ok(())
    }
}

fn check_kernel(name: &str, size: usize, sigma: f64) -> Result<(), ControlError> {
    if size == 0 || size % 2 == 0 {
        return Err(invalid(format!("{name}.kernel must be odd and positive, got {size}")));
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(invalid(format!("{name}.sigma must be positive, got {sigma}")));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> ControlError {
    ControlError::InvalidConfig(message.into())
}
