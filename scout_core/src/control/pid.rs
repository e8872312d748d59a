// scout_core/src/control/pid.rs

//! Command smoothing with a pair of PID loops.
//!
//! Each loop's setpoint is the raw command from the steering logic and its
//! process variable is the loop's own previous output. There is no measured
//! wheel speed anywhere in this feedback path, so the loops act as a slew-rate
//! limiter on the commands. Wiring encoder feedback in here would turn them
//! into real velocity controllers and change the vehicle's behaviour.

use serde::{Deserialize, Serialize};

use crate::types::{VelocityCommand, COMMAND_LIMIT};

const OUTPUT_LIMIT: f64 = COMMAND_LIMIT as f64;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl PidGains {
    pub const fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self { kp, ki, kd }
    }

    pub fn is_finite(&self) -> bool {
        self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()
    }
}

/// Which command component a PID loop smooths.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    Linear,
    Angular,
}

/// A PID loop with output and integral clamped to `[-100, 100]`.
///
/// The derivative acts on the measurement rather than the error, so a setpoint
/// step does not produce a derivative kick.
#[derive(Debug, Clone)]
pub struct PidController {
    gains: PidGains,
    setpoint: f64,
    integral: f64,
    last_input: Option<f64>,
}

impl PidController {
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            setpoint: 0.0,
            integral: 0.0,
            last_input: None,
        }
    }

    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Replaces the gains, keeping the accumulated integral.
    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    pub fn set_setpoint(&mut self, setpoint: f64) {
        self.setpoint = setpoint;
    }

    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Advances the loop by `dt` seconds with the given process variable.
    pub fn update(&mut self, input: f64, dt: f64) -> f64 {
        let error = self.setpoint - input;
        let d_input = input - self.last_input.unwrap_or(input);

        let proportional = self.gains.kp * error;

        self.integral += self.gains.ki * error * dt;
        self.integral = self.integral.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT);

        let derivative = if dt > 0.0 {
            -self.gains.kd * d_input / dt
        } else {
            0.0
        };

        self.last_input = Some(input);
        (proportional + self.integral + derivative).clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT)
    }
}

/// State of one smoothed axis: the optional loop and its last output.
#[derive(Debug, Clone, Default)]
struct SmoothedAxis {
    pid: Option<PidController>,
    /// Previous smoothed value, used as the next process variable.
    value: f64,
}

impl SmoothedAxis {
    fn new(gains: Option<PidGains>) -> Self {
        Self {
            pid: gains.map(PidController::new),
            value: 0.0,
        }
    }

    fn step(&mut self, target: i32, dt: f64) -> i32 {
        match self.pid.as_mut() {
            Some(pid) => {
                pid.set_setpoint(f64::from(target));
                self.value = pid.update(self.value, dt);
                // Truncates toward zero; `value` keeps the fractional part for feedback.
                self.value as i32
            }
            None => {
                self.value = f64::from(target);
                target
            }
        }
    }

    fn retune(&mut self, gains: PidGains) {
        match self.pid.as_mut() {
            Some(pid) => pid.set_gains(gains),
            None => self.pid = Some(PidController::new(gains)),
        }
    }
}

/// Independent linear and angular smoothing. Without gains an axis passes through.
#[derive(Debug, Clone)]
pub struct VelocitySmoother {
    linear: SmoothedAxis,
    angular: SmoothedAxis,
    sample_period: f64,
}

impl VelocitySmoother {
    pub fn new(linear: Option<PidGains>, angular: Option<PidGains>, sample_period: f64) -> Self {
        Self {
            linear: SmoothedAxis::new(linear),
            angular: SmoothedAxis::new(angular),
            sample_period,
        }
    }

    pub fn smooth(&mut self, raw: VelocityCommand) -> VelocityCommand {
        let linear = self.linear.step(raw.linear, self.sample_period);
        let angular = self.angular.step(raw.angular, self.sample_period);
        VelocityCommand::new(linear, angular)
    }

    /// Creates the loop for `axis` on first use, otherwise retunes it in place.
    pub fn retune(&mut self, axis: Axis, gains: PidGains) {
        self.axis_mut(axis).retune(gains);
    }

    pub fn is_smoothing(&self, axis: Axis) -> bool {
        self.axis(axis).pid.is_some()
    }

    pub fn gains(&self, axis: Axis) -> Option<PidGains> {
        self.axis(axis).pid.as_ref().map(PidController::gains)
    }

    /// The last smoothed value on `axis` (zero before the first step).
    pub fn previous(&self, axis: Axis) -> f64 {
        self.axis(axis).value
    }

    fn axis(&self, axis: Axis) -> &SmoothedAxis {
        match axis {
            Axis::Linear => &self.linear,
            Axis::Angular => &self.angular,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut SmoothedAxis {
        match axis {
            Axis::Linear => &mut self.linear,
            Axis::Angular => &mut self.angular,
        }
    }
}
