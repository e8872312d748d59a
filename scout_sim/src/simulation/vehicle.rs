// scout_sim/src/simulation/vehicle.rs

use nalgebra::Vector2;
use scout_core::prelude::WheelDuty;

use crate::simulation::config::VehicleConfig;
use crate::simulation::core::pose::Pose2;

/// Differential-drive vehicle integrated as a unicycle.
///
/// Wheel duties map linearly to body rates:
/// `v = (left + right) / 200 * max_speed`, `w = (right - left) / 200 * max_turn_rate`.
#[derive(Debug, Clone)]
pub struct DiffDriveVehicle {
    pub pose: Pose2,
    duty: WheelDuty,
    max_speed: f64,
    max_turn_rate: f64,
    odometer: f64,
}

impl DiffDriveVehicle {
    pub fn new(start: Pose2, config: &VehicleConfig) -> Self {
        Self {
            pose: start,
            duty: WheelDuty::STOPPED,
            max_speed: config.max_speed_mps,
            max_turn_rate: config.max_turn_rate_dps.to_radians(),
            odometer: 0.0,
        }
    }

    /// Latches new wheel duties; they apply until the next command.
    pub fn command(&mut self, duty: WheelDuty) {
        self.duty = duty;
    }

    pub fn duty(&self) -> WheelDuty {
        self.duty
    }

    /// Body rates `(linear m/s, angular rad/s)` for the latched duties.
    pub fn body_rates(&self) -> (f64, f64) {
        let WheelDuty { left, right } = self.duty;
        (
            (left + right) / 200.0 * self.max_speed,
            (right - left) / 200.0 * self.max_turn_rate,
        )
    }

    /// Advances the pose by `dt` seconds with midpoint heading integration.
    pub fn step(&mut self, dt: f64) {
        let (linear, angular) = self.body_rates();
        let mid = Pose2 {
            heading: self.pose.heading + angular * dt / 2.0,
            ..self.pose
        };
        let displacement = mid.rotation() * Vector2::new(linear * dt, 0.0);
        self.pose.position += displacement;
        self.pose.heading = wrap_angle(self.pose.heading + angular * dt);
        self.odometer += displacement.norm();
    }

    /// Total distance travelled, in metres.
    pub fn odometer(&self) -> f64 {
        self.odometer
    }
}

/// Wraps an angle into `(-pi, pi]`.
fn wrap_angle(angle: f64) -> f64 {
    use std::f64::consts::{PI, TAU};
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scout_core::prelude::VelocityCommand;
    use std::f64::consts::FRAC_PI_2;

    fn vehicle() -> DiffDriveVehicle {
        DiffDriveVehicle::new(
            Pose2::new(0.0, 0.0, 0.0),
            &VehicleConfig {
                max_speed_mps: 1.0,
                max_turn_rate_dps: 90.0,
                radius_m: 0.1,
            },
        )
    }

    #[test]
    fn full_forward_drives_along_the_heading() {
        let mut v = vehicle();
        v.command(WheelDuty::from_command(VelocityCommand::new(100, 0)));
        for _ in 0..10 {
            v.step(0.1);
        }
        assert_relative_eq!(v.pose.position.x, 1.0, epsilon = 1e-9);
        assert_relative_eq!(v.pose.position.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(v.odometer(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn positive_angular_turns_left_in_place() {
        let mut v = vehicle();
        v.command(WheelDuty::from_command(VelocityCommand::new(0, 100)));
        v.step(1.0);
        assert_relative_eq!(v.pose.heading, FRAC_PI_2, epsilon = 1e-9);
        assert_relative_eq!(v.pose.position.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn angles_wrap() {
        assert_relative_eq!(wrap_angle(3.0 * FRAC_PI_2), -FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(-3.0 * FRAC_PI_2), FRAC_PI_2, epsilon = 1e-12);
    }
}
