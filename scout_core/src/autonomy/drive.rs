// scout_core/src/autonomy/drive.rs

use crate::types::VelocityCommand;

/// Combined magnitude that a pair of wheel duties is rescaled to when it overflows.
const SATURATED_MAGNITUDE: f64 = 99.9999;

/// Differential-drive wheel duty cycles in percent, `[-100, 100]` each.
///
/// Positive is forward. The sign of a duty selects the motor direction; its
/// magnitude is the PWM duty.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct WheelDuty {
    pub left: f64,
    pub right: f64,
}

impl WheelDuty {
    /// Mixes a command into wheel duties: `left = l - a`, `right = l + a`.
    ///
    /// When `|l| + |a|` exceeds 100 both components are scaled down
    /// proportionally first, so neither wheel is asked for more than 100%.
    pub fn from_command(command: VelocityCommand) -> Self {
        let mut linear = f64::from(command.linear);
        let mut angular = f64::from(command.angular);

        let magnitude = linear.abs() + angular.abs();
        if magnitude > 100.0 {
            linear = linear / magnitude * SATURATED_MAGNITUDE;
            angular = angular / magnitude * SATURATED_MAGNITUDE;
        }

        Self {
            left: linear - angular,
            right: linear + angular,
        }
    }

    pub const STOPPED: WheelDuty = WheelDuty {
        left: 0.0,
        right: 0.0,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn straight_ahead_drives_both_wheels_equally() {
        let duty = WheelDuty::from_command(VelocityCommand::new(100, 0));
        assert_abs_diff_eq!(duty.left, 100.0);
        assert_abs_diff_eq!(duty.right, 100.0);
    }

    #[test]
    fn positive_angular_turns_counter_clockwise() {
        let duty = WheelDuty::from_command(VelocityCommand::new(0, 100));
        assert_abs_diff_eq!(duty.left, -100.0);
        assert_abs_diff_eq!(duty.right, 100.0);
    }

    #[test]
    fn overflowing_commands_are_rescaled() {
        let duty = WheelDuty::from_command(VelocityCommand::new(100, -50));
        assert!(duty.left.abs() < 100.0);
        assert!(duty.right.abs() < 100.0);
        assert_abs_diff_eq!(duty.left, 99.9999, epsilon = 1e-9);
        assert_abs_diff_eq!(duty.right, 99.9999 / 3.0, epsilon = 1e-9);
    }
}
