// scout_sim/src/simulation/core/pose.rs

use nalgebra::{Rotation2, Vector2};

// =========================================================================
// == Planar Vehicle Pose ==
// =========================================================================

/// Position in metres and heading in radians, counter-clockwise from the world +X axis.
///
/// The vehicle frame is X forward, Y to the left.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Pose2 {
    pub position: Vector2<f64>,
    pub heading: f64,
}

impl Pose2 {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            heading,
        }
    }

    pub fn rotation(&self) -> Rotation2<f64> {
        Rotation2::new(self.heading)
    }

    /// Expresses a world point in the vehicle frame: `(forward, left)`.
    pub fn to_local(&self, world: &Vector2<f64>) -> Vector2<f64> {
        self.rotation().inverse() * (world - self.position)
    }

    /// Expresses a vehicle-frame point `(forward, left)` in world coordinates.
    pub fn to_world(&self, local: &Vector2<f64>) -> Vector2<f64> {
        self.position + self.rotation() * local
    }

    pub fn distance_to(&self, world: &Vector2<f64>) -> f64 {
        (world - self.position).norm()
    }
}
