// scout_sim/src/simulation/sensors/camera.rs

use nalgebra::Vector2;

use crate::simulation::config::CameraConfig;
use crate::simulation::core::pose::Pose2;

/// What the camera sees at one instant: the vehicle pose the frame was taken from.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraFrame {
    pub sequence: u64,
    pub pose: Pose2,
}

/// Maps between image pixels and the ground rectangle ahead of the vehicle.
///
/// Row 0 is the far edge of the footprint and the last row touches the vehicle.
/// Column 0 is the left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraModel {
    pub width: usize,
    pub height: usize,
    depth: f64,
    span: f64,
}

impl CameraModel {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            width: config.image_width,
            height: config.image_height,
            depth: config.view_depth_m,
            span: config.view_width_m,
        }
    }

    /// The vehicle-frame point `(forward, left)` at the centre of a pixel.
    pub fn pixel_to_local(&self, row: usize, col: usize) -> Vector2<f64> {
        let forward = (self.height as f64 - row as f64 - 0.5) / self.height as f64 * self.depth;
        let left = (0.5 - (col as f64 + 0.5) / self.width as f64) * self.span;
        Vector2::new(forward, left)
    }

    /// The fractional `(row, col)` of a vehicle-frame point, if it is in view.
    pub fn local_to_pixel(&self, local: &Vector2<f64>) -> Option<(f64, f64)> {
        let (forward, left) = (local.x, local.y);
        if !(0.0..=self.depth).contains(&forward) || left.abs() > self.span / 2.0 {
            return None;
        }
        let row = (1.0 - forward / self.depth) * self.height as f64;
        let col = (0.5 - left / self.span) * self.width as f64;
        Some((row, col))
    }

    /// Pixels per metre along the image rows and columns.
    pub fn pixels_per_metre(&self) -> (f64, f64) {
        (
            self.height as f64 / self.depth,
            self.width as f64 / self.span,
        )
    }

    pub fn world_point(&self, pose: &Pose2, row: usize, col: usize) -> Vector2<f64> {
        pose.to_world(&self.pixel_to_local(row, col))
    }
}
