// scout_sim/src/simulation/sensors/detection.rs

use std::sync::Arc;

use scout_core::prelude::{AutonomyError, BoundingBox, Detector};

use super::camera::{CameraFrame, CameraModel};
use crate::simulation::world::World;

/// Ground-truth target detector: reports a box around the target whenever its
/// centre falls inside the camera footprint.
pub struct SyntheticDetector {
    world: Arc<World>,
    camera: CameraModel,
}

impl SyntheticDetector {
    pub fn new(world: Arc<World>, camera: CameraModel) -> Self {
        Self { world, camera }
    }

    /// The target's box in image pixels, if in view.
    pub fn project_target(&self, frame: &CameraFrame) -> Option<BoundingBox> {
        let local = frame.pose.to_local(&self.world.target);
        let (row, col) = self.camera.local_to_pixel(&local)?;

        let (rows_per_m, cols_per_m) = self.camera.pixels_per_metre();
        let diameter = 2.0 * self.world.target_radius;
        let height = (diameter * rows_per_m).round().max(1.0);
        let width = (diameter * cols_per_m).round().max(1.0);

        Some(BoundingBox::new(
            (col - width / 2.0).floor() as isize,
            (row - height / 2.0).floor() as isize,
            width as isize,
            height as isize,
        ))
    }
}

impl Detector for SyntheticDetector {
    type Frame = CameraFrame;

    fn detect(&mut self, frame: &CameraFrame) -> Result<Vec<BoundingBox>, AutonomyError> {
        Ok(self.project_target(frame).into_iter().collect())
    }
}
