// scout_sim/src/simulation/sensors/segmentation.rs

use std::sync::Arc;

use image::{Rgb, RgbImage};
use nalgebra::DMatrix;
use scout_core::prelude::{AutonomyError, Segmentation, Segmenter};

use super::camera::{CameraFrame, CameraModel};
use crate::simulation::world::World;

const OBSTACLE: u8 = 255;
const OBSTACLE_COLOR: Rgb<u8> = Rgb([90, 90, 90]);
const TARGET_COLOR: Rgb<u8> = Rgb([0, 160, 0]);

/// Ground-truth segmentation: every pixel whose ground point is inside an
/// obstacle or beyond the arena walls is marked.
pub struct SyntheticSegmenter {
    world: Arc<World>,
    camera: CameraModel,
    overlay: bool,
}

impl SyntheticSegmenter {
    pub fn new(world: Arc<World>, camera: CameraModel) -> Self {
        Self {
            world,
            camera,
            overlay: false,
        }
    }

    /// Also render a colour overlay of each frame, used as the debug canvas.
    pub fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay = overlay;
        self
    }

    fn render_overlay(&self, frame: &CameraFrame, mask: &DMatrix<u8>) -> RgbImage {
        let mut image = RgbImage::new(self.camera.width as u32, self.camera.height as u32);
        for (col, row, pixel) in image.enumerate_pixels_mut() {
            let (row, col) = (row as usize, col as usize);
            if mask[(row, col)] == OBSTACLE {
                *pixel = OBSTACLE_COLOR;
            } else {
                let point = self.camera.world_point(&frame.pose, row, col);
                if (point - self.world.target).norm() <= self.world.target_radius {
                    *pixel = TARGET_COLOR;
                }
            }
        }
        image
    }
}

impl Segmenter for SyntheticSegmenter {
    type Frame = CameraFrame;

    fn segment(&mut self, frame: &CameraFrame) -> Result<Segmentation, AutonomyError> {
        let mask = DMatrix::from_fn(self.camera.height, self.camera.width, |row, col| {
            let point = self.camera.world_point(&frame.pose, row, col);
            if self.world.is_blocked(&point) {
                OBSTACLE
            } else {
                0
            }
        });
        let overlay = self.overlay.then(|| self.render_overlay(frame, &mask));
        Ok(Segmentation { mask, overlay })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::{CameraConfig, WorldConfig};
    use crate::simulation::core::pose::Pose2;
    use crate::simulation::core::prng::SimulationRng;
    use crate::simulation::world::Obstacle;
    use nalgebra::Vector2;

    fn world_with(obstacles: Vec<Obstacle>) -> Arc<World> {
        let config = WorldConfig {
            obstacle_count: 0,
            target: Some([9.0, 9.0]),
            ..WorldConfig::default()
        };
        let mut world = World::generate(&config, &mut SimulationRng::from_seed(0));
        world.obstacles = obstacles;
        Arc::new(world)
    }

    #[test]
    fn obstacle_ahead_appears_in_the_middle_of_the_mask() {
        let world = world_with(vec![Obstacle {
            center: Vector2::new(6.0, 5.0),
            radius: 0.3,
        }]);
        let camera = CameraModel::new(&CameraConfig::default());
        let mut segmenter = SyntheticSegmenter::new(world, camera.clone());

        // Facing +X from (5, 5): the obstacle is 1 m straight ahead.
        let frame = CameraFrame {
            sequence: 0,
            pose: Pose2::new(5.0, 5.0, 0.0),
        };
        let segmentation = segmenter.segment(&frame).unwrap();
        let mask = segmentation.mask;
        assert_eq!(mask.shape(), (camera.height, camera.width));
        assert_eq!(mask[(camera.height / 2, camera.width / 2)], OBSTACLE);
        assert_eq!(mask[(camera.height - 1, camera.width / 2)], 0);
        assert_eq!(mask[(camera.height / 2, 0)], 0);
        assert!(segmentation.overlay.is_none());
    }

    #[test]
    fn walls_are_obstacles() {
        let world = world_with(Vec::new());
        let camera = CameraModel::new(&CameraConfig::default());
        let mut segmenter = SyntheticSegmenter::new(world, camera.clone()).with_overlay(true);

        // Half a metre from the +X wall, facing it.
        let frame = CameraFrame {
            sequence: 0,
            pose: Pose2::new(9.5, 5.0, 0.0),
        };
        let segmentation = segmenter.segment(&frame).unwrap();
        assert_eq!(segmentation.mask[(0, camera.width / 2)], OBSTACLE);
        assert_eq!(segmentation.mask[(camera.height - 1, camera.width / 2)], 0);
        let overlay = segmentation.overlay.unwrap();
        assert_eq!(overlay.dimensions(), (camera.width as u32, camera.height as u32));
        assert_eq!(*overlay.get_pixel(camera.width as u32 / 2, 0), OBSTACLE_COLOR);
    }
}
