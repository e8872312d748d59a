// scout_sim/src/simulation/world.rs

use nalgebra::Vector2;
use rand::Rng;
use rand_distr::Uniform;
use tracing::{debug, warn};

use crate::simulation::config::WorldConfig;
use crate::simulation::core::pose::Pose2;
use crate::simulation::core::prng::SimulationRng;

/// Placement attempts per obstacle before giving up on it.
const MAX_PLACEMENT_ATTEMPTS: usize = 100;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Obstacle {
    pub center: Vector2<f64>,
    pub radius: f64,
}

impl Obstacle {
    pub fn contains(&self, point: &Vector2<f64>) -> bool {
        (point - self.center).norm_squared() <= self.radius * self.radius
    }
}

/// A square arena with circular obstacles and one target.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    pub size: f64,
    pub obstacles: Vec<Obstacle>,
    pub target: Vector2<f64>,
    pub target_radius: f64,
    pub start: Pose2,
}

impl World {
    /// Builds the world described by `config`, drawing any random parts from `rng`.
    pub fn generate(config: &WorldConfig, rng: &mut SimulationRng) -> Self {
        let [x, y, heading_deg] = config.start_pose;
        let start = Pose2::new(x, y, heading_deg.to_radians());
        let margin = config.clearance_m.min(config.size_m / 2.0);
        let position = Uniform::new_inclusive(margin, config.size_m - margin);

        let target = match config.target {
            Some([x, y]) => Vector2::new(x, y),
            None => {
                // Prefer a target that is not right next to the start.
                let mut target = Vector2::new(rng.0.sample(position), rng.0.sample(position));
                for _ in 0..MAX_PLACEMENT_ATTEMPTS {
                    if start.distance_to(&target) >= config.size_m / 2.0 {
                        break;
                    }
                    target = Vector2::new(rng.0.sample(position), rng.0.sample(position));
                }
                target
            }
        };

        let [min_radius, max_radius] = config.obstacle_radius_m;
        let radius = Uniform::new_inclusive(min_radius, max_radius);
        let mut obstacles = Vec::with_capacity(config.obstacle_count);
        for index in 0..config.obstacle_count {
            let placed = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
                let candidate = Obstacle {
                    center: Vector2::new(rng.0.sample(position), rng.0.sample(position)),
                    radius: rng.0.sample(radius),
                };
                let keep_out = candidate.radius + config.clearance_m;
                let clear = start.distance_to(&candidate.center) > keep_out
                    && (target - candidate.center).norm() > keep_out;
                clear.then_some(candidate)
            });
            match placed {
                Some(obstacle) => obstacles.push(obstacle),
                None => warn!("Could not place obstacle {} clear of the start and target", index),
            }
        }

        debug!(
            "Generated world: {} obstacles, target at ({:.2}, {:.2})",
            obstacles.len(),
            target.x,
            target.y
        );
        Self {
            size: config.size_m,
            obstacles,
            target,
            target_radius: config.target_radius_m,
            start,
        }
    }

    /// True for points inside an obstacle or outside the arena walls.
    pub fn is_blocked(&self, point: &Vector2<f64>) -> bool {
        !self.in_bounds(point) || self.obstacles.iter().any(|o| o.contains(point))
    }

    pub fn in_bounds(&self, point: &Vector2<f64>) -> bool {
        (0.0..=self.size).contains(&point.x) && (0.0..=self.size).contains(&point.y)
    }

    /// True when a disc of `radius` around `point` overlaps an obstacle or a wall.
    pub fn collides(&self, point: &Vector2<f64>, radius: f64) -> bool {
        let off_walls = point.x >= radius
            && point.y >= radius
            && point.x <= self.size - radius
            && point.y <= self.size - radius;
        !off_walls
            || self
                .obstacles
                .iter()
                .any(|o| (point - o.center).norm() < o.radius + radius)
    }
}
