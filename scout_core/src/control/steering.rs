// scout_core/src/control/steering.rs

use image::RgbImage;
use nalgebra::DMatrix;
use tracing::{debug, trace};

use super::config::ControllerConfig;
use super::error::ControlError;
use super::iteration::{DirectionResult, IterationCache, Once};
use super::pid::{Axis, PidGains, VelocitySmoother};
use super::probes::{self, CollisionProbes};
use super::transforms::ScaleTransform;
use crate::mapping::{MapLayers, MapProcessor};
use crate::planning::{grid, AngleUnit, PathFinder};
use crate::types::{BoundingBox, Cell, Decision, GridShape, ObjectPosition, VelocityCommand};

// --- Raw command table ---
const FORWARD: VelocityCommand = VelocityCommand {
    linear: 100,
    angular: 0,
};
const VEER_RIGHT: VelocityCommand = VelocityCommand {
    linear: 100,
    angular: -50,
};
const VEER_LEFT: VelocityCommand = VelocityCommand {
    linear: 100,
    angular: 50,
};
const SPIN_RIGHT: VelocityCommand = VelocityCommand {
    linear: 0,
    angular: -100,
};
const SPIN_LEFT: VelocityCommand = VelocityCommand {
    linear: 0,
    angular: 100,
};

/// Reactive obstacle avoidance blended with A*-guided target seeking.
///
/// One controller iteration starts with [`set_map`](Self::set_map) and a new
/// mask. Every query after that (collisions, direction, signalling, debug
/// drawing) is computed at most once per iteration and key, then served from
/// the [`IterationCache`].
///
/// # Priority
/// 1. Left probes hit, right clear: veer right `(100, -50)`.
/// 2. Right probes hit, left clear: veer left `(100, 50)`.
/// 3. Both sides hit: spin in place `(0, ±100)`, keeping the sign of the
///    previous smoothed angular command (negative keeps spinning right).
/// 4. No hits and a target: stop if close enough to signal, otherwise follow
///    the initial heading of the planned path.
/// 5. Otherwise: straight ahead `(100, 0)`.
///
/// The raw command is then smoothed, and the signal check runs once more so
/// that smoothing momentum cannot carry the vehicle past a close target.
#[derive(Debug)]
pub struct SteeringController {
    pub(super) config: ControllerConfig,
    pub(super) probes: CollisionProbes,
    processor: MapProcessor,
    pub(super) planner: PathFinder,
    /// Iteration whose expanded map and cost field the planner currently holds.
    planner_iteration: Option<u64>,
    smoother: VelocitySmoother,
    pub(super) layers: Option<MapLayers>,
    pub(super) debug_image: Option<RgbImage>,
    pub(super) cache: IterationCache,
}

impl SteeringController {
    pub fn new(config: ControllerConfig) -> Result<Self, ControlError> {
        config.validate()?;

        let probes = CollisionProbes::new(&config.probes, config.grid_shape);
        let processor = MapProcessor::new(config.grid_shape, &config.dilation, &config.cost_field);
        let planner = PathFinder::new(config.planner.clone())?;
        let smoother = VelocitySmoother::new(
            config.linear_pid,
            config.angular_pid,
            config.pid_sample_period,
        );

        Ok(Self {
            config,
            probes,
            processor,
            planner,
            planner_iteration: None,
            smoother,
            layers: None,
            debug_image: None,
            cache: IterationCache::new(),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn grid_shape(&self) -> GridShape {
        self.config.grid_shape
    }

    /// Where the vehicle sits in the grid: bottom row, middle column.
    pub fn forward_reference(&self) -> Cell {
        probes::forward_reference(self.config.grid_shape)
    }

    pub fn iteration(&self) -> u64 {
        self.cache.iteration()
    }

    pub fn layers(&self) -> Option<&MapLayers> {
        self.layers.as_ref()
    }

    pub fn planner(&self) -> &PathFinder {
        &self.planner
    }

    pub fn probes(&self) -> &CollisionProbes {
        &self.probes
    }

    pub fn debug_image(&self) -> Option<&RgbImage> {
        self.debug_image.as_ref()
    }

    /// Hands the current debug image over to the caller.
    pub fn take_debug_image(&mut self) -> Option<RgbImage> {
        self.debug_image.take()
    }

    // --- Map ingestion ---

    /// Starts a new iteration when `raw` is given; otherwise keeps working on
    /// the current maps.
    ///
    /// A new mask also resets the debug image to a black grid-sized canvas,
    /// unless `debug_image` supplies one to draw on.
    pub fn set_map(
        &mut self,
        raw: Option<&DMatrix<u8>>,
        debug_image: Option<RgbImage>,
    ) -> Result<(), ControlError> {
        if let Some(mask) = raw {
            let layers = self.processor.process(mask).ok_or(ControlError::EmptyMap)?;
            if layers.shape() != self.config.grid_shape {
                return Err(ControlError::ShapeMismatch {
                    expected: self.config.grid_shape,
                    found: layers.shape(),
                });
            }

            let iteration = self.cache.advance();
            debug!(
                "[SteeringController] iteration {} from a {}x{} mask",
                iteration, layers.source_shape.rows, layers.source_shape.cols
            );
            self.layers = Some(layers);
            self.planner_iteration = None;
            if debug_image.is_none() {
                let shape = self.config.grid_shape;
                self.debug_image = Some(RgbImage::new(shape.cols as u32, shape.rows as u32));
            }
        }

        if let Some(image) = debug_image {
            if image.width() == 0 || image.height() == 0 {
                return Err(ControlError::EmptyMap);
            }
            self.debug_image = Some(image);
        }
        Ok(())
    }

    fn layers_ref(&self) -> Result<&MapLayers, ControlError> {
        self.layers.as_ref().ok_or(ControlError::MapNotSet)
    }

    // --- Coordinate transforms ---

    pub fn original_to_grid(&self) -> Result<ScaleTransform, ControlError> {
        let source = self.layers_ref()?.source_shape;
        ScaleTransform::new(source, self.config.grid_shape).ok_or(ControlError::EmptyMap)
    }

    pub fn grid_to_debug(&self) -> Result<ScaleTransform, ControlError> {
        let image = self.debug_image.as_ref().ok_or(ControlError::MapNotSet)?;
        let debug_shape = GridShape::new(image.height() as usize, image.width() as usize);
        ScaleTransform::new(self.config.grid_shape, debug_shape).ok_or(ControlError::EmptyMap)
    }

    pub fn original_to_debug(&self) -> Result<ScaleTransform, ControlError> {
        let source = self.layers_ref()?.source_shape;
        let to = self.grid_to_debug()?.to_shape();
        ScaleTransform::new(source, to).ok_or(ControlError::EmptyMap)
    }

    /// Converts a detector box in original-image pixels into a grid-unit target.
    pub fn detection_to_grid(&self, detection: &BoundingBox) -> Result<ObjectPosition, ControlError> {
        let transform = self.original_to_grid()?;
        let centre = transform.apply(detection.center());
        let (height, width) = transform.apply_size(detection.height, detection.width);
        Ok(ObjectPosition::new(centre.row, centre.col, height, width))
    }

    // --- Per-iteration queries ---

    /// One flag per probe block: left blocks first, then right.
    pub fn check_collisions(&mut self) -> Result<Vec<bool>, ControlError> {
        if let Some(hit) = self.cache.collisions() {
            return Ok(hit.to_vec());
        }
        let collisions = self.probes.check(&self.layers_ref()?.raw);
        trace!("[SteeringController] collisions {:?}", collisions);
        self.cache.store_collisions(collisions.clone());
        Ok(collisions)
    }

    /// Clears a `(height + 2) x (width + 2)` box around the target in the
    /// expanded map so the planner may route into it. Only the first call per
    /// iteration has any effect.
    pub fn remove_object_region(&mut self, target: &ObjectPosition) -> Result<(), ControlError> {
        if self.cache.is_done(Once::RegionCarved) {
            return Ok(());
        }
        let layers = self.layers.as_mut().ok_or(ControlError::MapNotSet)?;
        let shape = grid::shape_of(&layers.expanded);
        let (rows, cols) = (shape.rows as isize, shape.cols as isize);

        let (mut height, mut width) = (target.height + 2, target.width + 2);
        let mut top = target.center_row - height.div_euclid(2);
        let mut left = target.center_col - width.div_euclid(2);

        if top < 0 {
            height += top;
            top = 0;
        }
        if top + height > rows {
            height = rows - top;
        }
        if left + width > cols {
            width = cols - left;
        }
        if left < 0 {
            width += left;
            left = 0;
        }

        if height > 0 && width > 0 {
            layers
                .expanded
                .view_mut(
                    (top as usize, left as usize),
                    (height as usize, width as usize),
                )
                .fill(0);
        }
        trace!(
            "[SteeringController] carved {}x{} at ({}, {})",
            height.max(0),
            width.max(0),
            top,
            left
        );

        self.cache.mark_done(Once::RegionCarved);
        self.planner_iteration = None;
        Ok(())
    }

    /// True iff a target is given and its centre row is strictly below
    /// `rows - min_signal_distance`.
    pub fn should_signal(&mut self, target: Option<ObjectPosition>) -> bool {
        if let Some(hit) = self.cache.signal(&target) {
            return hit;
        }
        let threshold = self.config.grid_shape.rows as isize - self.config.min_signal_distance as isize;
        let signal = target.is_some_and(|t| t.center_row > threshold);
        self.cache.store_signal(target, signal);
        signal
    }

    /// The smoothed command for this iteration, before any signal override by the caller.
    pub fn compute_direction(
        &mut self,
        target: Option<ObjectPosition>,
    ) -> Result<VelocityCommand, ControlError> {
        if let Some(hit) = self.cache.direction(&target) {
            return Ok(hit.command);
        }

        let collisions = self.check_collisions()?;
        let (left, right) = probes::split_sides(&collisions);
        let left_hit = left.iter().any(|&hit| hit);
        let right_hit = right.iter().any(|&hit| hit);

        let mut seeking_target = false;
        let raw = match (left_hit, right_hit) {
            (true, false) => VEER_RIGHT,
            (false, true) => VEER_LEFT,
            (true, true) => {
                if self.smoother.previous(Axis::Angular) < 0.0 {
                    SPIN_RIGHT
                } else {
                    SPIN_LEFT
                }
            }
            (false, false) => match target {
                Some(t) if self.should_signal(Some(t)) => VelocityCommand::STOP,
                Some(t) => match self.heading_to(t.center())? {
                    Some(heading) => {
                        seeking_target = true;
                        VelocityCommand::from_f64(100.0 * heading.sin(), -100.0 * heading.cos())
                    }
                    None => FORWARD,
                },
                None => FORWARD,
            },
        };
        debug!(
            "[SteeringController] left_hit={} right_hit={} seeking={} raw={:?}",
            left_hit, right_hit, seeking_target, raw
        );

        let mut command = self.smoother.smooth(raw);
        if self.should_signal(target) {
            command = VelocityCommand::STOP;
        }

        self.cache.store_direction(
            target,
            DirectionResult {
                command,
                seeking_target,
            },
        );
        Ok(command)
    }

    /// Whether this iteration's direction for `target` came from a planned path.
    pub fn is_seeking_target(&self, target: Option<ObjectPosition>) -> bool {
        self.cache
            .direction(&target)
            .is_some_and(|d| d.seeking_target)
    }

    /// Carves the target region, computes the direction and the signal flag.
    pub fn decide(&mut self, target: Option<ObjectPosition>) -> Result<Decision, ControlError> {
        if let Some(t) = &target {
            self.remove_object_region(t)?;
        }
        let command = self.compute_direction(target)?;
        let signal = self.should_signal(target);
        Ok(Decision::new(command, signal))
    }

    /// Creates the PID loop for `axis` or retunes it, keeping its integral.
    pub fn retune_pid(&mut self, axis: Axis, gains: PidGains) -> Result<(), ControlError> {
        if !gains.is_finite() {
            return Err(ControlError::InvalidConfig(format!(
                "{axis:?} PID gains must be finite"
            )));
        }
        self.smoother.retune(axis, gains);
        Ok(())
    }

    pub fn smoother(&self) -> &VelocitySmoother {
        &self.smoother
    }

    // --- Planning ---

    /// Loads this iteration's expanded map and cost field into the planner if it
    /// does not hold them already.
    pub(super) fn sync_planner(&mut self) -> Result<(), ControlError> {
        let iteration = self.cache.iteration();
        if self.planner_iteration == Some(iteration) {
            return Ok(());
        }
        let layers = self.layers.as_ref().ok_or(ControlError::MapNotSet)?;
        self.planner
            .set_maps(layers.expanded.clone(), Some(layers.cost.clone()))?;
        self.planner_iteration = Some(iteration);
        Ok(())
    }

    fn heading_to(&mut self, goal: Cell) -> Result<Option<f64>, ControlError> {
        if let Some(hit) = self.cache.heading(goal) {
            return Ok(hit);
        }
        self.sync_planner()?;
        let start = self.forward_reference();
        let heading = self.planner.initial_heading(start, goal, AngleUnit::Radians);
        self.cache.store_heading(goal, heading);
        Ok(heading)
    }
}
