// scout_sim/src/simulation/runner.rs

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use scout_core::prelude::*;
use tracing::{debug, info, warn};

use crate::simulation::config::ScenarioConfig;
use crate::simulation::core::error::SimError;
use crate::simulation::core::pose::Pose2;
use crate::simulation::core::prng::SimulationRng;
use crate::simulation::sensors::{CameraFrame, CameraModel, SyntheticDetector, SyntheticSegmenter};
use crate::simulation::transport::{self, LinkReceiver, LinkSender};
use crate::simulation::vehicle::DiffDriveVehicle;
use crate::simulation::world::World;

type SimLoop = AutonomyLoop<SyntheticSegmenter, SyntheticDetector, LinkSender>;

/// Outcome of a closed-loop run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frames_processed: u64,
    pub frames_dropped: u64,
    pub signaled: bool,
    /// Distance from the vehicle to the target when the run ended, in metres.
    pub final_distance: f64,
    pub distance_travelled: f64,
    /// Frames that ended with the vehicle touching an obstacle or a wall.
    pub contact_frames: usize,
    pub final_pose: Pose2,
    /// Every command line sent over the link.
    pub transcript: Vec<String>,
}

/// One closed-loop simulation: world, sensors, controller, link and vehicle.
pub struct Simulation {
    config: ScenarioConfig,
    world: Arc<World>,
    camera: CameraModel,
    autonomy: SimLoop,
    link: LinkReceiver,
    vehicle: DiffDriveVehicle,
    debug_dir: Option<PathBuf>,
}

impl Simulation {
    /// Builds the world from the scenario seed and wires every collaborator.
    ///
    /// With `debug_dir`, the per-frame debug overlays are written there as PNG.
    pub fn new(config: ScenarioConfig, debug_dir: Option<PathBuf>) -> Result<Self, SimError> {
        config.validate()?;
        let mut rng = SimulationRng::from_seed(config.simulation.seed);
        let world = Arc::new(World::generate(&config.world, &mut rng));
        let camera = CameraModel::new(&config.camera);

        if let Some(dir) = &debug_dir {
            fs::create_dir_all(dir)?;
        }
        let debug = debug_dir.is_some();

        let controller = SteeringController::new(config.controller.clone())?;
        let segmenter = SyntheticSegmenter::new(world.clone(), camera.clone()).with_overlay(debug);
        let detector = SyntheticDetector::new(world.clone(), camera.clone());
        let (sender, link) = transport::link();
        let autonomy = AutonomyLoop::new(controller, segmenter, detector, sender).with_debug(debug);
        let vehicle = DiffDriveVehicle::new(world.start, &config.vehicle);

        Ok(Self {
            config,
            world,
            camera,
            autonomy,
            link,
            vehicle,
            debug_dir,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn vehicle(&self) -> &DiffDriveVehicle {
        &self.vehicle
    }

    /// Runs until the controller signals or the frame budget is spent.
    pub fn run(&mut self) -> Result<RunSummary, SimError> {
        let frames = self.config.simulation.frames;
        let dt = self.config.simulation.frame_period_s;
        let radius = self.config.vehicle.radius_m;
        let mut contact_frames = 0;
        let mut in_contact = false;

        for sequence in 0..frames as u64 {
            let frame = CameraFrame {
                sequence,
                pose: self.vehicle.pose,
            };
            match self.autonomy.process_frame(&frame)? {
                FrameOutcome::Processed(report) => self.dump_debug_image(sequence, report.debug_image)?,
                FrameOutcome::Dropped => debug!("Frame {} dropped", sequence),
            }

            match self.link.latest() {
                Some(ControlOutput::Drive(command)) => {
                    self.vehicle.command(WheelDuty::from_command(command));
                }
                Some(ControlOutput::Signal) => {
                    self.vehicle.command(WheelDuty::STOPPED);
                    info!("Vehicle signaled at frame {}", sequence);
                    break;
                }
                None => {}
            }

            self.vehicle.step(dt);
            let touching = self.world.collides(&self.vehicle.pose.position, radius);
            if touching {
                contact_frames += 1;
                if !in_contact {
                    warn!(
                        "Vehicle touched an obstacle at ({:.2}, {:.2})",
                        self.vehicle.pose.position.x, self.vehicle.pose.position.y
                    );
                }
            }
            in_contact = touching;
        }

        if self.debug_dir.is_some() {
            self.dump_snapshot()?;
        }

        let stats = self.autonomy.stats();
        let summary = RunSummary {
            frames_processed: stats.processed,
            frames_dropped: stats.dropped,
            signaled: self.link.signaled(),
            final_distance: self.vehicle.pose.distance_to(&self.world.target),
            distance_travelled: self.vehicle.odometer(),
            contact_frames,
            final_pose: self.vehicle.pose,
            transcript: self.link.transcript().to_vec(),
        };
        info!(
            "Run finished: {} frames processed, {} dropped, signaled={}, {:.2} m to target, {:.2} m travelled, {} contact frames",
            summary.frames_processed,
            summary.frames_dropped,
            summary.signaled,
            summary.final_distance,
            summary.distance_travelled,
            summary.contact_frames
        );
        Ok(summary)
    }

    fn dump_debug_image(&self, sequence: u64, image: Option<image::RgbImage>) -> Result<(), SimError> {
        let (Some(dir), Some(image)) = (&self.debug_dir, image) else {
            return Ok(());
        };
        image.save(frame_path(dir, sequence))?;
        Ok(())
    }

    /// Writes the processing stages for the final pose, when the target is in view.
    fn dump_snapshot(&mut self) -> Result<(), SimError> {
        let Some(dir) = self.debug_dir.clone() else {
            return Ok(());
        };
        let frame = CameraFrame {
            sequence: u64::MAX,
            pose: self.vehicle.pose,
        };
        let detector = SyntheticDetector::new(self.world.clone(), self.camera.clone());
        let Some(target) = detector.project_target(&frame) else {
            debug!("Target out of view, no processing snapshot");
            return Ok(());
        };
        let mut segmenter = SyntheticSegmenter::new(self.world.clone(), self.camera.clone());
        let mask = segmenter.segment(&frame)?.mask;

        let snapshot = self
            .autonomy
            .with_controller(|c| c.processing_snapshot(&mask, target.center()))?;
        snapshot.save(dir.join("snapshot.png"))?;
        Ok(())
    }
}

fn frame_path(dir: &Path, sequence: u64) -> PathBuf {
    dir.join(format!("frame_{sequence:05}.png"))
}
