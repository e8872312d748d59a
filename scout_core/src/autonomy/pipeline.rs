// scout_core/src/autonomy/pipeline.rs

use std::sync::atomic::{AtomicU64, Ordering};

use image::RgbImage;
use parking_lot::Mutex;
use tracing::{debug, info};

use super::{nearest_detection, AutonomyError, CommandSink, Detector, Segmenter};
use crate::control::SteeringController;
use crate::types::{ControlOutput, Decision, ObjectPosition};

/// What happened to a frame handed to [`AutonomyLoop::process_frame`].
#[derive(Debug)]
pub enum FrameOutcome {
    Processed(FrameReport),
    /// Another frame was still being processed; this one was discarded.
    Dropped,
}

#[derive(Debug, Clone)]
pub struct FrameReport {
    pub iteration: u64,
    pub target: Option<ObjectPosition>,
    pub collisions: Vec<bool>,
    pub decision: Decision,
    pub output: ControlOutput,
    /// Present only in debug mode.
    pub debug_image: Option<RgbImage>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LoopStats {
    pub processed: u64,
    pub dropped: u64,
    pub last_output: Option<ControlOutput>,
}

struct LoopState<S, D, T> {
    controller: SteeringController,
    segmenter: S,
    detector: D,
    sink: T,
    debug: bool,
    signaling: bool,
    last_output: Option<ControlOutput>,
}

/// Runs the segment → detect → steer → send pipeline, one frame at a time.
///
/// At most one frame is in flight. A frame that arrives while another is being
/// processed is dropped, not queued: by the time it could run, a fresher frame
/// exists.
pub struct AutonomyLoop<S, D, T> {
    state: Mutex<LoopState<S, D, T>>,
    processed: AtomicU64,
    dropped: AtomicU64,
}

impl<S, D, T> AutonomyLoop<S, D, T>
where
    S: Segmenter,
    D: Detector<Frame = S::Frame>,
    T: CommandSink,
{
    pub fn new(controller: SteeringController, segmenter: S, detector: D, sink: T) -> Self {
        Self {
            state: Mutex::new(LoopState {
                controller,
                segmenter,
                detector,
                sink,
                debug: false,
                signaling: false,
                last_output: None,
            }),
            processed: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// In debug mode every report carries the rendered overlay.
    pub fn with_debug(self, debug: bool) -> Self {
        self.state.lock().debug = debug;
        self
    }

    pub fn set_debug(&self, debug: bool) {
        self.state.lock().debug = debug;
    }

    pub fn stats(&self) -> LoopStats {
        LoopStats {
            processed: self.processed.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            last_output: self.state.lock().last_output,
        }
    }

    /// Runs `f` against the controller while no frame is in flight.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut SteeringController) -> R) -> R {
        f(&mut self.state.lock().controller)
    }

    /// Processes one frame, or drops it if another is in flight.
    pub fn process_frame(&self, frame: &S::Frame) -> Result<FrameOutcome, AutonomyError> {
        let Some(mut state) = self.state.try_lock() else {
            let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            debug!("[AutonomyLoop] frame dropped, {} so far", dropped);
            return Ok(FrameOutcome::Dropped);
        };

        let report = state.run(frame)?;
        self.processed.fetch_add(1, Ordering::Relaxed);
        Ok(FrameOutcome::Processed(report))
    }
}

impl<S, D, T> LoopState<S, D, T>
where
    S: Segmenter,
    D: Detector<Frame = S::Frame>,
    T: CommandSink,
{
    fn run(&mut self, frame: &S::Frame) -> Result<FrameReport, AutonomyError> {
        let segmentation = self.segmenter.segment(frame)?;
        let detections = self.detector.detect(frame)?;

        let overlay = if self.debug { segmentation.overlay } else { None };
        self.controller.set_map(Some(&segmentation.mask), overlay)?;

        let target = nearest_detection(&detections)
            .map(|detection| self.controller.detection_to_grid(&detection))
            .transpose()?;

        let collisions = self.controller.check_collisions()?;
        if self.debug {
            self.controller.draw_collisions()?;
        }

        let decision = self.controller.decide(target)?;
        if self.debug {
            self.controller.draw_direction(target)?;
        }

        let output = decision.output();
        self.sink.send(output)?;
        self.last_output = Some(output);

        if decision.signal != self.signaling {
            self.signaling = decision.signal;
            if decision.signal {
                info!("[AutonomyLoop] target reached, signaling");
            } else {
                info!("[AutonomyLoop] signaling cleared, resuming");
            }
        }

        Ok(FrameReport {
            iteration: self.controller.iteration(),
            target,
            collisions,
            decision,
            output,
            debug_image: if self.debug {
                self.controller.debug_image().cloned()
            } else {
                None
            },
        })
    }
}
