// scout_core/src/autonomy/mod.rs

//! Per-frame orchestration and the contracts for its collaborators.
//!
//! The segmentation network, the target detector and the command transport all
//! live outside this crate. They plug into [`AutonomyLoop`] through the
//! [`Segmenter`], [`Detector`] and [`CommandSink`] traits.

mod drive;
mod pipeline;
pub mod wire;

pub use drive::WheelDuty;
pub use pipeline::{AutonomyLoop, FrameOutcome, FrameReport, LoopStats};
pub use wire::{WireCommand, WireError};

use image::RgbImage;
use nalgebra::DMatrix;
use thiserror::Error;

use crate::control::ControlError;
use crate::types::{BoundingBox, ControlOutput};

#[derive(Debug, Error)]
pub enum AutonomyError {
    #[error("Segmentation failed: {0}")]
    Segmentation(String),

    #[error("Detection failed: {0}")]
    Detection(String),

    #[error("Transport failed: {0}")]
    Transport(String),

    #[error(transparent)]
    Control(#[from] ControlError),
}

// --- Collaborator Contracts ---

/// Output of one segmentation pass.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Occupancy mask; any non-zero value is an obstacle. Need not match the grid shape.
    pub mask: DMatrix<u8>,
    /// Optional visualisation of the segmentation, used as the debug canvas.
    pub overlay: Option<RgbImage>,
}

/// Turns a camera frame into an occupancy mask.
pub trait Segmenter: Send {
    type Frame;

    fn segment(&mut self, frame: &Self::Frame) -> Result<Segmentation, AutonomyError>;
}

/// Finds target candidates in a camera frame, in original-image pixels.
/// An empty list is a normal result.
pub trait Detector: Send {
    type Frame;

    fn detect(&mut self, frame: &Self::Frame) -> Result<Vec<BoundingBox>, AutonomyError>;
}

/// Delivers one output per processed frame to the vehicle.
pub trait CommandSink: Send {
    fn send(&mut self, output: ControlOutput) -> Result<(), AutonomyError>;
}

/// The detection closest to the vehicle: the one whose bottom edge is lowest in
/// the image. The earliest one wins ties.
pub fn nearest_detection(detections: &[BoundingBox]) -> Option<BoundingBox> {
    let mut nearest: Option<BoundingBox> = None;
    for detection in detections {
        if nearest.map_or(true, |n| detection.bottom() > n.bottom()) {
            nearest = Some(*detection);
        }
    }
    nearest
}
