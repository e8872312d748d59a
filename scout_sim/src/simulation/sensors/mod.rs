// scout_sim/src/simulation/sensors/mod.rs

//! Ground-truth stand-ins for the segmentation network and the target detector.

pub mod camera;
pub mod detection;
pub mod segmentation;

pub use camera::{CameraFrame, CameraModel};
pub use detection::SyntheticDetector;
pub use segmentation::SyntheticSegmenter;
