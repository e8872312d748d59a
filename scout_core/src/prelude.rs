// scout_core/src/prelude.rs

// --- Core Data Structures (The "nouns" of the library) ---
pub use crate::types::{
    BoundingBox, Cell, ControlOutput, Decision, GridShape, ObjectPosition, VelocityCommand,
};

// --- Planning ---
pub use crate::planning::{AngleUnit, HeadingMethod, Path, PathFinder, PlannerConfig, PlanningError};

// --- Map Ingestion ---
pub use crate::mapping::{empty_map, BlurThreshold, CostFieldConfig, MapLayers};

// --- Control ---
pub use crate::control::{
    Axis, ControlError, ControllerConfig, PidGains, ProbeConfig, SteeringController,
};

// --- Orchestration and collaborator contracts ---
pub use crate::autonomy::{
    nearest_detection, AutonomyError, AutonomyLoop, CommandSink, Detector, FrameOutcome,
    FrameReport, Segmentation, Segmenter, WheelDuty, WireCommand,
};
