// scout_sim/src/lib.rs

//! A headless closed-loop simulator for the scout controller.
//!
//! A seeded world of circular obstacles is seen through a synthetic camera.
//! Ground-truth segmentation and detection feed the [`AutonomyLoop`], whose
//! commands travel as wire text to a differential-drive vehicle model.
//!
//! [`AutonomyLoop`]: scout_core::autonomy::AutonomyLoop

// This prelude is for convenience for other files WITHIN the scout_sim crate.
pub mod prelude;

pub mod cli;
pub mod simulation;
