// scout_core/src/lib.rs

// This file defines the public modules of the navigation core.
pub mod autonomy;
pub mod control;
pub mod mapping;
pub mod planning;
pub mod prelude;
pub mod rendering;
pub mod types;
