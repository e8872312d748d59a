// scout_sim/src/simulation/core/mod.rs

pub mod error;
pub mod pose;
pub mod prng;
