//! Simulation: world state, level loading, the per-tick step.

pub mod arena;
pub mod event;
pub mod level;
pub mod step;
pub mod world;
