//! Air defense engagement simulation.
//!
//! Owns the target registry, runs the per-tick stages and produces
//! `SimSnapshot`s for whoever drives it.

pub mod engagement;
pub mod engine;
pub mod registry;
pub mod systems;
pub mod target;

pub use airdefense_core as core;
pub use engine::SimulationEngine;

#[cfg(test)]
mod tests;
