//! Kinematic integration system.
//!
//! Updates every target in parallel on a working copy, then commits the whole
//! batch. A non-finite result rejects the batch so the registry never holds a
//! half-moved tick.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use airdefense_core::error::{Result, SimError};

use crate::registry::TargetRegistry;
use crate::target::MotionModel;

/// Advance all targets by `dt` seconds.
///
/// Each target gets its own RNG seeded from `rng` in id order, so the outcome
/// does not depend on how rayon schedules the work.
pub fn run(
    registry: &mut TargetRegistry,
    dt: f64,
    motion: &MotionModel,
    rng: &mut ChaCha8Rng,
) -> Result<()> {
    let mut moved = registry.working_copy();
    let seeds: Vec<u64> = moved.iter().map(|_| rng.gen()).collect();

    moved.par_iter_mut().zip(seeds).for_each(|(target, seed)| {
        let mut target_rng = ChaCha8Rng::seed_from_u64(seed);
        target.update_position(dt, motion, &mut target_rng);
    });

    if let Some(bad) = moved.iter().find(|t| !t.is_finite()) {
        return Err(SimError::NonFiniteState { target_id: bad.id });
    }

    registry.commit(moved);
    Ok(())
}
