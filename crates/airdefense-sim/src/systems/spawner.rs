//! Spawning system. Rolls once per tick for a new random target.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::registry::TargetRegistry;
use crate::target::SpawnParams;

/// Roll the per-tick spawn chance and spawn if it succeeds.
///
/// The roll is always drawn, even at capacity, so the random stream does not
/// depend on how full the registry is. Returns the new id, if any.
pub fn run(
    registry: &mut TargetRegistry,
    rng: &mut ChaCha8Rng,
    params: &SpawnParams,
    spawn_probability: f64,
) -> Option<u32> {
    if !rng.gen_bool(spawn_probability) {
        return None;
    }
    registry.spawn(rng, params)
}
