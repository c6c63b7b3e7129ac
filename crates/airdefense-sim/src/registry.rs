//! Target registry, the only owner of target state.
//!
//! Ids are assigned monotonically from 1 and never reused. Iteration order is
//! ascending id, which is also spawn order.

use std::collections::BTreeMap;

use rand::Rng;

use airdefense_core::config::SimConfig;
use airdefense_core::enums::RemovalReason;
use airdefense_core::state::TargetView;
use airdefense_core::types::{Position, Velocity};

use crate::target::{self, SpawnParams, Target};

#[derive(Debug, Clone)]
pub struct TargetRegistry {
    targets: BTreeMap<u32, Target>,
    next_id: u32,
    max_targets: usize,
    grace_ticks: u32,
}

impl TargetRegistry {
    pub fn new(max_targets: usize, grace_ticks: u32) -> Self {
        Self {
            targets: BTreeMap::new(),
            next_id: 1,
            max_targets,
            grace_ticks,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.max_targets, config.grace_ticks)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.targets.len() >= self.max_targets
    }

    pub fn max_targets(&self) -> usize {
        self.max_targets
    }

    pub fn grace_ticks(&self) -> u32 {
        self.grace_ticks
    }

    /// Number of targets not yet destroyed.
    pub fn active_count(&self) -> usize {
        self.targets.values().filter(|t| !t.is_destroyed()).count()
    }

    pub fn get(&self, id: u32) -> Option<&Target> {
        self.targets.get(&id)
    }

    /// Targets in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.values()
    }

    /// Spawn a random target. Returns `None` without consuming an id when the
    /// registry is at capacity.
    pub fn spawn<R: Rng + ?Sized>(&mut self, rng: &mut R, params: &SpawnParams) -> Option<u32> {
        if self.is_full() {
            return None;
        }
        let id = self.allocate_id();
        self.targets.insert(id, target::spawn_random(rng, id, params));
        Some(id)
    }

    /// Add a target with a known state. Same capacity rule as [`Self::spawn`].
    pub fn insert(&mut self, position: Position, velocity: Velocity) -> Option<u32> {
        if self.is_full() {
            return None;
        }
        let id = self.allocate_id();
        self.targets.insert(id, Target::new(id, position, velocity));
        Some(id)
    }

    pub fn remove(&mut self, id: u32) -> Option<Target> {
        self.targets.remove(&id)
    }

    /// Snapshot of every target, ascending by id.
    pub fn all_targets(&self) -> Vec<TargetView> {
        self.targets.values().map(Target::view).collect()
    }

    /// Destroy a target and start its grace countdown.
    /// Returns the destroyed target, or `None` if it is missing or already dead.
    pub fn destroy(&mut self, id: u32) -> Option<TargetView> {
        let grace_ticks = self.grace_ticks;
        let target = self.targets.get_mut(&id)?;
        target.destroy(grace_ticks).then(|| target.view())
    }

    /// Destroy the `index`-th non-destroyed target in id order.
    /// Out-of-range indices are a no-op.
    pub fn destroy_nth_active(&mut self, index: usize) -> Option<TargetView> {
        let id = self
            .targets
            .values()
            .filter(|t| !t.is_destroyed())
            .nth(index)
            .map(|t| t.id)?;
        self.destroy(id)
    }

    /// Advance grace counters and drop targets that are finished.
    ///
    /// A destroyed target goes when its countdown reaches zero; any target
    /// farther than `removal_range` from `sensor` has left the area.
    pub fn tick(&mut self, sensor: &Position, removal_range: f64) -> Vec<(u32, RemovalReason)> {
        let mut removed = Vec::new();
        for target in self.targets.values_mut() {
            if target.tick_grace() {
                removed.push((target.id, RemovalReason::GraceExpired));
            } else if sensor.range_to(&target.position) > removal_range {
                removed.push((target.id, RemovalReason::OutOfRange));
            }
        }
        for (id, _) in &removed {
            self.targets.remove(id);
        }
        removed
    }

    /// Clones of all targets, for computing the next state off to the side.
    pub(crate) fn working_copy(&self) -> Vec<Target> {
        self.targets.values().cloned().collect()
    }

    /// Replace targets with their updated state. Ids no longer present are ignored.
    pub(crate) fn commit(&mut self, updated: Vec<Target>) {
        for target in updated {
            if let Some(slot) = self.targets.get_mut(&target.id) {
                *slot = target;
            }
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
