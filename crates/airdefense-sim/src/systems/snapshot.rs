//! Snapshot system: assembles the published state after a tick.
//!
//! Read-only with respect to the registry and controller.

use airdefense_core::events::SimEvent;
use airdefense_core::state::{RadarReading, SimSnapshot};
use airdefense_core::types::SimTime;

use crate::engagement::EngagementController;
use crate::registry::TargetRegistry;

/// Build a complete snapshot. `events` are moved into it.
pub fn build_snapshot(
    time: &SimTime,
    registry: &TargetRegistry,
    readings: &[RadarReading],
    controller: &EngagementController,
    events: Vec<SimEvent>,
) -> SimSnapshot {
    SimSnapshot {
        time: *time,
        targets: registry.all_targets(),
        readings: readings.to_vec(),
        engagement: controller.view(),
        events,
    }
}
