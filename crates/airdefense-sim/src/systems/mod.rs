//! Per-tick systems.
//!
//! Systems are plain functions over the registry and whatever collaborators
//! they need. They own no state except the radar's previous-position cache.

pub mod movement;
pub mod priority;
pub mod radar;
pub mod snapshot;
pub mod spawner;
