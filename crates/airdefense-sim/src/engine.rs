//! Simulation engine: one call to [`SimulationEngine::tick`] is one tick.
//!
//! `SimulationEngine` owns the target registry, the radar, the engagement
//! controller and the only RNG. It processes operator commands, runs every
//! stage in order and produces a [`SimSnapshot`]. Completely headless (no
//! threads, no clocks), so a seeded engine replays exactly.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, warn};

use airdefense_core::commands::OperatorCommand;
use airdefense_core::config::SimConfig;
use airdefense_core::enums::{DestructionCause, RemovalReason};
use airdefense_core::error::Result;
use airdefense_core::events::SimEvent;
use airdefense_core::state::{RadarReading, SimSnapshot, TargetView};
use airdefense_core::types::{Position, SimTime, Velocity};

use crate::engagement::EngagementController;
use crate::registry::TargetRegistry;
use crate::systems;
use crate::systems::radar::RadarScanner;
use crate::target::{MotionModel, SpawnParams};

/// The simulation engine. Owns all sim state.
pub struct SimulationEngine {
    config: SimConfig,
    registry: TargetRegistry,
    scanner: RadarScanner,
    controller: EngagementController,
    motion: MotionModel,
    spawn_params: SpawnParams,
    rng: ChaCha8Rng,
    time: SimTime,
    command_queue: VecDeque<OperatorCommand>,
    /// Events raised since the last snapshot.
    events: Vec<SimEvent>,
    /// Readings from the last successful scan.
    readings: Vec<RadarReading>,
}

impl SimulationEngine {
    /// Validate `config` and build an engine with its initial targets.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut engine = Self {
            registry: TargetRegistry::from_config(&config),
            scanner: RadarScanner::from_config(&config),
            controller: EngagementController::from_config(&config),
            motion: MotionModel::from(&config),
            spawn_params: SpawnParams::from(&config),
            rng,
            time: SimTime::default(),
            command_queue: VecDeque::new(),
            events: Vec::new(),
            readings: Vec::new(),
            config,
        };

        for _ in 0..engine.config.initial_targets {
            if let Some(id) = engine.registry.spawn(&mut engine.rng, &engine.spawn_params) {
                engine.push_spawned(id);
            }
        }
        Ok(engine)
    }

    /// Queue an operator command for the next tick boundary.
    pub fn queue_command(&mut self, command: OperatorCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = OperatorCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    ///
    /// Stage order: grace/out-of-range removal, operator commands, spawn,
    /// motion, scan, selection and engagement. A motion or scan failure
    /// abandons the rest of the tick, records a [`SimEvent::Error`] and
    /// returns the error. The registry keeps its last consistent state minus
    /// the target that failed, so the next tick can proceed.
    pub fn tick(&mut self) -> Result<SimSnapshot> {
        self.time.advance(self.config.time_step_secs);

        self.expire_targets();
        self.process_commands();
        if let Some(id) = systems::spawner::run(
            &mut self.registry,
            &mut self.rng,
            &self.spawn_params,
            self.config.spawn_probability,
        ) {
            self.push_spawned(id);
        }

        if let Err(err) = self.sense_and_engage() {
            error!(tick = self.time.tick, %err, "tick abandoned");
            self.events.push(SimEvent::Error {
                message: err.to_string(),
            });
            if let Some(target_id) = err.target_id() {
                self.discard_invalid(target_id);
            }
            return Err(err);
        }

        debug!(
            tick = self.time.tick,
            targets = self.registry.len(),
            active = self.registry.active_count(),
            readings = self.readings.len(),
            "tick complete"
        );
        Ok(self.take_snapshot())
    }

    /// Build a snapshot of the current state without advancing time.
    /// Pending events stay queued for the next tick.
    pub fn snapshot(&self) -> SimSnapshot {
        systems::snapshot::build_snapshot(
            &self.time,
            &self.registry,
            &self.readings,
            &self.controller,
            self.events.clone(),
        )
    }

    /// Take the events raised since the last snapshot.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place a target with a known state. Returns `None` at capacity.
    pub fn spawn_target_at(&mut self, position: Position, velocity: Velocity) -> Option<u32> {
        let id = self.registry.insert(position, velocity)?;
        self.push_spawned(id);
        Some(id)
    }

    /// Snapshot query for renderers.
    pub fn list_targets(&self) -> Vec<TargetView> {
        self.registry.all_targets()
    }

    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    pub fn controller(&self) -> &EngagementController {
        &self.controller
    }

    pub fn readings(&self) -> &[RadarReading] {
        &self.readings
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    fn expire_targets(&mut self) {
        let removed = self
            .registry
            .tick(&self.config.sensor_position, self.config.removal_range());
        for (target_id, reason) in removed {
            debug!(target_id, ?reason, "target removed");
            self.events.push(SimEvent::TargetRemoved { target_id, reason });
        }
    }

    fn discard_invalid(&mut self, target_id: u32) {
        if self.registry.remove(target_id).is_some() {
            warn!(target_id, "removing target with non-finite state");
            self.events.push(SimEvent::TargetRemoved {
                target_id,
                reason: RemovalReason::Invalid,
            });
        }
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: OperatorCommand) {
        match command {
            OperatorCommand::DestroyNthActive { index } => {
                match self.registry.destroy_nth_active(index) {
                    Some(target) => {
                        info!(target_id = target.id, index, "target destroyed by operator");
                        self.controller.record_manual_kill();
                        self.events.push(SimEvent::TargetDestroyed {
                            target,
                            cause: DestructionCause::Manual,
                        });
                    }
                    None => debug!(index, "no active target at index"),
                }
            }
        }
    }

    fn sense_and_engage(&mut self) -> Result<()> {
        systems::movement::run(
            &mut self.registry,
            self.config.time_step_secs,
            &self.motion,
            &mut self.rng,
        )?;

        let targets = self.registry.all_targets();
        self.readings = match self.scanner.scan(&targets, &mut self.rng) {
            Ok(readings) => readings,
            Err(err) => {
                self.readings.clear();
                return Err(err);
            }
        };

        let min_threat = self.config.min_threat;
        self.events.push(SimEvent::ScanSummary {
            reading_count: self.readings.len(),
            priority_count: systems::priority::prioritize(&self.readings, min_threat).len(),
        });

        let candidate = systems::priority::select_candidate(&self.readings, min_threat);
        self.controller
            .step(&mut self.registry, candidate, &mut self.rng, &mut self.events);
        Ok(())
    }

    fn push_spawned(&mut self, id: u32) {
        if let Some(target) = self.registry.get(id).map(|t| t.view()) {
            info!(target_id = id, speed = target.speed, "target spawned");
            self.events.push(SimEvent::TargetSpawned { target });
        }
    }

    fn take_snapshot(&mut self) -> SimSnapshot {
        let events = self.drain_events();
        systems::snapshot::build_snapshot(
            &self.time,
            &self.registry,
            &self.readings,
            &self.controller,
            events,
        )
    }
}
