//! Engagement controller: the fire control state machine.
//!
//! `Idle -> Engaging -> Idle`. There is exactly one state slot, so at most one
//! target can be engaged at any time. The firing delay is counted in ticks:
//! an engagement started in tick N with a delay of `d` resolves in tick N + d.

use rand::Rng;
use tracing::{info, warn};

use airdefense_core::config::SimConfig;
use airdefense_core::enums::{DestructionCause, EngagementPhase, EngagementResult};
use airdefense_core::events::SimEvent;
use airdefense_core::state::{EngagementStats, EngagementView};

use crate::registry::TargetRegistry;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngagementState {
    #[default]
    Idle,
    Engaging {
        target_id: u32,
        /// Engagement stages left before the shot resolves.
        ticks_remaining: u32,
    },
}

#[derive(Debug, Clone)]
pub struct EngagementController {
    state: EngagementState,
    hit_probability: f64,
    fire_delay_ticks: u32,
    stats: EngagementStats,
}

impl EngagementController {
    pub fn new(hit_probability: f64, fire_delay_ticks: u32) -> Self {
        Self {
            state: EngagementState::Idle,
            hit_probability,
            fire_delay_ticks,
            stats: EngagementStats::default(),
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.hit_probability, config.fire_delay_ticks)
    }

    pub fn state(&self) -> EngagementState {
        self.state
    }

    pub fn phase(&self) -> EngagementPhase {
        match self.state {
            EngagementState::Idle => EngagementPhase::Idle,
            EngagementState::Engaging { .. } => EngagementPhase::Engaging,
        }
    }

    /// The currently engaged target, if any.
    pub fn engaged_target(&self) -> Option<u32> {
        match self.state {
            EngagementState::Idle => None,
            EngagementState::Engaging { target_id, .. } => Some(target_id),
        }
    }

    pub fn stats(&self) -> EngagementStats {
        self.stats
    }

    /// Count a kill made outside the controller (operator override).
    pub fn record_manual_kill(&mut self) {
        self.stats.manual_kills += 1;
    }

    pub fn view(&self) -> EngagementView {
        let ticks_to_fire = match self.state {
            EngagementState::Idle => 0,
            EngagementState::Engaging { ticks_remaining, .. } => ticks_remaining,
        };
        EngagementView {
            phase: self.phase(),
            target_id: self.engaged_target(),
            ticks_to_fire,
            stats: self.stats,
        }
    }

    /// Run one engagement stage.
    ///
    /// While engaging, count down the firing delay and resolve the shot when
    /// it runs out; an engaged target that died or vanished aborts the
    /// engagement. When idle, commit to `candidate` if it is still alive.
    ///
    /// Returns the result of any engagement that ended during this stage.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        registry: &mut TargetRegistry,
        candidate: Option<u32>,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) -> Option<EngagementResult> {
        let mut ended = None;

        if let EngagementState::Engaging {
            target_id,
            ticks_remaining,
        } = self.state
        {
            let alive = registry.get(target_id).is_some_and(|t| !t.is_destroyed());
            if !alive {
                warn!(target_id, "engaged target lost before the shot resolved");
                self.state = EngagementState::Idle;
                self.stats.aborted += 1;
                events.push(SimEvent::EngagementAborted { target_id });
                ended = Some(EngagementResult::Aborted);
            } else if ticks_remaining > 1 {
                self.state = EngagementState::Engaging {
                    target_id,
                    ticks_remaining: ticks_remaining - 1,
                };
                return None;
            } else {
                return Some(self.resolve(registry, target_id, rng, events));
            }
        }

        let Some(target) = candidate
            .and_then(|id| registry.get(id))
            .filter(|t| !t.is_destroyed())
            .map(|t| t.view())
        else {
            return ended;
        };

        info!(target_id = target.id, speed = target.speed, "engaging target");
        self.stats.started += 1;
        events.push(SimEvent::EngagementStarted { target });

        if self.fire_delay_ticks == 0 {
            return Some(self.resolve(registry, target.id, rng, events));
        }
        self.state = EngagementState::Engaging {
            target_id: target.id,
            ticks_remaining: self.fire_delay_ticks,
        };
        ended
    }

    /// Roll the shot and return to `Idle`.
    fn resolve<R: Rng + ?Sized>(
        &mut self,
        registry: &mut TargetRegistry,
        target_id: u32,
        rng: &mut R,
        events: &mut Vec<SimEvent>,
    ) -> EngagementResult {
        self.state = EngagementState::Idle;

        if rng.gen_bool(self.hit_probability) {
            if let Some(target) = registry.destroy(target_id) {
                info!(
                    target_id,
                    x = target.position.x,
                    y = target.position.y,
                    z = target.position.z,
                    "target destroyed"
                );
                self.stats.hits += 1;
                events.push(SimEvent::TargetDestroyed {
                    target,
                    cause: DestructionCause::Engagement,
                });
                return EngagementResult::Hit;
            }
        }

        info!(target_id, "engagement missed");
        self.stats.misses += 1;
        if let Some(target) = registry.get(target_id) {
            events.push(SimEvent::EngagementMissed {
                target: target.view(),
            });
        }
        EngagementResult::Miss
    }
}
