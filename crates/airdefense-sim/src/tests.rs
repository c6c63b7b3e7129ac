//! Tests for the simulation engine: tick pipeline, determinism, operator
//! commands and the engagement flow end to end.

use airdefense_core::commands::OperatorCommand;
use airdefense_core::config::{SimConfig, Turbulence};
use airdefense_core::enums::*;
use airdefense_core::error::SimError;
use airdefense_core::events::SimEvent;
use airdefense_core::types::{Position, Velocity};

use crate::engine::SimulationEngine;

/// Seeded config with no random spawns, no turbulence and no engagements,
/// so each test switches on only what it exercises.
fn quiet_config() -> SimConfig {
    SimConfig {
        seed: Some(7),
        spawn_probability: 0.0,
        hit_probability: 0.0,
        min_threat: 100.0,
        turbulence: Turbulence::off(),
        ..Default::default()
    }
}

fn count_events(events: &[SimEvent], pred: impl Fn(&SimEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let config = SimConfig {
        seed: Some(12345),
        initial_targets: 5,
        ..Default::default()
    };
    let mut engine_a = SimulationEngine::new(config.clone()).unwrap();
    let mut engine_b = SimulationEngine::new(config).unwrap();

    for _ in 0..200 {
        let snap_a = engine_a.tick().unwrap();
        let snap_b = engine_b.tick().unwrap();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
    }
}

#[test]
fn test_determinism_different_seeds() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: Some(111),
        ..Default::default()
    })
    .unwrap();
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: Some(222),
        ..Default::default()
    })
    .unwrap();

    let mut diverged = false;
    for _ in 0..50 {
        let json_a = serde_json::to_string(&engine_a.tick().unwrap()).unwrap();
        let json_b = serde_json::to_string(&engine_b.tick().unwrap()).unwrap();
        if json_a != json_b {
            diverged = true;
            break;
        }
    }
    assert!(diverged, "Different seeds should produce divergent output");
}

// ---- Construction ----

#[test]
fn test_invalid_config_rejected() {
    let result = SimulationEngine::new(SimConfig {
        max_targets: 0,
        ..Default::default()
    });
    assert!(matches!(result, Err(SimError::Config(_))));
}

#[test]
fn test_initial_targets_spawned() {
    let mut engine = SimulationEngine::new(SimConfig {
        initial_targets: 3,
        ..quiet_config()
    })
    .unwrap();
    assert_eq!(engine.registry().len(), 3);

    let snap = engine.tick().unwrap();
    let spawned = count_events(&snap.events, |e| matches!(e, SimEvent::TargetSpawned { .. }));
    assert_eq!(spawned, 3, "initial spawns are reported with the first snapshot");
}

#[test]
fn test_time_advances_per_tick() {
    let mut engine = SimulationEngine::new(SimConfig {
        time_step_secs: 0.5,
        ..quiet_config()
    })
    .unwrap();
    for _ in 0..4 {
        engine.tick().unwrap();
    }
    assert_eq!(engine.time().tick, 4);
    assert!((engine.time().elapsed_secs - 2.0).abs() < 1e-12);
}

// ---- Registry behavior through the engine ----

#[test]
fn test_ids_strictly_increasing_across_run() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: Some(3),
        spawn_probability: 1.0,
        max_targets: 5,
        hit_probability: 1.0,
        grace_ticks: 1,
        fire_delay_ticks: 0,
        ..Default::default()
    })
    .unwrap();

    let mut last = 0;
    for _ in 0..100 {
        let snap = engine.tick().unwrap();
        for event in &snap.events {
            if let SimEvent::TargetSpawned { target } = event {
                assert!(target.id > last, "id {} after {}", target.id, last);
                last = target.id;
            }
        }
    }
    assert!(last > 5, "targets should have cycled through the registry");
}

#[test]
fn test_capacity_is_respected() {
    let mut engine = SimulationEngine::new(SimConfig {
        spawn_probability: 1.0,
        max_targets: 4,
        ..quiet_config()
    })
    .unwrap();
    for _ in 0..10 {
        let snap = engine.tick().unwrap();
        assert!(snap.targets.len() <= 4);
    }
    assert_eq!(engine.registry().len(), 4);
    assert_eq!(
        engine.spawn_target_at(Position::ORIGIN, Velocity::default()),
        None
    );
    assert_eq!(engine.registry().len(), 4);
}

// ---- Operator override ----

#[test]
fn test_destroy_nth_active_command() {
    let mut engine = SimulationEngine::new(quiet_config()).unwrap();
    let id = engine
        .spawn_target_at(Position::new(10_000.0, 0.0, 0.0), Velocity::default())
        .unwrap();

    engine.queue_command(OperatorCommand::DestroyNthActive { index: 0 });
    let snap = engine.tick().unwrap();

    let target = snap.targets.iter().find(|t| t.id == id).unwrap();
    assert!(target.is_destroyed);
    assert_eq!(target.grace_remaining, engine.config().grace_ticks);
    assert!(snap.events.iter().any(|e| matches!(
        e,
        SimEvent::TargetDestroyed { target, cause: DestructionCause::Manual } if target.id == id
    )));
    assert_eq!(snap.engagement.stats.manual_kills, 1);

    // No active targets left: a no-op, not an error.
    engine.queue_command(OperatorCommand::DestroyNthActive { index: 0 });
    let snap = engine.tick().unwrap();
    let destroyed = count_events(&snap.events, |e| {
        matches!(e, SimEvent::TargetDestroyed { .. })
    });
    assert_eq!(destroyed, 0);
    assert_eq!(snap.engagement.stats.manual_kills, 1);
}

#[test]
fn test_out_of_range_index_ignored() {
    let mut engine = SimulationEngine::new(quiet_config()).unwrap();
    engine.spawn_target_at(Position::new(1_000.0, 0.0, 0.0), Velocity::default());
    engine.queue_command(OperatorCommand::DestroyNthActive { index: 5 });
    let snap = engine.tick().unwrap();
    assert_eq!(snap.active_count(), 1);
}

#[test]
fn test_grace_removal_exact() {
    let mut engine = SimulationEngine::new(quiet_config()).unwrap();
    let grace = engine.config().grace_ticks;
    let id = engine
        .spawn_target_at(Position::new(5_000.0, 0.0, 0.0), Velocity::default())
        .unwrap();

    engine.queue_command(OperatorCommand::DestroyNthActive { index: 0 });
    engine.tick().unwrap();

    for _ in 1..grace {
        let snap = engine.tick().unwrap();
        assert!(snap.targets.iter().any(|t| t.id == id), "removed too early");
    }
    let snap = engine.tick().unwrap();
    assert!(snap.targets.is_empty(), "removed too late");
    assert!(snap.events.contains(&SimEvent::TargetRemoved {
        target_id: id,
        reason: RemovalReason::GraceExpired,
    }));
}

#[test]
fn test_target_leaving_area_removed() {
    let mut engine = SimulationEngine::new(quiet_config()).unwrap();
    let edge = engine.config().removal_range() - 500.0;
    let id = engine
        .spawn_target_at(Position::new(edge, 0.0, 0.0), Velocity::new(1_000.0, 0.0, 0.0))
        .unwrap();

    // Moves past the edge in the first tick, dropped at the start of the next.
    engine.tick().unwrap();
    let snap = engine.tick().unwrap();
    assert!(snap.targets.is_empty());
    assert!(snap.events.contains(&SimEvent::TargetRemoved {
        target_id: id,
        reason: RemovalReason::OutOfRange,
    }));
}

// ---- Scan + engagement pipeline ----

#[test]
fn test_scan_summary_every_tick() {
    let mut engine = SimulationEngine::new(SimConfig {
        initial_targets: 3,
        spawn_range: 50_000.0,
        ..quiet_config()
    })
    .unwrap();
    for _ in 0..5 {
        let snap = engine.tick().unwrap();
        let summary = snap
            .events
            .iter()
            .find_map(|e| match e {
                SimEvent::ScanSummary {
                    reading_count,
                    priority_count,
                } => Some((*reading_count, *priority_count)),
                _ => None,
            })
            .expect("scan summary missing");
        assert_eq!(summary.0, snap.readings.len());
        assert_eq!(summary.1, 0, "nothing reaches a threat of 100");
    }
}

#[test]
fn test_forced_hit_engagement() {
    let mut engine = SimulationEngine::new(SimConfig {
        hit_probability: 1.0,
        min_threat: 0.0,
        fire_delay_ticks: 1,
        ..quiet_config()
    })
    .unwrap();
    let id = engine
        .spawn_target_at(Position::new(20_000.0, 0.0, 0.0), Velocity::new(-300.0, 0.0, 0.0))
        .unwrap();

    let snap = engine.tick().unwrap();
    assert_eq!(snap.engagement.phase, EngagementPhase::Engaging);
    assert_eq!(snap.engagement.target_id, Some(id));
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::EngagementStarted { target } if target.id == id)));

    let snap = engine.tick().unwrap();
    assert_eq!(snap.engagement.phase, EngagementPhase::Idle);
    assert!(snap.targets[0].is_destroyed);
    let destroyed = count_events(&snap.events, |e| {
        matches!(e, SimEvent::TargetDestroyed { cause: DestructionCause::Engagement, .. })
    });
    assert_eq!(destroyed, 1);

    // Debris is never engaged again.
    for _ in 0..3 {
        let snap = engine.tick().unwrap();
        let again = count_events(&snap.events, |e| {
            matches!(e, SimEvent::EngagementStarted { .. } | SimEvent::TargetDestroyed { .. })
        });
        assert_eq!(again, 0);
    }
    assert_eq!(engine.controller().stats().hits, 1);
}

#[test]
fn test_highest_threat_engaged_first() {
    let mut engine = SimulationEngine::new(SimConfig {
        min_threat: 0.0,
        signal_noise: 0.0,
        ..quiet_config()
    })
    .unwrap();
    engine.spawn_target_at(Position::new(80_000.0, 0.0, 0.0), Velocity::default());
    let near = engine
        .spawn_target_at(Position::new(0.0, 10_000.0, 0.0), Velocity::new(0.0, -500.0, 0.0))
        .unwrap();

    let snap = engine.tick().unwrap();
    assert_eq!(snap.engagement.target_id, Some(near));
}

#[test]
fn test_at_most_one_engagement() {
    let mut engine = SimulationEngine::new(SimConfig {
        seed: Some(99),
        initial_targets: 10,
        spawn_range: 60_000.0,
        fire_delay_ticks: 2,
        ..Default::default()
    })
    .unwrap();

    for _ in 0..200 {
        let snap = engine.tick().unwrap();
        let started = count_events(&snap.events, |e| {
            matches!(e, SimEvent::EngagementStarted { .. })
        });
        // An abort or resolution can free the slot once per tick at most.
        assert!(started <= 1, "{started} engagements started in one tick");
        match snap.engagement.phase {
            EngagementPhase::Idle => assert_eq!(snap.engagement.target_id, None),
            EngagementPhase::Engaging => {
                let id = snap.engagement.target_id.unwrap();
                let target = snap.targets.iter().find(|t| t.id == id).unwrap();
                assert!(!target.is_destroyed);
            }
        }
    }
    let stats = engine.controller().stats();
    assert!(stats.started > 0);
    assert!(stats.hits + stats.misses + stats.aborted <= stats.started);
}

#[test]
fn test_manual_kill_aborts_engagement() {
    let mut engine = SimulationEngine::new(SimConfig {
        hit_probability: 1.0,
        min_threat: 0.0,
        fire_delay_ticks: 3,
        ..quiet_config()
    })
    .unwrap();
    let id = engine
        .spawn_target_at(Position::new(10_000.0, 0.0, 0.0), Velocity::default())
        .unwrap();
    engine.tick().unwrap();
    assert_eq!(engine.controller().engaged_target(), Some(id));

    engine.queue_command(OperatorCommand::DestroyNthActive { index: 0 });
    let snap = engine.tick().unwrap();
    assert!(snap.events.contains(&SimEvent::EngagementAborted { target_id: id }));
    assert_eq!(snap.engagement.phase, EngagementPhase::Idle);
    assert_eq!(snap.engagement.stats.aborted, 1);
}

// ---- Failure handling ----

#[test]
fn test_non_finite_tick_is_abandoned() {
    let mut engine = SimulationEngine::new(quiet_config()).unwrap();
    let good = engine
        .spawn_target_at(Position::new(1_000.0, 0.0, 0.0), Velocity::new(10.0, 0.0, 0.0))
        .unwrap();
    let bad = engine
        .spawn_target_at(Position::ORIGIN, Velocity::new(f64::NAN, 0.0, 0.0))
        .unwrap();

    let err = engine.tick().unwrap_err();
    assert!(matches!(err, SimError::NonFiniteState { target_id } if target_id == bad));

    // Nothing moved, and the failure is reported as an event.
    assert_eq!(
        engine.registry().get(good).unwrap().position,
        Position::new(1_000.0, 0.0, 0.0)
    );
    let events = engine.drain_events();
    assert_eq!(count_events(&events, |e| matches!(e, SimEvent::Error { .. })), 1);
    assert!(engine.drain_events().is_empty());
}

#[test]
fn test_failed_tick_drops_invalid_target_and_recovers() {
    let mut engine = SimulationEngine::new(quiet_config()).unwrap();
    let good = engine
        .spawn_target_at(Position::new(1_000.0, 0.0, 0.0), Velocity::new(10.0, 0.0, 0.0))
        .unwrap();
    let bad = engine
        .spawn_target_at(Position::ORIGIN, Velocity::new(f64::NAN, 0.0, 0.0))
        .unwrap();

    assert!(engine.tick().is_err());
    assert!(engine.registry().get(bad).is_none());
    let events = engine.drain_events();
    assert!(events.contains(&SimEvent::TargetRemoved {
        target_id: bad,
        reason: RemovalReason::Invalid,
    }));

    // The next tick runs the full pipeline again.
    let snap = engine.tick().unwrap();
    assert_eq!(snap.time.tick, 2);
    assert_eq!(snap.targets.len(), 1);
    assert_eq!(snap.targets[0].position, Position::new(1_010.0, 0.0, 0.0));
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::ScanSummary { .. })));
    assert_eq!(engine.registry().get(good).unwrap().id, good);

    for _ in 0..10 {
        engine.tick().unwrap();
    }
}

#[test]
fn test_snapshot_query_keeps_pending_events() {
    let mut engine = SimulationEngine::new(quiet_config()).unwrap();
    engine.spawn_target_at(Position::new(1_000.0, 0.0, 0.0), Velocity::default());

    let peek = engine.snapshot();
    assert_eq!(peek.targets.len(), 1);
    assert_eq!(peek.events.len(), 1);
    assert_eq!(engine.list_targets(), peek.targets);

    let snap = engine.tick().unwrap();
    assert!(snap
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::TargetSpawned { .. })));
}
