//! Simulation loop thread: ticks the engine at a fixed cadence.
//!
//! The thread owns the engine outright; nothing else can touch the registry.
//! Commands arrive via an `mpsc` channel and are applied at the next tick.
//! After each tick the complete snapshot is stored in shared state, events
//! go to the registered sinks, and a single-slot channel signals that an
//! update is available.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use airdefense_core::commands::OperatorCommand;
use airdefense_core::config::SimConfig;
use airdefense_core::events::SimEvent;
use airdefense_core::state::{SimSnapshot, TargetView};
use airdefense_sim::SimulationEngine;

use crate::error::LoopError;
use crate::sink::EventSink;
use crate::state::{LoopCommand, LoopState};

/// Receives the tick number of each tick that changed something.
///
/// Holds at most one pending notification; the loop never waits for it to
/// be drained.
pub type UpdateReceiver = Receiver<u64>;

/// Cloneable sender for operator commands.
#[derive(Debug, Clone)]
pub struct LoopCommander {
    tx: Sender<LoopCommand>,
}

impl LoopCommander {
    /// Manual override: destroy the `index`-th active target at the next tick.
    pub fn destroy_nth_active(&self, index: usize) -> Result<(), LoopError> {
        self.send(LoopCommand::Operator(OperatorCommand::DestroyNthActive { index }))
    }

    /// Ask the loop to stop after its current tick.
    pub fn shutdown(&self) -> Result<(), LoopError> {
        self.send(LoopCommand::Shutdown)
    }

    fn send(&self, command: LoopCommand) -> Result<(), LoopError> {
        self.tx.send(command).map_err(|_| LoopError::Stopped)
    }
}

/// Owner's handle on a running loop. Dropping it stops the loop.
pub struct GameLoopHandle {
    commander: LoopCommander,
    state: Arc<LoopState>,
    thread: Option<JoinHandle<()>>,
}

impl GameLoopHandle {
    /// Stop ticking and wait for the thread to finish. The in-flight tick, if
    /// any, completes first. Safe to call more than once.
    pub fn stop(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        // Already gone if the loop exited on its own.
        let _ = self.commander.shutdown();
        if thread.join().is_err() {
            error!("simulation loop thread panicked");
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Option<SimSnapshot> {
        self.state.latest()
    }

    /// Targets from the latest snapshot, ascending by id.
    pub fn list_targets(&self) -> Vec<TargetView> {
        self.snapshot().map(|s| s.targets).unwrap_or_default()
    }

    pub fn destroy_nth_active(&self, index: usize) -> Result<(), LoopError> {
        self.commander.destroy_nth_active(index)
    }

    pub fn commander(&self) -> LoopCommander {
        self.commander.clone()
    }
}

impl Drop for GameLoopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Start the simulation loop on its own thread.
///
/// The engine is built here so a bad configuration is reported to the caller
/// instead of killing the thread.
pub fn spawn_game_loop(
    config: SimConfig,
    sinks: Vec<Box<dyn EventSink>>,
) -> Result<(GameLoopHandle, UpdateReceiver), LoopError> {
    let engine = SimulationEngine::new(config)?;
    spawn_engine_loop(engine, sinks)
}

/// Start the loop around an engine that has already been set up.
pub fn spawn_engine_loop(
    engine: SimulationEngine,
    sinks: Vec<Box<dyn EventSink>>,
) -> Result<(GameLoopHandle, UpdateReceiver), LoopError> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LoopCommand>();
    let (update_tx, update_rx) = mpsc::sync_channel::<u64>(1);
    let state = Arc::new(LoopState::new());

    state.publish(initial_snapshot(&engine));
    state.set_running(true);
    let loop_state = Arc::clone(&state);
    let spawned = std::thread::Builder::new()
        .name("airdefense-loop".into())
        .spawn(move || {
            let _running = RunningGuard(&loop_state);
            run_game_loop(engine, cmd_rx, &loop_state, update_tx, sinks);
        });
    let thread = match spawned {
        Ok(thread) => thread,
        Err(err) => {
            state.set_running(false);
            return Err(LoopError::Spawn(err));
        }
    };

    let handle = GameLoopHandle {
        commander: LoopCommander { tx: cmd_tx },
        state,
        thread: Some(thread),
    };
    Ok((handle, update_rx))
}

/// Pre-tick state. Pending events are left for the first tick's snapshot.
fn initial_snapshot(engine: &SimulationEngine) -> SimSnapshot {
    let mut snapshot = engine.snapshot();
    snapshot.events.clear();
    snapshot
}

/// Clears the running flag when the loop thread exits, including by panic.
struct RunningGuard<'a>(&'a LoopState);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set_running(false);
    }
}

/// The loop. Runs until a Shutdown command or until every sender is gone.
fn run_game_loop(
    mut engine: SimulationEngine,
    cmd_rx: Receiver<LoopCommand>,
    state: &LoopState,
    update_tx: SyncSender<u64>,
    mut sinks: Vec<Box<dyn EventSink>>,
) {
    let tick_duration = Duration::from_millis(engine.config().tick_interval_ms);
    dispatch(
        &mut sinks,
        &SimEvent::SystemStart {
            target_count: engine.registry().len(),
        },
    );

    let mut next_tick_time = Instant::now();
    'ticks: loop {
        // 1. Wait for the tick deadline, queueing commands as they arrive
        loop {
            let now = Instant::now();
            if now >= next_tick_time {
                break;
            }
            match cmd_rx.recv_timeout(next_tick_time - now) {
                Ok(LoopCommand::Operator(command)) => engine.queue_command(command),
                Ok(LoopCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break 'ticks,
                Err(RecvTimeoutError::Timeout) => break,
            }
        }
        // Commands that landed exactly at the deadline
        loop {
            match cmd_rx.try_recv() {
                Ok(LoopCommand::Operator(command)) => engine.queue_command(command),
                Ok(LoopCommand::Shutdown) | Err(mpsc::TryRecvError::Disconnected) => break 'ticks,
                Err(mpsc::TryRecvError::Empty) => break,
            }
        }

        // 2. Advance one tick
        let snapshot = match engine.tick() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                // The engine already logged it; the next tick is the retry.
                // Earlier stages of this tick may still have changed state.
                debug!(%err, "continuing after failed tick");
                let events = engine.drain_events();
                SimSnapshot {
                    events,
                    ..engine.snapshot()
                }
            }
        };
        for event in &snapshot.events {
            dispatch(&mut sinks, event);
        }

        // 3. Publish the whole snapshot, then signal
        let tick = snapshot.time.tick;
        let changed = snapshot.has_changes();
        state.publish(snapshot);
        if changed {
            notify(&update_tx, tick);
        }

        // 4. Schedule the next tick
        next_tick_time += tick_duration;
        let now = Instant::now();
        if now > next_tick_time && now - next_tick_time > tick_duration * 2 {
            // Too far behind, skip the missed ticks
            next_tick_time = now;
        }
    }

    info!(tick = engine.time().tick, "simulation loop stopping");
    dispatch(&mut sinks, &SimEvent::SystemStop);
}

fn dispatch(sinks: &mut [Box<dyn EventSink>], event: &SimEvent) {
    for sink in sinks.iter_mut() {
        sink.handle(event);
    }
}

fn notify(update_tx: &SyncSender<u64>, tick: u64) {
    if let Err(TrySendError::Disconnected(_)) = update_tx.try_send(tick) {
        // Nobody is listening. A full slot already holds a pending signal.
        debug!(tick, "no update listener");
    }
}
