//! State shared between the loop thread and its handles.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use airdefense_core::commands::OperatorCommand;
use airdefense_core::state::SimSnapshot;

/// Commands sent to the loop thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoopCommand {
    /// An operator command to forward to the engine.
    Operator(OperatorCommand),
    /// Finish the current tick and stop.
    Shutdown,
}

/// Written only by the loop thread; read by any number of handles.
#[derive(Debug, Default)]
pub struct LoopState {
    /// Latest complete snapshot. Replaced whole, never edited in place.
    latest_snapshot: Mutex<Option<SimSnapshot>>,
    running: AtomicBool,
}

impl LoopState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: SimSnapshot) {
        // A panicked reader cannot leave a half-written snapshot behind.
        let mut slot = self
            .latest_snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = Some(snapshot);
    }

    pub fn latest(&self) -> Option<SimSnapshot> {
        self.latest_snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_state_creation() {
        let state = LoopState::new();
        assert!(state.latest().is_none());
        assert!(!state.is_running());
    }

    #[test]
    fn test_publish_replaces_snapshot() {
        let state = LoopState::new();
        let mut snapshot = SimSnapshot::default();
        snapshot.time.tick = 3;
        state.publish(snapshot.clone());
        snapshot.time.tick = 4;
        state.publish(snapshot);
        assert_eq!(state.latest().unwrap().time.tick, 4);
    }

    #[test]
    fn test_poisoned_slot_still_readable() {
        use std::sync::Arc;

        let state = Arc::new(LoopState::new());
        state.publish(SimSnapshot::default());
        let poisoner = Arc::clone(&state);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.latest_snapshot.lock().unwrap();
            panic!("poison the slot");
        })
        .join();
        assert!(state.latest_snapshot.is_poisoned());
        assert!(state.latest().is_some());
    }
}
