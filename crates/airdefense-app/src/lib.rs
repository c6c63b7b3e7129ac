//! Air defense simulation driver.
//!
//! Runs the engine on a dedicated thread at a fixed cadence and exposes its
//! snapshots, events and operator commands to the rest of the process.

pub mod error;
pub mod game_loop;
pub mod sink;
pub mod state;

pub use airdefense_core as core;
pub use error::LoopError;
pub use game_loop::{
    spawn_engine_loop, spawn_game_loop, GameLoopHandle, LoopCommander, UpdateReceiver,
};
