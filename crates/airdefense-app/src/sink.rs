//! Event sinks: consumers of the engine's event stream.
//!
//! The loop hands every event to each registered sink in emission order.
//! Sinks run on the loop thread and must not block for long.

use std::io::Write;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{error, info, warn};

use airdefense_core::events::SimEvent;

pub trait EventSink: Send {
    fn handle(&mut self, event: &SimEvent);
}

/// Writes every event as a structured log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimEvent) {
        match event {
            SimEvent::SystemStart { target_count } => {
                info!(target_count, "air defense system started")
            }
            SimEvent::SystemStop => info!("air defense system stopped"),
            SimEvent::ScanSummary {
                reading_count,
                priority_count,
            } => info!(reading_count, priority_count, "scan complete"),
            SimEvent::TargetSpawned { target } => info!(
                target_id = target.id,
                x = target.position.x,
                y = target.position.y,
                z = target.position.z,
                speed = target.speed,
                "new target"
            ),
            SimEvent::EngagementStarted { target } => {
                info!(target_id = target.id, "engaging")
            }
            SimEvent::TargetDestroyed { target, cause } => {
                info!(target_id = target.id, ?cause, "target destroyed")
            }
            SimEvent::EngagementMissed { target } => info!(target_id = target.id, "missed"),
            SimEvent::EngagementAborted { target_id } => warn!(target_id, "engagement aborted"),
            SimEvent::TargetRemoved { target_id, reason } => {
                info!(target_id, ?reason, "target removed")
            }
            SimEvent::Error { message } => error!(%message, "simulation error"),
        }
    }
}

/// Forwards events to a channel. A dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<SimEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::Sender<SimEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn handle(&mut self, event: &SimEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// Writes one JSON object per line, for replay or offline analysis.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> EventSink for JsonLinesSink<W> {
    fn handle(&mut self, event: &SimEvent) {
        let written = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"))
            .and_then(|()| self.writer.flush());
        if let Err(err) = written {
            warn!(%err, "failed to write event log");
        }
    }
}

/// Keeps every event in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<SimEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SimEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl EventSink for RecordingSink {
    fn handle(&mut self, event: &SimEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
