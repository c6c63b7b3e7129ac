//! Headless air defense console.
//!
//! Usage: `airdefense [config.json] [events.jsonl]`. Press Enter to stop;
//! type a number and press Enter to destroy that active target.

use std::fs::File;
use std::io::{BufRead, BufWriter};
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use airdefense_app::sink::{EventSink, JsonLinesSink, TracingSink};
use airdefense_app::{spawn_game_loop, LoopCommander, LoopError};
use airdefense_core::config::SimConfig;
use airdefense_core::error::SimError;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run() {
        tracing::error!("air defense error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), LoopError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::from_json_file(&path).map_err(SimError::from)?,
        None => SimConfig::default(),
    };

    let mut sinks: Vec<Box<dyn EventSink>> = vec![Box::new(TracingSink)];
    if let Some(path) = args.next() {
        let file = File::create(&path)?;
        tracing::info!(path = %path, "writing event log");
        sinks.push(Box::new(JsonLinesSink::new(BufWriter::new(file))));
    }

    let (mut handle, updates) = spawn_game_loop(config, sinks)?;
    let commander = handle.commander();
    std::thread::Builder::new()
        .name("airdefense-console".into())
        .spawn(move || read_console(&commander))?;

    // Ends when the loop thread drops its sender.
    for tick in updates.iter() {
        if let Some(snapshot) = handle.snapshot() {
            tracing::debug!(
                tick,
                targets = snapshot.targets.len(),
                active = snapshot.active_count(),
                readings = snapshot.readings.len(),
                phase = ?snapshot.engagement.phase,
                hits = snapshot.engagement.stats.hits,
                "update"
            );
        }
    }

    handle.stop();
    Ok(())
}

fn read_console(commander: &LoopCommander) {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        match line.parse::<usize>() {
            Ok(index) => {
                if commander.destroy_nth_active(index).is_err() {
                    return;
                }
            }
            Err(_) => tracing::warn!(input = line, "expected a target index"),
        }
    }
    let _ = commander.shutdown();
}
