//! Watch command: poll snapshots until interrupted.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use huntwatch_core::{NameResolver, TelemetryReader};
use tracing::{debug, info};

use crate::render;
use crate::shutdown::ShutdownSignal;

pub fn run<R: NameResolver + ?Sized>(
    reader: &TelemetryReader,
    names: &R,
    interval: Duration,
    count: Option<u64>,
) -> Result<()> {
    let shutdown = Arc::new(ShutdownSignal::new());
    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal, stopping...");
        shutdown_ctrlc.trigger();
    })?;

    let polls = poll(reader, names, interval, count, &shutdown, |line| {
        println!("{}", line)
    })?;
    debug!("Watch finished after {} polls", polls);
    Ok(())
}

/// Poll loop; hands one compact JSON line per poll to `emit`.
///
/// While disconnected every tick retries `connect()` before reading.
pub fn poll<R, F>(
    reader: &TelemetryReader,
    names: &R,
    interval: Duration,
    count: Option<u64>,
    shutdown: &ShutdownSignal,
    mut emit: F,
) -> Result<u64>
where
    R: NameResolver + ?Sized,
    F: FnMut(String),
{
    let mut polls = 0;
    let mut was_connected = false;

    while !shutdown.is_shutdown() {
        let connected = reader.is_connected() || reader.connect();
        if connected != was_connected {
            if connected {
                info!("Watching {}", reader.config().process_name);
            } else {
                info!("Waiting for {}...", reader.config().process_name);
            }
            was_connected = connected;
        }

        let snapshot = reader.get_full_snapshot();
        emit(serde_json::to_string(&render::snapshot_json(&snapshot, names)?)?);
        polls += 1;

        if count.is_some_and(|count| polls >= count) {
            break;
        }
        if shutdown.wait(interval) {
            break;
        }
    }

    Ok(polls)
}
