//! CLI command implementations.

pub mod offsets;
pub mod probe;
pub mod snapshot;
pub mod status;
pub mod summary;
pub mod watch;

use huntwatch_core::TelemetryReader;
use tracing::warn;

/// Attach to the game, warning when it is not running.
pub fn connect_or_warn(reader: &TelemetryReader) -> bool {
    let connected = reader.connect();
    if !connected {
        warn!("{} is not running", reader.config().process_name);
    }
    connected
}
