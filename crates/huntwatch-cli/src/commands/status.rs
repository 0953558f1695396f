//! Status command: attach and report the process.

use anyhow::Result;
use huntwatch_core::{ReaderStatus, TelemetryReader};

pub fn run(reader: &TelemetryReader) -> Result<()> {
    let status = connect_status(reader);
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn connect_status(reader: &TelemetryReader) -> ReaderStatus {
    super::connect_or_warn(reader);
    reader.status()
}
