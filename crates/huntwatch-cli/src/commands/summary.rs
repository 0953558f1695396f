//! Summary command: one fresh snapshot as readable text.

use anyhow::Result;
use huntwatch_core::{NameResolver, TelemetryReader};

use crate::render;

pub fn run<R: NameResolver + ?Sized>(reader: &TelemetryReader, names: &R) -> Result<()> {
    super::connect_or_warn(reader);
    let snapshot = reader.get_fresh_snapshot();
    for line in render::summary_lines(&snapshot, names) {
        println!("{}", line);
    }
    Ok(())
}
