//! Probe command: resolve one chain and hexdump what it points at.

use std::str::FromStr;

use anyhow::{Result, anyhow, bail};
use huntwatch_core::{ChainId, OffsetTable, ReaderConfig, TelemetryReader};
use strum::IntoEnumIterator;
use tracing::info;

use crate::hex::{format_hex_address, hexdump_lines};

pub fn run(
    mut offsets: OffsetTable,
    config: ReaderConfig,
    chain: &str,
    size: usize,
    base: Option<u64>,
) -> Result<()> {
    let id = parse_chain(chain)?;
    if let Some(base) = base {
        info!("Probing {} with base {}", id, format_hex_address(base));
        offsets.chain_mut(id).base = base;
    }

    let reader = TelemetryReader::with_config(offsets, config);
    if !reader.connect() {
        bail!("{} is not running", reader.config().process_name);
    }

    let probe = reader.probe_chain(id, size)?;
    println!(
        "{} resolved to {} ({} bytes):",
        probe.chain,
        format_hex_address(probe.address),
        probe.bytes.len()
    );
    println!();
    for line in hexdump_lines(&probe.bytes) {
        println!("{}", line);
    }
    Ok(())
}

fn parse_chain(name: &str) -> Result<ChainId> {
    ChainId::from_str(name.trim()).map_err(|_| {
        let known: Vec<String> = ChainId::iter().map(|id| id.to_string()).collect();
        anyhow!("Unknown chain '{}', expected one of: {}", name, known.join(", "))
    })
}
