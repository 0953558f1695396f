//! Hex address formatting and hexdump rendering.

use anyhow::Result;

/// Parse a hex address string (with or without 0x prefix).
pub fn parse_hex_address(s: &str) -> Result<u64> {
    let s = s.trim().trim_start_matches("0x").trim_start_matches("0X");
    u64::from_str_radix(s, 16).map_err(|e| anyhow::anyhow!("Invalid hex address: {}", e))
}

/// Format an address as a hex string with 0x prefix.
pub fn format_hex_address(addr: u64) -> String {
    format!("0x{:X}", addr)
}

/// Render bytes in hexdump format, 16 per line with an ASCII column.
///
/// ```text
/// 0x000: 41 69 64 65 6E 00 00 00  00 00 00 00 00 00 00 00  |Aiden...........|
/// ```
pub fn hexdump_lines(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let mut line = format!("0x{:03X}: ", i * 16);

            for j in 0..16 {
                if j == 8 {
                    line.push(' ');
                }
                match chunk.get(j) {
                    Some(byte) => line.push_str(&format!("{:02X} ", byte)),
                    None => line.push_str("   "),
                }
            }

            line.push_str(" |");
            for byte in chunk {
                if (0x20..0x7F).contains(byte) {
                    line.push(*byte as char);
                } else {
                    line.push('.');
                }
            }
            for _ in chunk.len()..16 {
                line.push(' ');
            }
            line.push('|');
            line
        })
        .collect()
}
