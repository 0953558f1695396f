//! Offset table maintenance: dump the built-in table, check a table file.

use std::path::Path;

use anyhow::{Context, Result};
use huntwatch_core::{OffsetTable, builtin_offsets, load_offsets, save_offsets};

use crate::hex::format_hex_address;

pub fn dump(output: Option<&Path>) -> Result<()> {
    let table = builtin_offsets();
    match output {
        Some(path) => {
            save_offsets(path, &table)
                .with_context(|| format!("Failed to write offsets to {}", path.display()))?;
            println!("Wrote offsets {} to {}", table.version, path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&table)?),
    }
    Ok(())
}

pub fn check(path: &Path, expect_version: Option<&str>) -> Result<()> {
    let table = checked_table(path, expect_version)?;
    for line in chain_lines(&table) {
        println!("{}", line);
    }
    println!("OK: {} ({} chains)", table.version, table.chains().count());
    Ok(())
}

fn checked_table(path: &Path, expect_version: Option<&str>) -> Result<OffsetTable> {
    let table = load_offsets(path)
        .with_context(|| format!("Invalid offset table {}", path.display()))?;
    if let Some(expected) = expect_version {
        table.check_version(expected)?;
    }
    Ok(table)
}

fn chain_lines(table: &OffsetTable) -> Vec<String> {
    table
        .chains()
        .map(|(id, chain)| {
            let offsets: Vec<String> = chain
                .offsets
                .iter()
                .map(|offset| format!("{:#x}", offset))
                .collect();
            format!(
                "  {:<16} {} -> [{}]",
                id.to_string(),
                format_hex_address(chain.base),
                offsets.join(", ")
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use huntwatch_core::BUILTIN_VERSION;
    use tempfile::tempdir;

    #[test]
    fn test_dump_then_check() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("offsets.json");

        dump(Some(path.as_path())).unwrap();
        let table = checked_table(&path, Some(BUILTIN_VERSION)).unwrap();
        assert_eq!(table, builtin_offsets());
    }

    #[test]
    fn test_check_version_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("offsets.json");
        save_offsets(&path, &builtin_offsets()).unwrap();

        let err = checked_table(&path, Some("mhw-0.0")).unwrap_err();
        assert!(err.to_string().contains("mhw-0.0"));
    }

    #[test]
    fn test_check_missing_file() {
        assert!(checked_table(Path::new("/definitely/not/offsets.json"), None).is_err());
    }

    #[test]
    fn test_chain_lines() {
        let lines = chain_lines(&builtin_offsets());
        assert_eq!(lines.len(), 10);
        assert!(lines[0].trim_start().starts_with("player"));
        assert!(lines.iter().any(|l| l.contains("quest_timer")));
    }
}
