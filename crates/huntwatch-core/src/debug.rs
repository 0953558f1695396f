//! Debug utilities for checking offset tables against a live game

use serde::Serialize;

use crate::error::{Error, Result};
use crate::memory::ReadMemory;
use crate::offset::{ChainId, OffsetTable};

/// Bytes read at the address one chain resolves to
#[derive(Debug, Clone, Serialize)]
pub struct ChainProbe {
    pub chain: ChainId,
    pub address: u64,
    pub bytes: Vec<u8>,
}

impl ChainProbe {
    pub fn capture<R: ReadMemory + ?Sized>(
        reader: &R,
        offsets: &OffsetTable,
        chain: ChainId,
        size: usize,
    ) -> Result<Self> {
        let address = offsets
            .chain(chain)
            .resolve(reader)
            .ok_or_else(|| Error::ChainUnresolved(chain.to_string()))?;
        let bytes = reader.read_bytes(address, size)?;
        Ok(Self {
            chain,
            address,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MockMemoryBuilder;
    use crate::offset::{PointerChain, builtin_offsets};

    #[test]
    fn test_capture_resolved_chain() {
        let base = 0x1_4000_0000;
        let memory = MockMemoryBuilder::new(base)
            .pointer(base + 0x80, 0x5000)
            .bytes(0x5008, &[1, 2, 3, 4])
            .build();
        let offsets = OffsetTable {
            zone: PointerChain::new(0x80, &[0x8]),
            ..builtin_offsets()
        };

        let probe = ChainProbe::capture(&memory, &offsets, ChainId::Zone, 4).unwrap();
        assert_eq!(probe.address, 0x5008);
        assert_eq!(probe.bytes, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_capture_unresolved_chain() {
        let memory = MockMemoryBuilder::new(0x1_4000_0000).build();
        let err = ChainProbe::capture(&memory, &builtin_offsets(), ChainId::Player, 8).unwrap_err();
        assert!(err.is_absent());
    }
}
