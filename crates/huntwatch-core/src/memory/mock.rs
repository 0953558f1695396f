//! In-memory process doubles for tests.
//!
//! `MockMemoryBuilder` lays out a sparse address space made of mapped
//! regions; reads spanning unmapped bytes fail like an invalid page would.
//! `MockMemory` records every read so tests can assert how many decode
//! passes actually touched memory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::{Error, Result};
use crate::memory::{ProcessInfo, ProcessMemory, ProcessProvider, ReadMemory};

pub struct MockMemoryBuilder {
    base: u64,
    regions: Vec<(u64, Vec<u8>)>,
}

impl MockMemoryBuilder {
    pub fn new(base: u64) -> Self {
        Self {
            base,
            regions: Vec::new(),
        }
    }

    /// Map `size` zeroed bytes at `address`.
    pub fn region(mut self, address: u64, size: usize) -> Self {
        self.regions.push((address, vec![0; size]));
        self
    }

    /// Write raw bytes, mapping a new region when none contains the range.
    pub fn bytes(mut self, address: u64, data: &[u8]) -> Self {
        let end = address + data.len() as u64;
        let existing = self
            .regions
            .iter_mut()
            .find(|(start, mem)| *start <= address && end <= *start + mem.len() as u64);
        match existing {
            Some((start, mem)) => {
                let offset = (address - *start) as usize;
                mem[offset..offset + data.len()].copy_from_slice(data);
            }
            None => self.regions.push((address, data.to_vec())),
        }
        self
    }

    pub fn u8(self, address: u64, value: u8) -> Self {
        self.bytes(address, &[value])
    }

    pub fn u16(self, address: u64, value: u16) -> Self {
        self.bytes(address, &value.to_le_bytes())
    }

    pub fn i16(self, address: u64, value: i16) -> Self {
        self.bytes(address, &value.to_le_bytes())
    }

    pub fn u32(self, address: u64, value: u32) -> Self {
        self.bytes(address, &value.to_le_bytes())
    }

    pub fn f32(self, address: u64, value: f32) -> Self {
        self.bytes(address, &value.to_le_bytes())
    }

    pub fn pointer(self, address: u64, target: u64) -> Self {
        self.bytes(address, &target.to_le_bytes())
    }

    pub fn build(self) -> MockMemory {
        // The module image itself must be readable for the liveness probe.
        let builder = if self.find(self.base, 1) {
            self
        } else {
            let base = self.base;
            self.region(base, 0x10)
        };

        MockMemory {
            inner: Arc::new(MockInner {
                info: ProcessInfo {
                    pid: 4242,
                    name: "MonsterHunterWorld.exe".to_string(),
                    base_address: builder.base,
                    module_size: 0x1000_0000,
                },
                regions: builder.regions,
                alive: AtomicBool::new(true),
                total_reads: AtomicUsize::new(0),
                reads: Mutex::new(HashMap::new()),
            }),
        }
    }

    fn find(&self, address: u64, size: usize) -> bool {
        self.regions
            .iter()
            .any(|(start, mem)| *start <= address && address + size as u64 <= *start + mem.len() as u64)
    }
}

struct MockInner {
    info: ProcessInfo,
    regions: Vec<(u64, Vec<u8>)>,
    alive: AtomicBool,
    total_reads: AtomicUsize,
    reads: Mutex<HashMap<u64, usize>>,
}

/// Fake process; clones share the same address space and read counters.
#[derive(Clone)]
pub struct MockMemory {
    inner: Arc<MockInner>,
}

impl MockMemory {
    /// Simulate the target process exiting.
    pub fn kill(&self) {
        self.inner.alive.store(false, Ordering::SeqCst);
    }

    pub fn total_reads(&self) -> usize {
        self.inner.total_reads.load(Ordering::SeqCst)
    }

    /// Number of reads that started exactly at `address`.
    pub fn reads_at(&self, address: u64) -> usize {
        self.inner
            .reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&address)
            .copied()
            .unwrap_or(0)
    }
}

impl ReadMemory for MockMemory {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        self.inner.total_reads.fetch_add(1, Ordering::SeqCst);
        *self
            .inner
            .reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(address)
            .or_insert(0) += 1;

        if !self.inner.alive.load(Ordering::SeqCst) {
            return Err(Error::read_failed(address, "process exited"));
        }

        let end = address
            .checked_add(size as u64)
            .ok_or_else(|| Error::read_failed(address, "address overflow"))?;
        self.inner
            .regions
            .iter()
            .find(|(start, mem)| *start <= address && end <= *start + mem.len() as u64)
            .map(|(start, mem)| {
                let offset = (address - start) as usize;
                mem[offset..offset + size].to_vec()
            })
            .ok_or_else(|| Error::read_failed(address, "unmapped"))
    }

    fn base_address(&self) -> u64 {
        self.inner.info.base_address
    }
}

impl ProcessMemory for MockMemory {
    fn info(&self) -> &ProcessInfo {
        &self.inner.info
    }
}

/// Provider handing out a preconfigured `MockMemory`, or nothing.
#[derive(Default)]
pub struct MockProcessProvider {
    process: Mutex<Option<MockMemory>>,
    attach_calls: AtomicUsize,
}

impl MockProcessProvider {
    pub fn running(memory: MockMemory) -> Self {
        Self {
            process: Mutex::new(Some(memory)),
            attach_calls: AtomicUsize::new(0),
        }
    }

    pub fn not_running() -> Self {
        Self::default()
    }

    pub fn set_process(&self, memory: Option<MockMemory>) {
        *self.process.lock().unwrap_or_else(PoisonError::into_inner) = memory;
    }

    pub fn attach_calls(&self) -> usize {
        self.attach_calls.load(Ordering::SeqCst)
    }
}

impl ProcessProvider for MockProcessProvider {
    type Process = MockMemory;

    fn attach(&self, executable: &str) -> Result<MockMemory> {
        self.attach_calls.fetch_add(1, Ordering::SeqCst);
        self.process
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|memory| memory.inner.alive.load(Ordering::SeqCst))
            .ok_or_else(|| Error::ProcessNotFound(executable.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_reads_mapped_and_unmapped() {
        let memory = MockMemoryBuilder::new(0x1_4000_0000)
            .u32(0x2000, 0xCAFE)
            .build();

        assert_eq!(memory.read_u32(0x2000).unwrap(), 0xCAFE);
        assert!(memory.read_u32(0x2002).is_err());
        assert!(memory.read_u8(0x9999).is_err());
        assert_eq!(memory.reads_at(0x2000), 1);
        assert_eq!(memory.total_reads(), 3);
    }

    #[test]
    fn test_mock_writes_into_existing_region() {
        let memory = MockMemoryBuilder::new(0x1000)
            .region(0x5000, 0x100)
            .u16(0x5010, 7)
            .build();

        assert_eq!(memory.read_u16(0x5010).unwrap(), 7);
        assert_eq!(memory.read_u32(0x50F0).unwrap(), 0);
    }

    #[test]
    fn test_mock_kill_fails_reads() {
        let memory = MockMemoryBuilder::new(0x1000).build();
        assert!(memory.is_alive());

        memory.kill();
        assert!(!memory.is_alive());
    }

    #[test]
    fn test_provider_not_running() {
        let provider = MockProcessProvider::not_running();
        assert!(matches!(
            provider.attach("MonsterHunterWorld.exe"),
            Err(Error::ProcessNotFound(_))
        ));
        assert_eq!(provider.attach_calls(), 1);
    }
}
