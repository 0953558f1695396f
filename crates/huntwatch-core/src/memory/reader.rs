use crate::error::{Error, Result};

/// Read-only access to another process's address space.
///
/// Implementors only provide `read_bytes` and `base_address`; the typed
/// helpers decode little-endian values on top of it.
pub trait ReadMemory {
    /// Read exactly `size` bytes starting at `address`.
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>>;

    /// Load address of the main module.
    fn base_address(&self) -> u64;

    fn read_array<const N: usize>(&self, address: u64) -> Result<[u8; N]> {
        let bytes = self.read_bytes(address, N)?;
        bytes
            .try_into()
            .map_err(|_| Error::read_failed(address, "short read"))
    }

    fn read_u8(&self, address: u64) -> Result<u8> {
        Ok(self.read_array::<1>(address)?[0])
    }

    fn read_u16(&self, address: u64) -> Result<u16> {
        self.read_array(address).map(u16::from_le_bytes)
    }

    fn read_u32(&self, address: u64) -> Result<u32> {
        self.read_array(address).map(u32::from_le_bytes)
    }

    fn read_u64(&self, address: u64) -> Result<u64> {
        self.read_array(address).map(u64::from_le_bytes)
    }

    /// Read an 8-byte pointer; a null pointer is reported as an unresolved chain.
    fn read_pointer(&self, address: u64) -> Result<u64> {
        match self.read_u64(address)? {
            0 => Err(Error::ChainUnresolved(format!(
                "null pointer at {:#x}",
                address
            ))),
            pointer => Ok(pointer),
        }
    }
}

impl<T: ReadMemory + ?Sized> ReadMemory for &T {
    fn read_bytes(&self, address: u64, size: usize) -> Result<Vec<u8>> {
        (**self).read_bytes(address, size)
    }

    fn base_address(&self) -> u64 {
        (**self).base_address()
    }
}

/// Bounds-checked little-endian view over a buffer fetched from memory.
///
/// Every accessor returns `None` instead of panicking when the requested
/// field does not fit in the buffer.
#[derive(Debug, Clone, Copy)]
pub struct ByteBuffer<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteBuffer<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn slice(&self, offset: usize, len: usize) -> Option<&'a [u8]> {
        let end = offset.checked_add(len)?;
        self.bytes.get(offset..end)
    }

    /// Sub-view of `len` bytes starting at `offset`.
    pub fn view(&self, offset: usize, len: usize) -> Option<ByteBuffer<'a>> {
        self.slice(offset, len).map(ByteBuffer::new)
    }

    fn array<const N: usize>(&self, offset: usize) -> Option<[u8; N]> {
        self.slice(offset, N)?.try_into().ok()
    }

    pub fn u8_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(offset).copied()
    }

    pub fn u16_at(&self, offset: usize) -> Option<u16> {
        self.array(offset).map(u16::from_le_bytes)
    }

    pub fn i16_at(&self, offset: usize) -> Option<i16> {
        self.array(offset).map(i16::from_le_bytes)
    }

    pub fn u32_at(&self, offset: usize) -> Option<u32> {
        self.array(offset).map(u32::from_le_bytes)
    }

    pub fn u64_at(&self, offset: usize) -> Option<u64> {
        self.array(offset).map(u64::from_le_bytes)
    }

    pub fn f32_at(&self, offset: usize) -> Option<f32> {
        self.array(offset).map(f32::from_le_bytes)
    }

    /// Read a NUL-terminated UTF-8 string of at most `max_len` bytes.
    ///
    /// Invalid UTF-8 or an out-of-range offset yields an empty string.
    pub fn string_at(&self, offset: usize, max_len: usize) -> String {
        let Some(tail) = self.bytes.get(offset..) else {
            return String::new();
        };
        let raw = &tail[..max_len.min(tail.len())];
        let end = memchr::memchr(0, raw).unwrap_or(raw.len());
        std::str::from_utf8(&raw[..end])
            .map(str::to_owned)
            .unwrap_or_default()
    }
}
