//! Typed game entities and the pure decoders that build them from bytes.
//!
//! Decoders never touch process memory. The reader fetches a buffer at a
//! resolved address and hands it over; implausible fields make a decoder
//! return `None` so the slot is dropped instead of surfaced.

mod abnormality;
mod damage;
mod enums;
mod equipment;
mod monster;
mod player;
mod skill;
mod weapon;
mod zone;

pub use abnormality::*;
pub use damage::*;
pub use enums::*;
pub use equipment::*;
pub use monster::*;
pub use player::*;
pub use skill::*;
pub use weapon::*;
pub use zone::*;

use tracing::trace;

use crate::memory::ByteBuffer;

/// A fixed-size structure decoded from one buffer.
pub trait Decode: Sized {
    /// Bytes to fetch at the resolved address
    const SIZE: usize;

    fn decode(buf: ByteBuffer<'_>) -> Option<Self>;

    /// Decode from raw bytes, rejecting buffers shorter than `SIZE`.
    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < Self::SIZE {
            return None;
        }
        Self::decode(ByteBuffer::new(bytes))
    }
}

/// A table of equally sized slots, each decoding to an optional entry.
pub trait SlotLayout {
    type Entry;

    const STRIDE: usize;
    const COUNT: usize;
    const SIZE: usize = Self::STRIDE * Self::COUNT;

    fn decode_slot(index: usize, slot: ByteBuffer<'_>) -> Option<Self::Entry>;
}

/// Decode every slot of a table, keeping valid entries in slot order.
pub fn decode_slots<L: SlotLayout>(bytes: &[u8]) -> Vec<L::Entry> {
    let buf = ByteBuffer::new(bytes);
    (0..L::COUNT)
        .filter_map(|index| {
            let slot = buf.view(index * L::STRIDE, L::STRIDE)?;
            let entry = L::decode_slot(index, slot);
            if entry.is_none() {
                trace!("Dropped slot {} of {}", index, std::any::type_name::<L>());
            }
            entry
        })
        .collect()
}
