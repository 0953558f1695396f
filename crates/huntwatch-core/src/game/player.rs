use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::game::Decode;
use crate::memory::ByteBuffer;
use crate::memory::layout::player;

/// Hunter profile: name, ranks and money
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub hunter_rank: u32,
    pub master_rank: u32,
    pub zenny: u32,
}

impl PlayerInfo {
    /// True when no save is loaded (title screen, character select)
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.hunter_rank == 0 && self.master_rank == 0
    }
}

fn sane_rank(value: u32) -> u32 {
    if value > player::MAX_RANK {
        trace!("Discarding rank {}", value);
        0
    } else {
        value
    }
}

impl Decode for PlayerInfo {
    const SIZE: usize = player::SIZE;

    fn decode(buf: ByteBuffer<'_>) -> Option<Self> {
        Some(Self {
            name: buf.string_at(player::NAME, player::NAME_LEN),
            hunter_rank: sane_rank(buf.u32_at(player::HUNTER_RANK)?),
            master_rank: sane_rank(buf.u32_at(player::MASTER_RANK)?),
            zenny: buf.u32_at(player::ZENNY)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_bytes(name: &[u8], hr: u32, mr: u32, zenny: u32) -> Vec<u8> {
        let mut bytes = vec![0u8; player::SIZE];
        bytes[..name.len()].copy_from_slice(name);
        bytes[player::HUNTER_RANK..player::HUNTER_RANK + 4].copy_from_slice(&hr.to_le_bytes());
        bytes[player::MASTER_RANK..player::MASTER_RANK + 4].copy_from_slice(&mr.to_le_bytes());
        bytes[player::ZENNY..player::ZENNY + 4].copy_from_slice(&zenny.to_le_bytes());
        bytes
    }

    #[test]
    fn test_decode_player() {
        let bytes = player_bytes(b"Aiden\0", 100, 24, 1_234_567);
        let player = PlayerInfo::from_bytes(&bytes).unwrap();

        assert_eq!(player.name, "Aiden");
        assert_eq!(player.hunter_rank, 100);
        assert_eq!(player.master_rank, 24);
        assert_eq!(player.zenny, 1_234_567);
        assert!(!player.is_empty());
    }

    #[test]
    fn test_decode_player_is_deterministic() {
        let bytes = player_bytes(b"Handler\0", 29, 0, 50);
        assert_eq!(PlayerInfo::from_bytes(&bytes), PlayerInfo::from_bytes(&bytes));
    }

    #[test]
    fn test_decode_player_garbage_ranks_are_zero() {
        let bytes = player_bytes(b"X\0", 1_000, u32::MAX, 0);
        let player = PlayerInfo::from_bytes(&bytes).unwrap();

        assert_eq!(player.hunter_rank, 0);
        assert_eq!(player.master_rank, 0);
    }

    #[test]
    fn test_decode_player_name_fills_buffer() {
        let bytes = player_bytes(&[b'A'; player::NAME_LEN], 1, 1, 0);
        let player = PlayerInfo::from_bytes(&bytes).unwrap();
        assert_eq!(player.name.len(), player::NAME_LEN);
    }

    #[test]
    fn test_decode_player_short_buffer() {
        assert!(PlayerInfo::from_bytes(&[0u8; 16]).is_none());
    }
}
