use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::game::{Crown, Decode};
use crate::memory::ByteBuffer;
use crate::memory::layout::monster;

/// One large monster in the current area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterEntry {
    pub id: u32,
    pub current_hp: f32,
    pub max_hp: f32,
    pub position: (f32, f32, f32),
    pub is_enraged: bool,
    pub part_health: Vec<f32>,
    /// Size relative to the species' base size (crown size)
    pub size_multiplier: f32,
}

impl MonsterEntry {
    pub fn hp_percentage(&self) -> f32 {
        if self.max_hp > 0.0 {
            (self.current_hp / self.max_hp * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }

    pub fn crown(&self) -> Crown {
        Crown::from_size(self.size_multiplier)
    }

    pub fn is_dead(&self) -> bool {
        self.current_hp <= 0.0
    }

    /// Address of the next monster in the game's list, if any.
    pub fn next_pointer(bytes: &[u8]) -> Option<u64> {
        ByteBuffer::new(bytes)
            .u64_at(monster::NEXT)
            .filter(|&pointer| pointer != 0)
    }
}

impl Decode for MonsterEntry {
    const SIZE: usize = monster::SIZE;

    fn decode(buf: ByteBuffer<'_>) -> Option<Self> {
        let id = buf.u32_at(monster::ID)?;
        if id == 0 || id > monster::MAX_ID {
            trace!("Implausible monster id {}", id);
            return None;
        }

        let max_hp = buf.f32_at(monster::MAX_HP)?;
        if !max_hp.is_finite() || max_hp <= 0.0 || max_hp > monster::MAX_HP_VALUE {
            trace!("Implausible max hp {} for monster {}", max_hp, id);
            return None;
        }

        let current_hp = buf.f32_at(monster::CURRENT_HP)?;
        if !current_hp.is_finite()
            || current_hp < 0.0
            || current_hp > max_hp * monster::HP_OVERSHOOT
        {
            trace!("Implausible hp {}/{} for monster {}", current_hp, max_hp, id);
            return None;
        }

        let part_count = buf.u32_at(monster::PART_COUNT)? as usize;
        if part_count > monster::MAX_PARTS {
            trace!("Implausible part count {} for monster {}", part_count, id);
            return None;
        }
        let part_health = (0..part_count)
            .filter_map(|i| buf.f32_at(monster::PART_HEALTH + i * 4))
            .filter(|hp| hp.is_finite() && *hp >= 0.0)
            .collect();

        let size_multiplier = buf
            .f32_at(monster::SIZE_MULTIPLIER)
            .filter(|size| size.is_finite() && *size > 0.0)
            .unwrap_or(0.0);

        Some(Self {
            id,
            current_hp,
            max_hp,
            position: (
                buf.f32_at(monster::POSITION)?,
                buf.f32_at(monster::POSITION + 4)?,
                buf.f32_at(monster::POSITION + 8)?,
            ),
            is_enraged: buf.u8_at(monster::ENRAGED)? != 0,
            part_health,
            size_multiplier,
        })
    }
}
