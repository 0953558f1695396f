use serde::{Deserialize, Serialize};

use crate::game::SlotLayout;
use crate::memory::ByteBuffer;
use crate::memory::layout::skills;

/// An active skill and its level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub id: u32,
    pub level: u8,
}

/// Skill level table indexed by skill tree id, one byte per skill.
pub struct SkillSlots;

impl SlotLayout for SkillSlots {
    type Entry = SkillEntry;

    const STRIDE: usize = 1;
    const COUNT: usize = skills::SLOTS;

    fn decode_slot(index: usize, slot: ByteBuffer<'_>) -> Option<SkillEntry> {
        // Skill tree 0 is reserved for "none"
        if index == 0 {
            return None;
        }
        let level = slot.u8_at(0)?;
        if level == 0 || level > skills::MAX_LEVEL {
            return None;
        }
        Some(SkillEntry {
            id: index as u32,
            level,
        })
    }
}
