use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::game::{SlotLayout, decode_slots};
use crate::memory::ByteBuffer;
use crate::memory::layout::damage;

/// Cumulative quest damage of one party member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEntry {
    pub party_slot: u8,
    pub player_name: String,
    pub cumulative_damage: u32,
    /// Share of the party total, 0-100 with one decimal
    pub share_percent: f32,
}

/// Party damage meter, one slot per party member.
pub struct DamageSlots;

impl SlotLayout for DamageSlots {
    type Entry = DamageEntry;

    const STRIDE: usize = damage::STRIDE;
    const COUNT: usize = damage::SLOTS;

    fn decode_slot(index: usize, slot: ByteBuffer<'_>) -> Option<DamageEntry> {
        let player_name = slot.string_at(damage::NAME, damage::NAME_LEN).trim().to_string();
        if player_name.is_empty() {
            return None;
        }

        let cumulative_damage = slot.u32_at(damage::DAMAGE)?;
        if cumulative_damage > damage::MAX_DAMAGE {
            trace!("Implausible damage {} in party slot {}", cumulative_damage, index);
            return None;
        }

        Some(DamageEntry {
            party_slot: index as u8,
            player_name,
            cumulative_damage,
            share_percent: 0.0,
        })
    }
}

/// Decode the party meter and fill in each member's share of the total.
pub fn decode_party_damage(bytes: &[u8]) -> Vec<DamageEntry> {
    let mut entries = decode_slots::<DamageSlots>(bytes);
    let total: u64 = entries.iter().map(|e| u64::from(e.cumulative_damage)).sum();
    if total > 0 {
        for entry in &mut entries {
            let share = entry.cumulative_damage as f64 / total as f64 * 100.0;
            entry.share_percent = ((share * 10.0).round() / 10.0) as f32;
        }
    }
    entries
}
