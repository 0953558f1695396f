use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::game::{AbnormalitySource, SlotLayout};
use crate::memory::ByteBuffer;
use crate::memory::layout::abnormality;

/// A buff with time remaining
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbnormalityState {
    pub status_id: u32,
    /// Seconds left, rounded to one decimal
    pub remaining_duration: f32,
    pub stack_count: u8,
    pub source: AbnormalitySource,
    pub cooldown: Option<f32>,
}

fn round_tenths(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

fn active_timer(value: f32) -> Option<f32> {
    if value.is_finite() && value > 0.0 && value <= abnormality::MAX_DURATION {
        Some(round_tenths(value))
    } else {
        if value != 0.0 {
            trace!("Implausible buff timer {}", value);
        }
        None
    }
}

/// Consumable buff timers (demondrug, armorskin, ...), one f32 per buff.
pub struct ConsumableBuffSlots;

impl SlotLayout for ConsumableBuffSlots {
    type Entry = AbnormalityState;

    const STRIDE: usize = abnormality::CONSUMABLE_STRIDE;
    const COUNT: usize = abnormality::CONSUMABLE_SLOTS;

    fn decode_slot(index: usize, slot: ByteBuffer<'_>) -> Option<AbnormalityState> {
        let remaining_duration = active_timer(slot.f32_at(0)?)?;
        Some(AbnormalityState {
            status_id: abnormality::CONSUMABLE_ID_BASE + index as u32,
            remaining_duration,
            stack_count: 1,
            source: AbnormalitySource::Consumable,
            cooldown: None,
        })
    }
}

/// Mantle timers: duration, cooldown and stack count per mantle.
pub struct GearBuffSlots;

impl SlotLayout for GearBuffSlots {
    type Entry = AbnormalityState;

    const STRIDE: usize = abnormality::GEAR_STRIDE;
    const COUNT: usize = abnormality::GEAR_SLOTS;

    fn decode_slot(index: usize, slot: ByteBuffer<'_>) -> Option<AbnormalityState> {
        let remaining_duration = active_timer(slot.f32_at(abnormality::GEAR_TIMER)?)?;

        let stacks = slot.u8_at(abnormality::GEAR_STACKS)?;
        if stacks > abnormality::MAX_STACKS {
            trace!("Implausible stack count {} in gear slot {}", stacks, index);
            return None;
        }

        let cooldown = slot
            .f32_at(abnormality::GEAR_COOLDOWN)
            .filter(|c| c.is_finite() && *c > 0.0 && *c <= abnormality::MAX_DURATION)
            .map(round_tenths);

        Some(AbnormalityState {
            status_id: abnormality::GEAR_ID_BASE + index as u32,
            remaining_duration,
            stack_count: stacks.max(1),
            source: AbnormalitySource::Gear,
            cooldown,
        })
    }
}
