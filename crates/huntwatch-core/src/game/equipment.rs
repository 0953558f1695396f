use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};
use tracing::trace;

use crate::game::Decode;
use crate::memory::ByteBuffer;
use crate::memory::layout::equipment;
use crate::names::NameCategory;

/// Armor pieces and charm currently equipped (0 = empty slot)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentInfo {
    pub head_id: u32,
    pub chest_id: u32,
    pub arms_id: u32,
    pub waist_id: u32,
    pub legs_id: u32,
    pub charm_id: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EquipmentSlot {
    Head,
    Chest,
    Arms,
    Waist,
    Legs,
    Charm,
}

impl EquipmentSlot {
    pub fn offset(&self) -> usize {
        match self {
            Self::Head => equipment::HEAD,
            Self::Chest => equipment::CHEST,
            Self::Arms => equipment::ARMS,
            Self::Waist => equipment::WAIST,
            Self::Legs => equipment::LEGS,
            Self::Charm => equipment::CHARM,
        }
    }

    pub fn category(&self) -> NameCategory {
        match self {
            Self::Charm => NameCategory::Charm,
            _ => NameCategory::Armor,
        }
    }
}

impl EquipmentInfo {
    pub fn get(&self, slot: EquipmentSlot) -> u32 {
        match slot {
            EquipmentSlot::Head => self.head_id,
            EquipmentSlot::Chest => self.chest_id,
            EquipmentSlot::Arms => self.arms_id,
            EquipmentSlot::Waist => self.waist_id,
            EquipmentSlot::Legs => self.legs_id,
            EquipmentSlot::Charm => self.charm_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Decode for EquipmentInfo {
    const SIZE: usize = equipment::SIZE;

    fn decode(buf: ByteBuffer<'_>) -> Option<Self> {
        let id = |slot: EquipmentSlot| -> Option<u32> {
            let raw = buf.u32_at(slot.offset())?;
            if raw > equipment::MAX_ID {
                trace!("Discarding {} id {}", slot, raw);
                return Some(0);
            }
            Some(raw)
        };

        Some(Self {
            head_id: id(EquipmentSlot::Head)?,
            chest_id: id(EquipmentSlot::Chest)?,
            arms_id: id(EquipmentSlot::Arms)?,
            waist_id: id(EquipmentSlot::Waist)?,
            legs_id: id(EquipmentSlot::Legs)?,
            charm_id: id(EquipmentSlot::Charm)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn equipment_bytes(ids: [u32; 6]) -> Vec<u8> {
        ids.iter().flat_map(|id| id.to_le_bytes()).collect()
    }

    #[test]
    fn test_decode_equipment() {
        let equipment =
            EquipmentInfo::from_bytes(&equipment_bytes([101, 102, 0, 104, 105, 9])).unwrap();

        assert_eq!(equipment.head_id, 101);
        assert_eq!(equipment.arms_id, 0);
        assert_eq!(equipment.charm_id, 9);
        assert_eq!(equipment.get(EquipmentSlot::Legs), 105);
    }

    #[test]
    fn test_decode_equipment_garbage_id_is_empty() {
        let equipment =
            EquipmentInfo::from_bytes(&equipment_bytes([u32::MAX, 5, 5, 5, 5, 5])).unwrap();
        assert_eq!(equipment.head_id, 0);
        assert_eq!(equipment.chest_id, 5);
    }

    #[test]
    fn test_equipment_slots() {
        assert_eq!(EquipmentSlot::iter().count(), 6);
        assert_eq!(EquipmentSlot::Charm.category(), NameCategory::Charm);
        assert_eq!(EquipmentSlot::Waist.category(), NameCategory::Armor);
        assert_eq!(EquipmentSlot::Waist.to_string(), "waist");
        assert!(EquipmentInfo::default().is_empty());
    }
}
