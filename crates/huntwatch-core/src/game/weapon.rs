use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::game::{Decode, WeaponType};
use crate::memory::ByteBuffer;
use crate::memory::layout::weapon;

/// Currently equipped weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponInfo {
    pub id: u16,
    pub weapon_type: WeaponType,
    /// Hit count per sharpness stage, red to blue
    pub sharpness_stages: [u8; weapon::SHARPNESS_STAGES],
    pub affinity: i16,
    /// 0 = raw weapon
    pub element_id: u8,
    pub element_value: u16,
}

impl WeaponInfo {
    pub fn has_element(&self) -> bool {
        self.element_id != 0 && self.element_value != 0
    }

    /// Index of the highest sharpness stage with any hits left.
    pub fn top_sharpness(&self) -> Option<usize> {
        self.sharpness_stages.iter().rposition(|&hits| hits > 0)
    }
}

impl Decode for WeaponInfo {
    const SIZE: usize = weapon::SIZE;

    fn decode(buf: ByteBuffer<'_>) -> Option<Self> {
        let raw_type = buf.u32_at(weapon::WEAPON_TYPE)?;
        let weapon_type = match WeaponType::try_from(raw_type) {
            Ok(weapon_type) => weapon_type,
            Err(e) => {
                trace!("{}", e);
                return None;
            }
        };

        let id = buf.u16_at(weapon::ID)?;
        if id == 0 {
            return None;
        }

        let affinity = buf.i16_at(weapon::AFFINITY)?;
        if !(weapon::MIN_AFFINITY..=weapon::MAX_AFFINITY).contains(&affinity) {
            trace!("Implausible affinity {}", affinity);
            return None;
        }

        let sharpness_stages: [u8; weapon::SHARPNESS_STAGES] = buf
            .slice(weapon::SHARPNESS, weapon::SHARPNESS_STAGES)?
            .try_into()
            .ok()?;

        Some(Self {
            id,
            weapon_type,
            sharpness_stages,
            affinity,
            element_id: buf.u8_at(weapon::ELEMENT_ID)?,
            element_value: buf.u16_at(weapon::ELEMENT_VALUE)?,
        })
    }
}
