use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, FromRepr, IntoStaticStr};
use thiserror::Error;

use crate::memory::layout::monster;

/// Error for invalid enum value conversion
#[derive(Debug, Error)]
#[error("Invalid {type_name} value: {value}")]
pub struct InvalidEnumValueError {
    type_name: &'static str,
    value: u32,
}

impl InvalidEnumValueError {
    pub fn new(type_name: &'static str, value: u32) -> Self {
        Self { type_name, value }
    }
}

/// The fourteen weapon classes, in the game's internal order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[repr(u8)]
pub enum WeaponType {
    GreatSword = 0,
    SwordAndShield = 1,
    DualBlades = 2,
    LongSword = 3,
    Hammer = 4,
    HuntingHorn = 5,
    Lance = 6,
    Gunlance = 7,
    SwitchAxe = 8,
    ChargeBlade = 9,
    InsectGlaive = 10,
    Bow = 11,
    HeavyBowgun = 12,
    LightBowgun = 13,
}

impl WeaponType {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    /// Stable lowercase identifier (e.g. "great-sword")
    pub fn slug(&self) -> &'static str {
        self.into()
    }

    /// Human-readable name (e.g. "Great Sword")
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::GreatSword => "Great Sword",
            Self::SwordAndShield => "Sword and Shield",
            Self::DualBlades => "Dual Blades",
            Self::LongSword => "Long Sword",
            Self::Hammer => "Hammer",
            Self::HuntingHorn => "Hunting Horn",
            Self::Lance => "Lance",
            Self::Gunlance => "Gunlance",
            Self::SwitchAxe => "Switch Axe",
            Self::ChargeBlade => "Charge Blade",
            Self::InsectGlaive => "Insect Glaive",
            Self::Bow => "Bow",
            Self::HeavyBowgun => "Heavy Bowgun",
            Self::LightBowgun => "Light Bowgun",
        }
    }

    pub fn is_ranged(&self) -> bool {
        matches!(self, Self::Bow | Self::HeavyBowgun | Self::LightBowgun)
    }
}

impl TryFrom<u32> for WeaponType {
    type Error = InvalidEnumValueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::from_u8)
            .ok_or(InvalidEnumValueError::new("WeaponType", value))
    }
}

/// Crown classification of a monster's size multiplier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, IntoStaticStr, Display,
)]
#[serde(rename_all = "lowercase")]
pub enum Crown {
    #[strum(serialize = "Mini")]
    Mini,
    #[default]
    #[strum(serialize = "-")]
    Normal,
    #[strum(serialize = "Silver")]
    Silver,
    #[strum(serialize = "Gold")]
    Gold,
}

impl Crown {
    pub fn from_size(multiplier: f32) -> Self {
        if multiplier >= monster::GOLD_CROWN {
            Self::Gold
        } else if multiplier >= monster::SILVER_CROWN {
            Self::Silver
        } else if multiplier > 0.0 && multiplier <= monster::MINI_CROWN {
            Self::Mini
        } else {
            Self::Normal
        }
    }

    pub fn is_crown(&self) -> bool {
        *self != Self::Normal
    }
}

/// Timer table an abnormality was read from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AbnormalitySource {
    Consumable,
    Gear,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_weapon_type_from_u8() {
        assert_eq!(WeaponType::from_u8(0), Some(WeaponType::GreatSword));
        assert_eq!(WeaponType::from_u8(3), Some(WeaponType::LongSword));
        assert_eq!(WeaponType::from_u8(13), Some(WeaponType::LightBowgun));
        assert_eq!(WeaponType::from_u8(14), None);
        assert_eq!(WeaponType::iter().count(), 14);
    }

    #[test]
    fn test_weapon_type_try_from_u32() {
        assert_eq!(WeaponType::try_from(9).unwrap(), WeaponType::ChargeBlade);
        assert!(WeaponType::try_from(14).is_err());
        assert!(WeaponType::try_from(0x100 + 3).is_err());
    }

    #[test]
    fn test_weapon_type_is_ranged() {
        let ranged: Vec<WeaponType> = WeaponType::iter().filter(|w| w.is_ranged()).collect();
        assert_eq!(
            ranged,
            vec![WeaponType::Bow, WeaponType::HeavyBowgun, WeaponType::LightBowgun]
        );
    }

    #[test]
    fn test_weapon_type_slug_matches_serde() {
        assert_eq!(WeaponType::SwordAndShield.slug(), "sword-and-shield");
        assert_eq!(WeaponType::Gunlance.to_string(), "gunlance");
        for weapon_type in WeaponType::iter() {
            let json = serde_json::to_string(&weapon_type).unwrap();
            assert_eq!(json, format!("\"{}\"", weapon_type.slug()));
        }
    }

    #[test]
    fn test_crown_from_size() {
        assert_eq!(Crown::from_size(0.89), Crown::Mini);
        assert_eq!(Crown::from_size(0.90), Crown::Mini);
        assert_eq!(Crown::from_size(1.0), Crown::Normal);
        assert_eq!(Crown::from_size(1.20), Crown::Silver);
        assert_eq!(Crown::from_size(1.23), Crown::Gold);
        assert_eq!(Crown::from_size(0.0), Crown::Normal);
        assert!(!Crown::Normal.is_crown());
    }

    #[test]
    fn test_invalid_enum_value_error_display() {
        let err = InvalidEnumValueError::new("WeaponType", 42);
        assert_eq!(format!("{}", err), "Invalid WeaponType value: 42");
    }
}
