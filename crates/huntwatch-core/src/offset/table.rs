use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::error::{Error, Result};
use crate::offset::PointerChain;

/// Game build the built-in table was captured against.
pub const BUILTIN_VERSION: &str = "mhw-iceborne-15.11";

/// Named pointer chains, one per decoded data block.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ChainId {
    Player,
    Weapon,
    Equipment,
    Monsters,
    Skills,
    Damage,
    ConsumableBuffs,
    GearBuffs,
    Zone,
    QuestTimer,
}

/// Versioned set of pointer chains for one game build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetTable {
    pub version: String,
    pub player: PointerChain,
    pub weapon: PointerChain,
    pub equipment: PointerChain,
    pub monsters: PointerChain,
    pub skills: PointerChain,
    pub damage: PointerChain,
    pub consumable_buffs: PointerChain,
    pub gear_buffs: PointerChain,
    pub zone: PointerChain,
    pub quest_timer: PointerChain,
}

impl OffsetTable {
    pub fn chain(&self, id: ChainId) -> &PointerChain {
        match id {
            ChainId::Player => &self.player,
            ChainId::Weapon => &self.weapon,
            ChainId::Equipment => &self.equipment,
            ChainId::Monsters => &self.monsters,
            ChainId::Skills => &self.skills,
            ChainId::Damage => &self.damage,
            ChainId::ConsumableBuffs => &self.consumable_buffs,
            ChainId::GearBuffs => &self.gear_buffs,
            ChainId::Zone => &self.zone,
            ChainId::QuestTimer => &self.quest_timer,
        }
    }

    pub fn chain_mut(&mut self, id: ChainId) -> &mut PointerChain {
        match id {
            ChainId::Player => &mut self.player,
            ChainId::Weapon => &mut self.weapon,
            ChainId::Equipment => &mut self.equipment,
            ChainId::Monsters => &mut self.monsters,
            ChainId::Skills => &mut self.skills,
            ChainId::Damage => &mut self.damage,
            ChainId::ConsumableBuffs => &mut self.consumable_buffs,
            ChainId::GearBuffs => &mut self.gear_buffs,
            ChainId::Zone => &mut self.zone,
            ChainId::QuestTimer => &mut self.quest_timer,
        }
    }

    pub fn chains(&self) -> impl Iterator<Item = (ChainId, &PointerChain)> + '_ {
        ChainId::iter().map(move |id| (id, self.chain(id)))
    }

    /// Check that every chain has a static base and at least one offset.
    pub fn validate(&self) -> Result<()> {
        if self.version.trim().is_empty() {
            return Err(Error::InvalidOffsetTable("version is empty".to_string()));
        }

        let broken: Vec<&'static str> = self
            .chains()
            .filter(|(_, chain)| chain.base == 0 || chain.offsets.is_empty())
            .map(|(id, _)| id.into())
            .collect();

        if broken.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidOffsetTable(format!(
                "chains without base or offsets: {}",
                broken.join(", ")
            )))
        }
    }

    pub fn check_version(&self, expected: &str) -> Result<()> {
        if self.version == expected {
            Ok(())
        } else {
            Err(Error::OffsetVersionMismatch {
                expected: expected.to_string(),
                actual: self.version.clone(),
            })
        }
    }
}

impl Default for OffsetTable {
    fn default() -> Self {
        builtin_offsets()
    }
}

/// Offsets for the last Iceborne PC build.
pub fn builtin_offsets() -> OffsetTable {
    const PLAYER_ROOT: u64 = 0x0501_39A0;

    OffsetTable {
        version: BUILTIN_VERSION.to_string(),
        player: PointerChain::new(0x0501_3950, &[0x50, 0x7630, 0x0]),
        weapon: PointerChain::new(PLAYER_ROOT, &[0x50, 0xC0, 0x8, 0x78, 0x2E8]),
        equipment: PointerChain::new(PLAYER_ROOT, &[0x50, 0xC0, 0x8, 0x78, 0x2D0]),
        monsters: PointerChain::new(0x0512_38C8, &[0x50, 0x76B0, 0x0, 0x138, 0x0]),
        skills: PointerChain::new(PLAYER_ROOT, &[0x50, 0x7D20, 0x10, 0x78]),
        damage: PointerChain::new(0x051C_46B8, &[0x258, 0x38, 0x450, 0x8, 0x48]),
        consumable_buffs: PointerChain::new(PLAYER_ROOT, &[0x50, 0x7D20, 0x0]),
        gear_buffs: PointerChain::new(PLAYER_ROOT, &[0x50, 0x12608, 0x0]),
        zone: PointerChain::new(0x0500_ECA0, &[0xAED0]),
        quest_timer: PointerChain::new(0x0500_ED30, &[0x13180]),
    }
}

/// Load and validate an offset table from a JSON file.
pub fn load_offsets<P: AsRef<Path>>(path: P) -> Result<OffsetTable> {
    let content = fs::read_to_string(&path)?;
    let table: OffsetTable = serde_json::from_str(&content)?;
    table.validate()?;
    Ok(table)
}

pub fn save_offsets<P: AsRef<Path>>(path: P, table: &OffsetTable) -> Result<()> {
    let content = serde_json::to_string_pretty(table)?;
    fs::write(path, content)?;
    Ok(())
}
