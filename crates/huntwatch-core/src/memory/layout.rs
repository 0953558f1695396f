//! Memory layout constants for Monster Hunter: World data structures
//!
//! Byte offsets are relative to the address a pointer chain resolves to.
//! They were discovered empirically against one game build; a patch that
//! moves a field requires updating the numbers here, not the decoders.

/// Player save block (name, ranks, zenny)
pub mod player {
    pub const NAME: usize = 0x0;
    pub const NAME_LEN: usize = 32;
    pub const HUNTER_RANK: usize = 0x40;
    pub const ZENNY: usize = 0x44;
    pub const MASTER_RANK: usize = 0x84;

    pub const SIZE: usize = 0x88;

    /// Ranks above this are garbage
    pub const MAX_RANK: u32 = 999;
}

/// Equipped weapon block
pub mod weapon {
    pub const WEAPON_TYPE: usize = 0x0;
    pub const ID: usize = 0x4;
    /// One byte per sharpness stage, red to blue
    pub const SHARPNESS: usize = 0x8;
    pub const SHARPNESS_STAGES: usize = 5;
    pub const AFFINITY: usize = 0x10;
    pub const ELEMENT_ID: usize = 0x14;
    pub const ELEMENT_VALUE: usize = 0x16;

    pub const SIZE: usize = 0x18;

    pub const MIN_AFFINITY: i16 = -100;
    pub const MAX_AFFINITY: i16 = 100;
}

/// Equipped armor and charm ids (u32 each, 0 = empty slot)
pub mod equipment {
    pub const WORD: usize = 4;

    pub const HEAD: usize = 0;
    pub const CHEST: usize = WORD;
    pub const ARMS: usize = WORD * 2;
    pub const WAIST: usize = WORD * 3;
    pub const LEGS: usize = WORD * 4;
    pub const CHARM: usize = WORD * 5;

    pub const SIZE: usize = WORD * 6;

    pub const MAX_ID: u32 = 100_000;
}

/// Large monster object, linked to the next monster through its first field
pub mod monster {
    pub const NEXT: usize = 0x0;
    /// x, y, z as consecutive f32
    pub const POSITION: usize = 0x160;
    pub const MAX_HP: usize = 0x7670;
    pub const CURRENT_HP: usize = 0x7678;
    pub const SIZE_MULTIPLIER: usize = 0x7730;
    pub const ENRAGED: usize = 0x7738;
    pub const PART_COUNT: usize = 0x7740;
    pub const PART_HEALTH: usize = 0x7744;
    pub const ID: usize = 0x12280;

    pub const SIZE: usize = 0x12288;

    /// Large monsters tracked per quest
    pub const MAX_MONSTERS: usize = 3;
    /// Monster objects live on the heap; anything below is a bad link
    pub const MIN_ADDRESS: u64 = 0x10000;
    pub const MAX_PARTS: usize = 16;
    pub const MAX_ID: u32 = 1_000;
    pub const MAX_HP_VALUE: f32 = 1_000_000.0;
    /// Current hp may briefly exceed max hp on spawn; beyond this it is garbage
    pub const HP_OVERSHOOT: f32 = 1.1;

    pub const MINI_CROWN: f32 = 0.90;
    pub const SILVER_CROWN: f32 = 1.20;
    pub const GOLD_CROWN: f32 = 1.23;
}

/// Active skill levels, one byte per skill tree id
pub mod skills {
    pub const SLOTS: usize = 200;
    pub const MAX_LEVEL: u8 = 7;
}

/// Party damage meter
pub mod damage {
    pub const STRIDE: usize = 0x2A0;
    pub const NAME: usize = 0x0;
    pub const NAME_LEN: usize = 48;
    pub const DAMAGE: usize = 0x48;

    pub const SLOTS: usize = 4;

    pub const MAX_DAMAGE: u32 = 10_000_000;
}

/// Buff timer tables
pub mod abnormality {
    /// Consumable buffs: a plain f32 timer per buff
    pub const CONSUMABLE_STRIDE: usize = 4;
    pub const CONSUMABLE_SLOTS: usize = 10;
    pub const CONSUMABLE_ID_BASE: u32 = 1;

    /// Gear (mantle) buffs: timer, cooldown, stack count
    pub const GEAR_STRIDE: usize = 0x10;
    pub const GEAR_TIMER: usize = 0x0;
    pub const GEAR_COOLDOWN: usize = 0x4;
    pub const GEAR_STACKS: usize = 0x8;
    pub const GEAR_SLOTS: usize = 5;
    pub const GEAR_ID_BASE: u32 = 101;

    pub const MAX_DURATION: f32 = 3_600.0;
    pub const MAX_STACKS: u8 = 10;
}

/// Zone and quest state
pub mod zone {
    pub const MAX_ZONE_ID: u32 = 10_000;
    /// Longest quest timer in seconds (50 minutes plus slack)
    pub const MAX_QUEST_TIMER: f32 = 6_000.0;
}

/// Timing constants for caching and polling
pub mod timing {
    /// Default freshness window of the snapshot cache (ms)
    pub const CACHE_WINDOW_MS: u64 = 500;

    /// Default interval between polls in watch mode (ms)
    pub const POLL_INTERVAL_MS: u64 = 1_000;
}
