//! # huntwatch-core
//!
//! Read-only telemetry engine for Monster Hunter: World.
//!
//! This crate provides:
//! - Windows process attachment and memory reading
//! - Pointer-chain resolution over versioned offset tables
//! - Pure decoders for player, weapon, equipment, monsters, skills,
//!   party damage, buffs and zone state
//! - A short-lived snapshot cache behind the `TelemetryReader` facade
//! - The `NameResolver` interface consumers use to label ids
//!
//! ## Feature Flags
//!
//! - `debug-tools`: Enables chain probing for offset verification.
//!   This feature is intended for CLI tools and development, not production use.

#[cfg(feature = "debug-tools")]
pub mod debug;
pub mod error;
pub mod game;
pub mod memory;
pub mod names;
pub mod offset;
pub mod prelude;
pub mod snapshot;
pub mod telemetry;

pub use error::{Error, Result};
pub use game::{
    AbnormalitySource, AbnormalityState, Crown, DamageEntry, Decode, EquipmentInfo,
    EquipmentSlot, InvalidEnumValueError, MonsterEntry, PlayerInfo, SkillEntry, WeaponInfo,
    WeaponType, ZoneInfo,
};
pub use memory::{
    ByteBuffer, DEFAULT_PROCESS_NAME, ProcessInfo, ProcessMemory, ProcessProvider, ReadMemory,
    SystemProcessProvider,
};
pub use names::{CachedNames, NameCategory, NameResolver, NoNames, StaticNames, display_name};
pub use offset::{
    BUILTIN_VERSION, ChainId, OffsetTable, PointerChain, builtin_offsets, load_offsets,
    save_offsets,
};
pub use snapshot::{Reading, Snapshot, SnapshotCache};
pub use telemetry::{
    ReaderConfig, ReaderConfigBuilder, ReaderStats, ReaderStatus, TelemetryReader,
    decode_snapshot,
};

// Debug utilities (requires debug-tools feature)
#[cfg(feature = "debug-tools")]
pub use debug::ChainProbe;
