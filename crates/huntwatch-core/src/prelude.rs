//! Prelude module for convenient imports
//!
//! ```ignore
//! use huntwatch_core::prelude::*;
//! ```
//!
//! Brings the reader facade, its configuration, the snapshot types and the
//! name-resolution interface into scope.

// Reader facade
pub use crate::telemetry::{ReaderConfig, ReaderStatus, TelemetryReader};

// Error handling
pub use crate::error::{Error, Result};

// Offsets
pub use crate::offset::{OffsetTable, builtin_offsets, load_offsets};

// Snapshot and entities
pub use crate::game::{
    AbnormalityState, DamageEntry, EquipmentInfo, MonsterEntry, PlayerInfo, SkillEntry,
    WeaponInfo, WeaponType, ZoneInfo,
};
pub use crate::snapshot::{Reading, Snapshot};

// Names
pub use crate::names::{NameCategory, NameResolver, display_name};
