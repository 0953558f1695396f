//! Point-in-time telemetry aggregates and the cache that holds them.

mod cache;

pub use cache::SnapshotCache;

use std::ops::Deref;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::game::{
    AbnormalityState, DamageEntry, EquipmentInfo, MonsterEntry, PlayerInfo, SkillEntry,
    WeaponInfo, ZoneInfo,
};

/// Everything decoded in one pass, immutable once built.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Monotonic capture instant used for cache aging
    #[serde(skip)]
    pub taken_at: Instant,
    pub captured_at: DateTime<Utc>,
    pub connected: bool,
    pub player: PlayerInfo,
    pub weapon: Option<WeaponInfo>,
    pub equipment: EquipmentInfo,
    pub monsters: Vec<MonsterEntry>,
    pub skills: Vec<SkillEntry>,
    pub damage: Vec<DamageEntry>,
    pub abnormalities: Vec<AbnormalityState>,
    pub zone: ZoneInfo,
}

impl Snapshot {
    /// Empty snapshot stamped now, for a connected reader to fill in.
    pub fn empty() -> Self {
        Self {
            taken_at: Instant::now(),
            captured_at: Utc::now(),
            connected: true,
            player: PlayerInfo::default(),
            weapon: None,
            equipment: EquipmentInfo::default(),
            monsters: Vec::new(),
            skills: Vec::new(),
            damage: Vec::new(),
            abnormalities: Vec::new(),
            zone: ZoneInfo::default(),
        }
    }

    /// Sentinel returned while no game process is attached.
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::empty()
        }
    }

    pub fn total_damage(&self) -> u64 {
        self.damage
            .iter()
            .map(|entry| u64::from(entry.cumulative_damage))
            .sum()
    }

    pub fn in_quest(&self) -> bool {
        self.zone.quest_timer.is_some()
    }
}

/// One entity projected out of a snapshot, tagged with connection state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading<T> {
    pub connected: bool,
    pub captured_at: Option<DateTime<Utc>>,
    pub value: T,
}

impl<T> Reading<T> {
    pub fn from_snapshot(snapshot: &Snapshot, project: impl FnOnce(&Snapshot) -> T) -> Self {
        Self {
            connected: snapshot.connected,
            captured_at: snapshot.connected.then_some(snapshot.captured_at),
            value: project(snapshot),
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        Reading {
            connected: self.connected,
            captured_at: self.captured_at,
            value: f(self.value),
        }
    }
}

impl<T: Default> Reading<T> {
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            captured_at: None,
            value: T::default(),
        }
    }
}

impl<T> Deref for Reading<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
