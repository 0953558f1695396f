use std::collections::HashSet;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, trace};

use crate::game::{
    ConsumableBuffSlots, DamageSlots, Decode, EquipmentInfo, GearBuffSlots, MonsterEntry,
    PlayerInfo, SkillSlots, SlotLayout, WeaponInfo, ZoneInfo, decode_party_damage, decode_slots,
};
use crate::memory::ReadMemory;
use crate::memory::layout::monster;
use crate::offset::{ChainId, OffsetTable};
use crate::snapshot::Snapshot;

/// Resolve one chain and fetch `size` bytes at the result.
///
/// Misses are expected (not in a quest, menu loading) and only logged.
pub(crate) fn fetch<R: ReadMemory + ?Sized>(
    reader: &R,
    offsets: &OffsetTable,
    id: ChainId,
    size: usize,
) -> Option<Vec<u8>> {
    let Some(address) = offsets.chain(id).resolve(reader) else {
        debug!("Chain {} unresolved", id);
        return None;
    };
    match reader.read_bytes(address, size) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            debug!("Failed to read {} block: {}", id, e);
            None
        }
    }
}

fn decode_struct<T: Decode, R: ReadMemory + ?Sized>(
    reader: &R,
    offsets: &OffsetTable,
    id: ChainId,
) -> Option<T> {
    fetch(reader, offsets, id, T::SIZE).and_then(|bytes| T::from_bytes(&bytes))
}

fn decode_table<L: SlotLayout, R: ReadMemory + ?Sized>(
    reader: &R,
    offsets: &OffsetTable,
    id: ChainId,
) -> Vec<L::Entry> {
    fetch(reader, offsets, id, L::SIZE)
        .map(|bytes| decode_slots::<L>(&bytes))
        .unwrap_or_default()
}

/// Walk the monster list from its head, decoding up to the per-quest cap.
fn decode_monsters<R: ReadMemory + ?Sized>(reader: &R, offsets: &OffsetTable) -> Vec<MonsterEntry> {
    let Some(head) = offsets.monsters.resolve(reader) else {
        debug!("Chain {} unresolved", ChainId::Monsters);
        return Vec::new();
    };

    let mut monsters = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(head);

    while let Some(address) = next {
        if visited.len() >= monster::MAX_MONSTERS
            || address < monster::MIN_ADDRESS
            || !visited.insert(address)
        {
            break;
        }

        let bytes = match reader.read_bytes(address, MonsterEntry::SIZE) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Failed to read monster: {}", e);
                break;
            }
        };

        match MonsterEntry::from_bytes(&bytes) {
            Some(entry) => monsters.push(entry),
            None => trace!("Dropped monster at {:#x}", address),
        }
        next = MonsterEntry::next_pointer(&bytes);
    }

    monsters
}

/// Run one full decode pass against an attached process.
pub fn decode_snapshot<R: ReadMemory + ?Sized>(reader: &R, offsets: &OffsetTable) -> Snapshot {
    let player = decode_struct::<PlayerInfo, _>(reader, offsets, ChainId::Player).unwrap_or_default();
    let weapon = decode_struct::<WeaponInfo, _>(reader, offsets, ChainId::Weapon);
    let equipment =
        decode_struct::<EquipmentInfo, _>(reader, offsets, ChainId::Equipment).unwrap_or_default();
    let monsters = decode_monsters(reader, offsets);
    let skills = decode_table::<SkillSlots, _>(reader, offsets, ChainId::Skills);
    let damage = fetch(reader, offsets, ChainId::Damage, DamageSlots::SIZE)
        .map(|bytes| decode_party_damage(&bytes))
        .unwrap_or_default();

    let mut abnormalities =
        decode_table::<ConsumableBuffSlots, _>(reader, offsets, ChainId::ConsumableBuffs);
    abnormalities.extend(decode_table::<GearBuffSlots, _>(
        reader,
        offsets,
        ChainId::GearBuffs,
    ));

    let zone_id = fetch(reader, offsets, ChainId::Zone, 4)
        .and_then(|bytes| bytes.try_into().ok())
        .map(u32::from_le_bytes);
    let quest_timer = fetch(reader, offsets, ChainId::QuestTimer, 4)
        .and_then(|bytes| bytes.try_into().ok())
        .map(f32::from_le_bytes);

    Snapshot {
        taken_at: Instant::now(),
        captured_at: Utc::now(),
        connected: true,
        player,
        weapon,
        equipment,
        monsters,
        skills,
        damage,
        abnormalities,
        zone: ZoneInfo::from_raw(zone_id, quest_timer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{AbnormalitySource, WeaponType};
    use crate::memory::MockMemoryBuilder;
    use crate::memory::layout::{abnormality, damage, equipment, player, weapon};
    use crate::offset::PointerChain;

    const BASE: u64 = 0x1_4000_0000;
    const MONSTER_A: u64 = 0x3000_0000;
    const MONSTER_B: u64 = 0x3100_0000;

    /// Every chain is a single dereference of a static slot in the module.
    fn offsets() -> OffsetTable {
        let chain = |slot: u64| PointerChain::new(0x100 + slot * 8, &[0x0]);
        OffsetTable {
            version: "test".to_string(),
            player: chain(0),
            weapon: chain(1),
            equipment: chain(2),
            monsters: chain(3),
            skills: chain(4),
            damage: chain(5),
            consumable_buffs: chain(6),
            gear_buffs: chain(7),
            zone: chain(8),
            quest_timer: chain(9),
        }
    }

    fn slot(n: u64) -> u64 {
        BASE + 0x100 + n * 8
    }

    fn monster_at(builder: MockMemoryBuilder, address: u64, id: u32, next: u64) -> MockMemoryBuilder {
        builder
            .region(address, monster::SIZE)
            .pointer(address + monster::NEXT as u64, next)
            .u32(address + monster::ID as u64, id)
            .f32(address + monster::MAX_HP as u64, 1_000.0)
            .f32(address + monster::CURRENT_HP as u64, 400.0)
    }

    #[test]
    fn test_decode_snapshot_nothing_resolves() {
        let memory = MockMemoryBuilder::new(BASE).build();
        let snapshot = decode_snapshot(&memory, &offsets());

        assert!(snapshot.connected);
        assert!(snapshot.player.is_empty());
        assert!(snapshot.weapon.is_none());
        assert!(snapshot.monsters.is_empty());
        assert!(snapshot.skills.is_empty());
        assert!(snapshot.abnormalities.is_empty());
        assert_eq!(snapshot.zone, ZoneInfo::default());
    }

    #[test]
    fn test_decode_snapshot_full_pass() {
        let builder = MockMemoryBuilder::new(BASE)
            .region(BASE + 0x100, 0x50)
            .pointer(slot(0), 0x1000_0000)
            .region(0x1000_0000, player::SIZE)
            .bytes(0x1000_0000, b"Aiden\0")
            .u32(0x1000_0000 + player::HUNTER_RANK as u64, 210)
            .pointer(slot(1), 0x1100_0000)
            .region(0x1100_0000, weapon::SIZE)
            .u32(0x1100_0000, 3)
            .u16(0x1100_0000 + weapon::ID as u64, 480)
            .pointer(slot(2), 0x1200_0000)
            .region(0x1200_0000, equipment::SIZE)
            .u32(0x1200_0000 + equipment::CHARM as u64, 44)
            .pointer(slot(3), MONSTER_A)
            .pointer(slot(4), 0x1400_0000)
            .region(0x1400_0000, SkillSlots::SIZE)
            .u8(0x1400_0000 + 20, 3)
            .pointer(slot(5), 0x1500_0000)
            .region(0x1500_0000, DamageSlots::SIZE)
            .bytes(0x1500_0000, b"Aiden\0")
            .u32(0x1500_0000 + damage::DAMAGE as u64, 900)
            .pointer(slot(6), 0x1600_0000)
            .region(0x1600_0000, ConsumableBuffSlots::SIZE)
            .f32(0x1600_0000 + 4, 120.0)
            .pointer(slot(7), 0x1700_0000)
            .region(0x1700_0000, GearBuffSlots::SIZE)
            .f32(0x1700_0000 + abnormality::GEAR_STRIDE as u64, 45.0)
            .pointer(slot(8), 0x1800_0000)
            .u32(0x1800_0000, 301)
            .pointer(slot(9), 0x1900_0000)
            .f32(0x1900_0000, 125.0);
        let builder = monster_at(builder, MONSTER_A, 17, MONSTER_B);
        let memory = monster_at(builder, MONSTER_B, 24, 0).build();

        let snapshot = decode_snapshot(&memory, &offsets());

        assert_eq!(snapshot.player.name, "Aiden");
        assert_eq!(snapshot.player.hunter_rank, 210);
        let weapon = snapshot.weapon.as_ref().unwrap();
        assert_eq!(weapon.weapon_type, WeaponType::LongSword);
        assert_eq!(weapon.id, 480);
        assert_eq!(snapshot.equipment.charm_id, 44);
        let ids: Vec<_> = snapshot.monsters.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![17, 24]);
        assert_eq!(snapshot.skills.len(), 1);
        assert_eq!(snapshot.damage[0].share_percent, 100.0);
        assert_eq!(snapshot.abnormalities.len(), 2);
        assert_eq!(snapshot.abnormalities[0].source, AbnormalitySource::Consumable);
        assert_eq!(snapshot.abnormalities[1].status_id, 102);
        assert_eq!(snapshot.zone.zone_id, 301);
        assert_eq!(snapshot.zone.formatted_timer().as_deref(), Some("2:05"));
    }

    #[test]
    fn test_monster_walk_stops_on_self_loop() {
        let builder = MockMemoryBuilder::new(BASE).pointer(slot(3), MONSTER_A);
        let memory = monster_at(builder, MONSTER_A, 9, MONSTER_A).build();

        let monsters = decode_monsters(&memory, &offsets());
        assert_eq!(monsters.len(), 1);
        assert_eq!(memory.reads_at(MONSTER_A), 1);
    }

    #[test]
    fn test_monster_walk_respects_cap() {
        let addresses = [0x3000_0000u64, 0x3100_0000, 0x3200_0000, 0x3300_0000];
        let mut builder = MockMemoryBuilder::new(BASE).pointer(slot(3), addresses[0]);
        for (i, address) in addresses.iter().enumerate() {
            let next = addresses.get(i + 1).copied().unwrap_or(0);
            builder = monster_at(builder, *address, i as u32 + 1, next);
        }
        let memory = builder.build();

        let monsters = decode_monsters(&memory, &offsets());
        assert_eq!(monsters.len(), monster::MAX_MONSTERS);
        assert_eq!(memory.reads_at(addresses[3]), 0);
    }

    #[test]
    fn test_monster_walk_skips_garbage_but_follows_link() {
        let builder = MockMemoryBuilder::new(BASE).pointer(slot(3), MONSTER_A);
        let builder = monster_at(builder, MONSTER_A, 0, MONSTER_B);
        let memory = monster_at(builder, MONSTER_B, 31, 0).build();

        let ids: Vec<_> = decode_monsters(&memory, &offsets())
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![31]);
    }
}
