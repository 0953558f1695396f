//! JSON projections annotated with names, and the text hunter summary.

use huntwatch_core::{
    DamageEntry, EquipmentInfo, EquipmentSlot, MonsterEntry, NameCategory, NameResolver,
    Reading, SkillEntry, Snapshot, WeaponInfo, display_name,
};
use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::{Value, json};
use strum::IntoEnumIterator;

const SHARPNESS_COLORS: [&str; 5] = ["red", "orange", "yellow", "green", "blue"];

fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// Top sharpness color; ranged weapons have none.
fn sharpness_color(weapon: &WeaponInfo) -> Option<&'static str> {
    if weapon.weapon_type.is_ranged() {
        return None;
    }
    weapon.top_sharpness().map(|i| SHARPNESS_COLORS[i])
}

pub fn weapon_json<R: NameResolver + ?Sized>(weapon: Option<&WeaponInfo>, names: &R) -> Value {
    let Some(weapon) = weapon else {
        return Value::Null;
    };
    json!({
        "id": weapon.id,
        "name": display_name(names, NameCategory::Weapon, u32::from(weapon.id)),
        "weapon_type": weapon.weapon_type.slug(),
        "weapon_type_name": weapon.weapon_type.display_name(),
        "ranged": weapon.weapon_type.is_ranged(),
        "sharpness_stages": weapon.sharpness_stages,
        "sharpness": sharpness_color(weapon),
        "affinity": weapon.affinity,
        "element_id": weapon.element_id,
        "element_value": weapon.element_value,
    })
}

pub fn equipment_json<R: NameResolver + ?Sized>(equipment: &EquipmentInfo, names: &R) -> Value {
    let slots = EquipmentSlot::iter()
        .map(|slot| {
            let id = equipment.get(slot);
            let entry = json!({
                "id": id,
                "name": display_name(names, slot.category(), id),
            });
            (slot.to_string(), entry)
        })
        .collect::<serde_json::Map<_, _>>();
    Value::Object(slots)
}

pub fn monster_json<R: NameResolver + ?Sized>(monster: &MonsterEntry, names: &R) -> Value {
    json!({
        "id": monster.id,
        "name": display_name(names, NameCategory::Monster, monster.id),
        "current_hp": monster.current_hp,
        "max_hp": monster.max_hp,
        "hp_percent": round1(monster.hp_percentage()),
        "is_enraged": monster.is_enraged,
        "is_dead": monster.is_dead(),
        "position": [monster.position.0, monster.position.1, monster.position.2],
        "part_health": monster.part_health,
        "size_multiplier": monster.size_multiplier,
        "crown": monster.crown(),
    })
}

pub fn skills_json<R: NameResolver + ?Sized>(skills: &[SkillEntry], names: &R) -> Value {
    skills
        .iter()
        .map(|skill| {
            json!({
                "id": skill.id,
                "name": display_name(names, NameCategory::Skill, skill.id),
                "level": skill.level,
            })
        })
        .collect()
}

/// Whole snapshot with every id annotated.
pub fn snapshot_json<R: NameResolver + ?Sized>(
    snapshot: &Snapshot,
    names: &R,
) -> serde_json::Result<Value> {
    Ok(json!({
        "connected": snapshot.connected,
        "captured_at": snapshot.captured_at,
        "player": serde_json::to_value(&snapshot.player)?,
        "weapon": weapon_json(snapshot.weapon.as_ref(), names),
        "equipment": equipment_json(&snapshot.equipment, names),
        "monsters": snapshot
            .monsters
            .iter()
            .map(|m| monster_json(m, names))
            .collect::<Vec<_>>(),
        "skills": skills_json(&snapshot.skills, names),
        "damage": serde_json::to_value(&snapshot.damage)?,
        "total_damage": snapshot.total_damage(),
        "abnormalities": serde_json::to_value(&snapshot.abnormalities)?,
        "zone": {
            "zone_id": snapshot.zone.zone_id,
            "quest_timer": snapshot.zone.quest_timer,
            "formatted_timer": snapshot.zone.formatted_timer(),
        },
    }))
}

/// Wrap an already annotated value with the reading's connection state.
pub fn reading_json<T>(reading: &Reading<T>, value: Value) -> Value {
    json!({
        "connected": reading.connected,
        "captured_at": reading.captured_at,
        "value": value,
    })
}

/// Plain serialization for readings that carry no ids.
pub fn plain_reading_json<T: Serialize>(reading: &Reading<T>) -> serde_json::Result<Value> {
    serde_json::to_value(reading)
}

fn damage_line(entry: &DamageEntry) -> String {
    format!(
        "  [{}] {:<16} {:>8}  {:>5.1}%",
        entry.party_slot + 1,
        entry.player_name,
        entry.cumulative_damage,
        entry.share_percent
    )
}

/// Render the snapshot as a human-readable hunter summary.
pub fn summary_lines<R: NameResolver + ?Sized>(snapshot: &Snapshot, names: &R) -> Vec<String> {
    let mut lines = Vec::new();

    if !snapshot.connected {
        lines.push(format!("{}", "Game not running".red().bold()));
        return lines;
    }

    let player = &snapshot.player;
    if player.is_empty() {
        lines.push(format!("{}", "No hunter loaded".yellow()));
    } else {
        lines.push(format!(
            "{}  HR {}  MR {}  {}z",
            player.name.bold(),
            player.hunter_rank,
            player.master_rank,
            player.zenny
        ));
    }

    match snapshot.zone.formatted_timer() {
        Some(timer) => lines.push(format!(
            "Zone {}  quest time {}",
            snapshot.zone.zone_id,
            timer.cyan()
        )),
        None => lines.push(format!("Zone {}", snapshot.zone.zone_id)),
    }

    lines.push(String::new());
    lines.push(format!("{}", "Weapon".bold()));
    match &snapshot.weapon {
        Some(weapon) => {
            let name = display_name(names, NameCategory::Weapon, u32::from(weapon.id))
                .unwrap_or_default();
            lines.push(format!("  {} ({})", name, weapon.weapon_type.display_name()));
            let mut detail = match sharpness_color(weapon) {
                Some(sharpness) => {
                    format!("  sharpness {}  affinity {}%", sharpness, weapon.affinity)
                }
                None => format!("  affinity {}%", weapon.affinity),
            };
            if weapon.has_element() {
                detail.push_str(&format!(
                    "  element {} ({})",
                    weapon.element_value, weapon.element_id
                ));
            }
            lines.push(detail);
        }
        None => lines.push(format!("  {}", "none".dimmed())),
    }

    if !snapshot.equipment.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}", "Equipment".bold()));
        for slot in EquipmentSlot::iter() {
            let id = snapshot.equipment.get(slot);
            if let Some(name) = display_name(names, slot.category(), id) {
                lines.push(format!("  {:<6} {}", slot.to_string(), name));
            }
        }
    }

    if !snapshot.skills.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}", "Skills".bold()));
        for skill in &snapshot.skills {
            let name = display_name(names, NameCategory::Skill, skill.id).unwrap_or_default();
            lines.push(format!("  {} Lv{}", name, skill.level));
        }
    }

    if !snapshot.monsters.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}", "Monsters".bold()));
        for monster in &snapshot.monsters {
            let name = display_name(names, NameCategory::Monster, monster.id).unwrap_or_default();
            let hp = format!("{:.1}%", monster.hp_percentage());
            let hp = if monster.is_dead() {
                format!("{}", hp.dimmed())
            } else if monster.hp_percentage() <= 30.0 {
                format!("{}", hp.red())
            } else {
                format!("{}", hp.green())
            };
            let mut line = format!("  {:<20} {}  crown {}", name, hp, monster.crown());
            if monster.is_enraged {
                line.push_str(&format!("  {}", "ENRAGED".red().bold()));
            }
            lines.push(line);
        }
    }

    if !snapshot.abnormalities.is_empty() {
        lines.push(String::new());
        lines.push(format!("{}", "Buffs".bold()));
        for buff in &snapshot.abnormalities {
            let mut line = format!(
                "  {} #{} {:.1}s",
                buff.source, buff.status_id, buff.remaining_duration
            );
            if buff.stack_count > 1 {
                line.push_str(&format!(" x{}", buff.stack_count));
            }
            lines.push(line);
        }
    }

    if !snapshot.damage.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "{}  total {}",
            "Party damage".bold(),
            snapshot.total_damage()
        ));
        lines.extend(snapshot.damage.iter().map(damage_line));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use huntwatch_core::{
        AbnormalitySource, AbnormalityState, NoNames, PlayerInfo, StaticNames, WeaponType,
        ZoneInfo,
    };

    fn hunting_snapshot() -> Snapshot {
        Snapshot {
            player: PlayerInfo {
                name: "Aiden".to_string(),
                hunter_rank: 100,
                master_rank: 24,
                zenny: 50_000,
            },
            weapon: Some(WeaponInfo {
                id: 12,
                weapon_type: WeaponType::LongSword,
                sharpness_stages: [10, 20, 30, 40, 0],
                affinity: 15,
                element_id: 0,
                element_value: 0,
            }),
            equipment: EquipmentInfo {
                head_id: 7,
                charm_id: 3,
                ..EquipmentInfo::default()
            },
            monsters: vec![MonsterEntry {
                id: 1,
                current_hp: 2_500.0,
                max_hp: 10_000.0,
                position: (1.0, 2.0, 3.0),
                is_enraged: true,
                part_health: vec![100.0],
                size_multiplier: 1.24,
            }],
            skills: vec![SkillEntry { id: 5, level: 3 }],
            damage: vec![DamageEntry {
                party_slot: 0,
                player_name: "Aiden".to_string(),
                cumulative_damage: 1_234,
                share_percent: 100.0,
            }],
            abnormalities: vec![AbnormalityState {
                status_id: 101,
                remaining_duration: 42.5,
                stack_count: 2,
                source: AbnormalitySource::Gear,
                cooldown: Some(10.0),
            }],
            zone: ZoneInfo {
                zone_id: 101,
                quest_timer: Some(125.0),
            },
            ..Snapshot::empty()
        }
    }

    fn names() -> StaticNames {
        StaticNames::new()
            .with(NameCategory::Monster, 1, "Rathalos")
            .with(NameCategory::Weapon, 12, "Iron Katana I")
            .with(NameCategory::Armor, 7, "Leather Headgear")
    }

    #[test]
    fn test_snapshot_json_annotates_ids() {
        let json = snapshot_json(&hunting_snapshot(), &names()).unwrap();

        assert_eq!(json["connected"], true);
        assert_eq!(json["weapon"]["name"], "Iron Katana I");
        assert_eq!(json["weapon"]["weapon_type"], "long-sword");
        assert_eq!(json["weapon"]["sharpness"], "green");
        assert_eq!(json["weapon"]["ranged"], false);
        assert_eq!(json["equipment"]["head"]["name"], "Leather Headgear");
        assert_eq!(json["equipment"]["charm"]["name"], "Item 3");
        assert_eq!(json["equipment"]["chest"]["name"], Value::Null);
        assert_eq!(json["monsters"][0]["name"], "Rathalos");
        assert_eq!(json["monsters"][0]["crown"], "gold");
        assert_eq!(json["skills"][0]["name"], "Skill 5");
        assert_eq!(json["total_damage"], 1_234);
        assert_eq!(json["zone"]["formatted_timer"], "2:05");
    }

    #[test]
    fn test_monster_json_hp_percent() {
        let snapshot = hunting_snapshot();
        let json = monster_json(&snapshot.monsters[0], &NoNames);

        assert_eq!(json["name"], "Monster 1");
        assert_eq!(json["hp_percent"], 25.0);
        assert_eq!(json["is_dead"], false);
    }

    #[test]
    fn test_ranged_weapon_has_no_sharpness() {
        let bow = WeaponInfo {
            id: 40,
            weapon_type: WeaponType::Bow,
            sharpness_stages: [0, 0, 0, 5, 0],
            affinity: 0,
            element_id: 0,
            element_value: 0,
        };
        let json = weapon_json(Some(&bow), &NoNames);
        assert_eq!(json["ranged"], true);
        assert_eq!(json["sharpness"], Value::Null);

        let snapshot = Snapshot {
            weapon: Some(bow),
            ..Snapshot::empty()
        };
        let text = summary_lines(&snapshot, &NoNames).join("\n");
        assert!(text.contains("Item 40 (Bow)"));
        assert!(!text.contains("sharpness"));
    }

    #[test]
    fn test_weapon_json_none() {
        assert_eq!(weapon_json(None, &NoNames), Value::Null);
    }

    #[test]
    fn test_reading_json_disconnected() {
        let reading: Reading<Vec<MonsterEntry>> = Reading::disconnected();
        let json = reading_json(&reading, json!([]));

        assert_eq!(json["connected"], false);
        assert_eq!(json["captured_at"], Value::Null);
        assert_eq!(json["value"], json!([]));
    }

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&hunting_snapshot(), &names());
        let text = lines.join("\n");

        assert!(text.contains("Aiden"));
        assert!(text.contains("Iron Katana I (Long Sword)"));
        assert!(text.contains("sharpness green"));
        assert!(text.contains("Rathalos"));
        assert!(text.contains("crown Gold"));
        assert!(text.contains("ENRAGED"));
        assert!(text.contains("Skill 5 Lv3"));
        assert!(text.contains("gear #101 42.5s x2"));
        assert!(text.contains("2:05"));
        assert!(text.contains("total 1234"));
    }

    #[test]
    fn test_summary_lines_disconnected() {
        let lines = summary_lines(&Snapshot::disconnected(), &NoNames);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Game not running"));
    }
}
