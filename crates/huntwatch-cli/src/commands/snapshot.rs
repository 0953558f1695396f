//! Snapshot command: print the full snapshot or one getter as JSON.

use anyhow::Result;
use clap::ValueEnum;
use huntwatch_core::{NameResolver, TelemetryReader};
use serde_json::Value;

use crate::render;

/// Entity selectable with `--entity`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Entity {
    Player,
    Weapon,
    Equipment,
    Monsters,
    Skills,
    Damage,
    Abnormalities,
    Zone,
}

pub fn run<R: NameResolver + ?Sized>(
    reader: &TelemetryReader,
    names: &R,
    entity: Option<Entity>,
    fresh: bool,
) -> Result<()> {
    super::connect_or_warn(reader);
    let value = snapshot_value(reader, names, entity, fresh)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn snapshot_value<R: NameResolver + ?Sized>(
    reader: &TelemetryReader,
    names: &R,
    entity: Option<Entity>,
    fresh: bool,
) -> Result<Value> {
    let Some(entity) = entity else {
        let snapshot = if fresh {
            reader.get_fresh_snapshot()
        } else {
            reader.get_full_snapshot()
        };
        return Ok(render::snapshot_json(&snapshot, names)?);
    };

    if fresh {
        reader.invalidate();
    }
    entity_json(reader, names, entity)
}

/// One getter's reading, ids annotated with names.
pub fn entity_json<R: NameResolver + ?Sized>(
    reader: &TelemetryReader,
    names: &R,
    entity: Entity,
) -> Result<Value> {
    let value = match entity {
        Entity::Player => render::plain_reading_json(&reader.get_player())?,
        Entity::Weapon => {
            let reading = reader.get_weapon();
            render::reading_json(&reading, render::weapon_json(reading.as_ref(), names))
        }
        Entity::Equipment => {
            let reading = reader.get_equipment();
            render::reading_json(&reading, render::equipment_json(&reading, names))
        }
        Entity::Monsters => {
            let reading = reader.get_monsters();
            let monsters = reading
                .iter()
                .map(|monster| render::monster_json(monster, names))
                .collect();
            render::reading_json(&reading, monsters)
        }
        Entity::Skills => {
            let reading = reader.get_skills();
            render::reading_json(&reading, render::skills_json(&reading, names))
        }
        Entity::Damage => render::plain_reading_json(&reader.get_damage())?,
        Entity::Abnormalities => render::plain_reading_json(&reader.get_abnormalities())?,
        Entity::Zone => render::plain_reading_json(&reader.get_zone())?,
    };
    Ok(value)
}
