//! Display-name lookup for the numeric ids the decoders produce.
//!
//! The engine never interprets ids itself; consumers plug in a
//! `NameResolver` (an SQLite text database, a static map, ...) and
//! annotate snapshots after they leave the reader.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

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
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NameCategory {
    Weapon,
    Armor,
    Charm,
    Monster,
    Skill,
}

impl NameCategory {
    /// Backing table in the game text database
    pub fn table(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon_text",
            Self::Armor => "armor_text",
            Self::Charm => "charm_text",
            Self::Monster => "monster_text",
            Self::Skill => "skilltree_text",
        }
    }

    fn placeholder(&self, id: u32) -> String {
        match self {
            Self::Skill => format!("Skill {}", id),
            Self::Monster => format!("Monster {}", id),
            _ => format!("Item {}", id),
        }
    }
}

/// Maps `(category, id)` to a localized name.
///
/// Id 0 means "empty" and never resolves.
pub trait NameResolver {
    fn lookup(&self, category: NameCategory, id: u32) -> Option<String>;
}

impl<T: NameResolver + ?Sized> NameResolver for &T {
    fn lookup(&self, category: NameCategory, id: u32) -> Option<String> {
        (**self).lookup(category, id)
    }
}

impl<T: NameResolver + ?Sized> NameResolver for Box<T> {
    fn lookup(&self, category: NameCategory, id: u32) -> Option<String> {
        (**self).lookup(category, id)
    }
}

/// Resolver that knows no names; every id falls back to a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameResolver for NoNames {
    fn lookup(&self, _category: NameCategory, _id: u32) -> Option<String> {
        None
    }
}

/// In-memory name table.
#[derive(Debug, Clone, Default)]
pub struct StaticNames {
    names: HashMap<(NameCategory, u32), String>,
}

impl StaticNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: NameCategory, id: u32, name: impl Into<String>) -> Self {
        self.insert(category, id, name);
        self
    }

    pub fn insert(&mut self, category: NameCategory, id: u32, name: impl Into<String>) {
        self.names.insert((category, id), name.into());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NameResolver for StaticNames {
    fn lookup(&self, category: NameCategory, id: u32) -> Option<String> {
        if id == 0 {
            return None;
        }
        self.names.get(&(category, id)).cloned()
    }
}

/// Memoizing wrapper; misses are cached too.
pub struct CachedNames<R> {
    inner: R,
    cache: Mutex<HashMap<(NameCategory, u32), Option<String>>>,
}

impl<R: NameResolver> CachedNames<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn clear(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<R: NameResolver> NameResolver for CachedNames<R> {
    fn lookup(&self, category: NameCategory, id: u32) -> Option<String> {
        if id == 0 {
            return None;
        }
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        cache
            .entry((category, id))
            .or_insert_with(|| self.inner.lookup(category, id))
            .clone()
    }
}

/// Resolved name, or a placeholder such as "Item 42" / "Skill 7".
///
/// Returns `None` only for id 0.
pub fn display_name<R: NameResolver + ?Sized>(
    resolver: &R,
    category: NameCategory,
    id: u32,
) -> Option<String> {
    if id == 0 {
        return None;
    }
    Some(
        resolver
            .lookup(category, id)
            .unwrap_or_else(|| category.placeholder(id)),
    )
}
