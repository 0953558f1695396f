//! Name lookup backed by the game text database.
//!
//! Each category lives in its own `<category>_text` table with
//! `(id, lang_id, name)` rows.

use std::path::Path;

use huntwatch_core::{NameCategory, NameResolver};
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use tracing::debug;

pub struct SqliteNames {
    conn: Connection,
    languages: Vec<String>,
}

impl SqliteNames {
    /// Open the database read-only
    pub fn open<P: AsRef<Path>>(path: P, languages: Vec<String>) -> rusqlite::Result<Self> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self::from_connection(conn, languages))
    }

    pub fn from_connection(conn: Connection, languages: Vec<String>) -> Self {
        Self { conn, languages }
    }

    fn query(&self, category: NameCategory, id: u32, lang: &str) -> rusqlite::Result<Option<String>> {
        let sql = format!(
            "SELECT name FROM {} WHERE id = ?1 AND lang_id = ?2 LIMIT 1",
            category.table()
        );
        let name = self
            .conn
            .query_row(&sql, params![id, lang], |row| row.get::<_, Option<String>>(0))
            .optional()?
            .flatten();
        Ok(name.filter(|name| !name.trim().is_empty()))
    }
}

impl NameResolver for SqliteNames {
    fn lookup(&self, category: NameCategory, id: u32) -> Option<String> {
        if id == 0 {
            return None;
        }
        for lang in &self.languages {
            match self.query(category, id, lang) {
                Ok(Some(name)) => return Some(name),
                Ok(None) => continue,
                Err(e) => {
                    debug!("Name lookup {} {} failed: {}", category, id, e);
                    return None;
                }
            }
        }
        None
    }
}
