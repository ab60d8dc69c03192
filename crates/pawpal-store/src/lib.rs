pub mod market;
pub mod seed;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Collection keys are namespaced the same way the original web client
/// prefixed its storage keys.
const KEY_PREFIX: &str = "pawpal_";

/// Key/value boundary for named collections. Each key holds one whole
/// collection as a JSON document; `save` overwrites it. Any backend that can
/// satisfy this (file, database, in-memory) slots in behind the accessors.
pub trait Store: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, data: &str) -> Result<()>;
}

fn prefixed(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

/// Durable backend: one SQLite table mapping collection key to JSON document.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS collections (
                key   TEXT PRIMARY KEY,
                data  TEXT NOT NULL
            );
            ",
        )?;

        info!("Store opened at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))?;
        f(&conn)
    }
}

impl Store for SqliteStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT data FROM collections WHERE key = ?1")?;
            let row = stmt.query_row([prefixed(key)], |row| row.get::<_, String>(0));
            match row {
                Ok(data) => Ok(Some(data)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    fn save(&self, key: &str, data: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO collections (key, data) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET data = excluded.data",
                (prefixed(key), data),
            )?;
            Ok(())
        })
    }
}

/// In-memory backend, used as the injectable fake in tests.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let map = self
            .map
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))?;
        Ok(map.get(&prefixed(key)).cloned())
    }

    fn save(&self, key: &str, data: &str) -> Result<()> {
        let mut map = self
            .map
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))?;
        map.insert(prefixed(key), data.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_load_save() {
        let store = MemoryStore::new();
        assert!(store.load("users").unwrap().is_none());

        store.save("users", "[]").unwrap();
        assert_eq!(store.load("users").unwrap().as_deref(), Some("[]"));

        store.save("users", "[1]").unwrap();
        assert_eq!(store.load("users").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(prefixed("pets"), "pawpal_pets");
    }
}
