//! PasteQueue - Database operations module
//!
//! Uses SQLite as the key/value substrate behind `QueueStore`

use std::fs;
use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use super::{KeyValueStore, StorageError};

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "queue.db";

/// SQLite-backed key/value store
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database inside `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        // Ensure data directory exists
        fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join(DATABASE_FILE);
        log::info!("[Storage] Opening database at: {:?}", db_path);

        Self::init(Connection::open(&db_path)?)
    }

    /// Private in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;

        log::info!("[Storage] Database initialized successfully");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let value = stmt.query_row([key], |row| row.get(0)).optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let conn = self.conn.lock();
        let affected = conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(affected > 0)
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let conn = self.conn.lock();
        // substr comparison avoids LIKE wildcards inside user-supplied names
        let mut stmt = conn.prepare(
            "SELECT key FROM kv WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key ASC",
        )?;
        let keys = stmt
            .query_map([prefix], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    fn flush(&self) -> Result<(), StorageError> {
        // Autocommit mode: every statement is already durable. Checkpoint any WAL.
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("PRAGMA wal_checkpoint(PASSIVE)")?;
        let mut rows = stmt.query([])?;
        while rows.next()?.is_some() {}
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn set_get_and_overwrite() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn remove_reports_existence() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("gone", "x").unwrap();
        assert!(store.remove("gone").unwrap());
        assert!(!store.remove("gone").unwrap());
    }

    #[test]
    fn prefix_scan_treats_wildcards_literally() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("snapshot:b", "[]").unwrap();
        store.set("snapshot:a", "[]").unwrap();
        store.set("snapshots", "[]").unwrap();
        store.set("snap%:x", "[]").unwrap();

        assert_eq!(
            store.keys_with_prefix("snapshot:").unwrap(),
            vec!["snapshot:a".to_string(), "snapshot:b".to_string()]
        );
        assert_eq!(store.keys_with_prefix("snap%").unwrap(), vec!["snap%:x".to_string()]);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SqliteStore::open(dir.path()).unwrap();
            store.set("pasteQueue", r#"["a"]"#).unwrap();
            store.flush().unwrap();
        }
        let store = SqliteStore::open(dir.path()).unwrap();
        assert_eq!(store.get("pasteQueue").unwrap().as_deref(), Some(r#"["a"]"#));
    }
}
