//! PasteQueue - Storage module
//!
//! Key/value persistence for the live queue, the enabled flag and named snapshots

pub mod database;
pub mod memory;
pub mod queue_store;

pub use database::SqliteStore;
pub use memory::MemoryStore;
pub use queue_store::{QueueStore, ENABLED_KEY, QUEUE_KEY, SNAPSHOT_PREFIX};

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Raw string key/value substrate
///
/// Values are opaque strings; `QueueStore` layers JSON encoding on top.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Returns whether the key existed
    fn remove(&self, key: &str) -> Result<bool, StorageError>;

    /// All keys starting with `prefix`, in ascending order
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Make every completed `set`/`remove` durable
    fn flush(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
