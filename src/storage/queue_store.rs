//! PasteQueue - Typed queue storage
//!
//! Maps the live queue, the enabled flag and named snapshots onto store keys.
//! Values are JSON so the layout matches what the extension keeps in its own
//! local storage.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{KeyValueStore, StorageError};

/// Live queue key
pub const QUEUE_KEY: &str = "pasteQueue";
/// Enabled flag key
pub const ENABLED_KEY: &str = "enabled";
/// Every named snapshot lives under this prefix
pub const SNAPSHOT_PREFIX: &str = "snapshot:";
/// Agent settings live under this prefix
pub const SETTING_PREFIX: &str = "setting:";

/// Cloneable typed view over a shared `KeyValueStore`
#[derive(Clone)]
pub struct QueueStore {
    kv: Arc<dyn KeyValueStore>,
}

impl QueueStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the live queue, empty when absent
    pub fn load_queue(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.get_json(QUEUE_KEY)?.unwrap_or_default())
    }

    pub fn save_queue(&self, queue: &[String]) -> Result<(), StorageError> {
        self.set_json(QUEUE_KEY, &queue)
    }

    /// Load the enabled flag, `true` when absent
    pub fn load_enabled(&self) -> Result<bool, StorageError> {
        Ok(self.get_json(ENABLED_KEY)?.unwrap_or(true))
    }

    pub fn save_enabled(&self, enabled: bool) -> Result<(), StorageError> {
        self.set_json(ENABLED_KEY, &enabled)
    }

    /// Save a named snapshot, silently replacing one with the same name
    pub fn save_snapshot(&self, name: &str, queue: &[String]) -> Result<(), StorageError> {
        self.set_json(&snapshot_key(name), &queue)
    }

    pub fn load_snapshot(&self, name: &str) -> Result<Option<Vec<String>>, StorageError> {
        self.get_json(&snapshot_key(name))
    }

    /// Returns whether a snapshot with that name existed
    pub fn delete_snapshot(&self, name: &str) -> Result<bool, StorageError> {
        self.kv.remove(&snapshot_key(name))
    }

    /// Snapshot names in ascending order
    pub fn snapshot_names(&self) -> Result<Vec<String>, StorageError> {
        let keys = self.kv.keys_with_prefix(SNAPSHOT_PREFIX)?;
        Ok(keys
            .into_iter()
            .filter_map(|key| key.strip_prefix(SNAPSHOT_PREFIX).map(str::to_string))
            .collect())
    }

    /// Raw setting value
    pub fn get_setting(&self, name: &str) -> Result<Option<String>, StorageError> {
        self.kv.get(&format!("{}{}", SETTING_PREFIX, name))
    }

    pub fn save_setting(&self, name: &str, value: &str) -> Result<(), StorageError> {
        self.kv.set(&format!("{}{}", SETTING_PREFIX, name), value)
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        self.kv.flush()
    }

    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.kv.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw)
    }
}

fn snapshot_key(name: &str) -> String {
    format!("{}{}", SNAPSHOT_PREFIX, name)
}
