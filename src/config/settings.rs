//! PasteQueue - User settings module
//!
//! Manages the page agent timings and the shared enabled flag

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::storage::{QueueStore, StorageError};

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "PASTEQUEUE_DATA_DIR";

/// Upper bound for any timing setting (one day)
pub const MAX_SETTING_MS: u64 = 24 * 60 * 60 * 1000;

/// Page agent timings. The enabled flag lives in `EnabledFlag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// An undo this soon after a paste rewinds the queue
    pub recent_paste_window_ms: u64,
    /// Delay between letting native undo run and rewinding
    pub rewind_delay_ms: u64,
    /// Rewind streak ends this long after the modifier is released
    pub streak_reset_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recent_paste_window_ms: 5000,
            rewind_delay_ms: 10,
            streak_reset_ms: 500,
        }
    }
}

impl Settings {
    /// Load settings (from store), falling back to defaults per key
    pub fn load(store: &QueueStore) -> Self {
        let mut settings = Settings::default();

        if let Some(ms) = load_millis(store, "recent_paste_window_ms") {
            settings.recent_paste_window_ms = ms;
        }
        if let Some(ms) = load_millis(store, "rewind_delay_ms") {
            settings.rewind_delay_ms = ms;
        }
        if let Some(ms) = load_millis(store, "streak_reset_ms") {
            settings.streak_reset_ms = ms;
        }

        settings
    }

    /// Save settings (to store)
    pub fn save(&self, store: &QueueStore) -> Result<(), StorageError> {
        store.save_setting("recent_paste_window_ms", &self.recent_paste_window_ms.to_string())?;
        store.save_setting("rewind_delay_ms", &self.rewind_delay_ms.to_string())?;
        store.save_setting("streak_reset_ms", &self.streak_reset_ms.to_string())?;
        Ok(())
    }

    pub fn recent_paste_window(&self) -> chrono::Duration {
        millis(self.recent_paste_window_ms)
    }

    pub fn rewind_delay(&self) -> Duration {
        Duration::from_millis(self.rewind_delay_ms.min(MAX_SETTING_MS))
    }

    pub fn streak_reset(&self) -> chrono::Duration {
        millis(self.streak_reset_ms)
    }
}

fn millis(ms: u64) -> chrono::Duration {
    chrono::Duration::milliseconds(ms.min(MAX_SETTING_MS) as i64)
}

fn load_millis(store: &QueueStore, name: &str) -> Option<u64> {
    match store.get_setting(name) {
        Ok(Some(raw)) => match raw.parse::<u64>() {
            Ok(ms) if ms <= MAX_SETTING_MS => Some(ms),
            Ok(ms) => {
                log::warn!("[Settings] Ignoring out-of-range {}: {}", name, ms);
                None
            }
            Err(_) => {
                log::warn!("[Settings] Ignoring invalid {}: {:?}", name, raw);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("[Settings] Failed to load {}: {}", name, e);
            None
        }
    }
}

/// Enabled flag shared between the control panel and page agents
///
/// Writes go to the store first; agents read the in-memory copy.
#[derive(Clone)]
pub struct EnabledFlag {
    value: Arc<AtomicBool>,
    store: QueueStore,
}

impl EnabledFlag {
    /// Initialize from the persisted flag (default `true`)
    pub fn load(store: QueueStore) -> Self {
        let enabled = store.load_enabled().unwrap_or_else(|e| {
            log::warn!("[Settings] Failed to load enabled flag: {}", e);
            true
        });
        Self {
            value: Arc::new(AtomicBool::new(enabled)),
            store,
        }
    }

    pub fn get(&self) -> bool {
        self.value.load(Ordering::SeqCst)
    }

    pub fn set(&self, enabled: bool) -> Result<(), StorageError> {
        self.store.save_enabled(enabled)?;
        self.value.store(enabled, Ordering::SeqCst);
        log::info!("[Settings] Paste queue {}", if enabled { "enabled" } else { "disabled" });
        Ok(())
    }
}

/// Get the application data directory
pub fn data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .map(|dir| dir.join("pastequeue"))
        .unwrap_or_else(|| PathBuf::from("."))
}
