//! PasteQueue - Control panel
//!
//! Queue editing, the enable toggle and named snapshots. Every edit fetches
//! the pending queue, changes it and sends the whole sequence back through
//! replace-queue, so the cursor restarts at the first pending item.

use crate::commands::{RouterError, RouterHandle};
use crate::config::EnabledFlag;
use crate::queue::QueueEntryView;
use crate::storage::{QueueStore, StorageError};

/// Control panel error type
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error(transparent)]
    Router(#[from] RouterError),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("No queue entry at position {index} (queue has {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Snapshot name must not be empty")]
    EmptyName,
    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),
}

/// Shown in place of the list when nothing is pending
pub const EMPTY_QUEUE_LABEL: &str = "Queue is empty";

pub struct ControlPanel {
    router: RouterHandle,
    store: QueueStore,
    enabled: EnabledFlag,
}

impl ControlPanel {
    pub fn new(router: RouterHandle, store: QueueStore, enabled: EnabledFlag) -> Self {
        Self {
            router,
            store,
            enabled,
        }
    }

    /// Pending items
    pub async fn pending(&self) -> Result<Vec<String>, PanelError> {
        Ok(self.router.pending().await?)
    }

    pub async fn entries(&self) -> Result<Vec<QueueEntryView>, PanelError> {
        Ok(QueueEntryView::list(&self.pending().await?))
    }

    /// Display lines, one per pending entry
    pub async fn labels(&self) -> Result<Vec<String>, PanelError> {
        let entries = self.entries().await?;
        if entries.is_empty() {
            return Ok(vec![EMPTY_QUEUE_LABEL.to_string()]);
        }
        Ok(entries.iter().map(QueueEntryView::label).collect())
    }

    /// Append an entry. Blank input is ignored; returns whether it was added.
    pub async fn append(&self, text: &str) -> Result<bool, PanelError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        let mut queue = self.pending().await?;
        queue.push(text.to_string());
        self.router.replace(queue).await?;
        log::debug!("[Panel] Appended entry");
        Ok(true)
    }

    /// Replace the entry at `index` (0-based among pending items)
    pub async fn edit(&self, index: usize, text: &str) -> Result<(), PanelError> {
        let mut queue = self.pending().await?;
        let len = queue.len();
        let entry = queue
            .get_mut(index)
            .ok_or(PanelError::IndexOutOfRange { index, len })?;
        *entry = text.to_string();
        self.router.replace(queue).await?;
        Ok(())
    }

    /// Remove and return the entry at `index`
    pub async fn delete(&self, index: usize) -> Result<String, PanelError> {
        let mut queue = self.pending().await?;
        check_index(index, queue.len())?;
        let removed = queue.remove(index);
        self.router.replace(queue).await?;
        Ok(removed)
    }

    /// Move the entry at `from` so that it ends up at `to`
    pub async fn move_item(&self, from: usize, to: usize) -> Result<(), PanelError> {
        let mut queue = self.pending().await?;
        check_index(from, queue.len())?;
        check_index(to, queue.len())?;
        if from != to {
            let item = queue.remove(from);
            queue.insert(to, item);
        }
        self.router.replace(queue).await?;
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), PanelError> {
        self.router.replace(Vec::new()).await?;
        log::info!("[Panel] Queue cleared");
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), PanelError> {
        Ok(self.enabled.set(enabled)?)
    }

    /// Save the pending queue under `name`, replacing any snapshot of that name
    pub fn save_snapshot_of(&self, name: &str, queue: &[String]) -> Result<(), PanelError> {
        let name = snapshot_name(name)?;
        self.store.save_snapshot(name, queue)?;
        log::info!("[Panel] Saved snapshot '{}' ({} items)", name, queue.len());
        Ok(())
    }

    pub async fn save_snapshot(&self, name: &str) -> Result<(), PanelError> {
        let queue = self.pending().await?;
        self.save_snapshot_of(name, &queue)
    }

    /// Make the snapshot the live queue, cursor at its first item
    pub async fn load_snapshot(&self, name: &str) -> Result<Vec<String>, PanelError> {
        let queue = self
            .store
            .load_snapshot(name)?
            .ok_or_else(|| PanelError::SnapshotNotFound(name.to_string()))?;
        self.router.replace(queue.clone()).await?;
        log::info!("[Panel] Loaded snapshot '{}' ({} items)", name, queue.len());
        Ok(queue)
    }

    /// Returns whether the snapshot existed
    pub fn delete_snapshot(&self, name: &str) -> Result<bool, PanelError> {
        let deleted = self.store.delete_snapshot(name)?;
        if deleted {
            log::info!("[Panel] Deleted snapshot '{}'", name);
        }
        Ok(deleted)
    }

    pub fn snapshot_names(&self) -> Result<Vec<String>, PanelError> {
        Ok(self.store.snapshot_names()?)
    }
}

fn check_index(index: usize, len: usize) -> Result<(), PanelError> {
    if index < len {
        Ok(())
    } else {
        Err(PanelError::IndexOutOfRange { index, len })
    }
}

fn snapshot_name(name: &str) -> Result<&str, PanelError> {
    if name.trim().is_empty() {
        Err(PanelError::EmptyName)
    } else {
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::commands::CommandRouter;
    use crate::queue::QueueCoordinator;
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    async fn panel(items: &[&str]) -> ControlPanel {
        let store = QueueStore::new(Arc::new(MemoryStore::new()));
        let (router, _task) = CommandRouter::spawn(QueueCoordinator::load(store.clone()));
        router.replace(strings(items)).await.unwrap();
        let enabled = EnabledFlag::load(store.clone());
        ControlPanel::new(router, store, enabled)
    }

    #[tokio::test]
    async fn append_trims_and_ignores_blank() {
        let panel = panel(&["a"]).await;
        assert!(panel.append("  b \n").await.unwrap());
        assert!(!panel.append("   ").await.unwrap());
        assert_eq!(panel.pending().await.unwrap(), strings(&["a", "b"]));
    }

    #[tokio::test]
    async fn edit_delete_and_reorder() {
        let panel = panel(&["a", "b", "c"]).await;
        panel.edit(1, "B").await.unwrap();
        panel.move_item(2, 0).await.unwrap();
        assert_eq!(panel.pending().await.unwrap(), strings(&["c", "a", "B"]));

        assert_eq!(panel.delete(1).await.unwrap(), "a");
        assert_eq!(panel.pending().await.unwrap(), strings(&["c", "B"]));

        assert!(matches!(
            panel.edit(5, "x").await,
            Err(PanelError::IndexOutOfRange { index: 5, len: 2 })
        ));
        assert!(matches!(panel.move_item(0, 2).await, Err(PanelError::IndexOutOfRange { .. })));
    }

    #[tokio::test]
    async fn edits_apply_to_pending_items_only() {
        let panel = panel(&["a", "b", "c"]).await;
        assert_eq!(panel.router.paste().await.unwrap().as_deref(), Some("a"));

        panel.edit(0, "B").await.unwrap();
        assert_eq!(panel.pending().await.unwrap(), strings(&["B", "c"]));
        assert_eq!(panel.router.paste().await.unwrap().as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn labels_number_entries() {
        let panel = panel(&["first", "second"]).await;
        assert_eq!(panel.labels().await.unwrap(), strings(&["1. first", "2. second"]));

        panel.clear().await.unwrap();
        assert_eq!(panel.labels().await.unwrap(), strings(&[EMPTY_QUEUE_LABEL]));
    }

    #[tokio::test]
    async fn previews_are_shortened_but_pending_is_full() {
        let long = "y".repeat(150);
        let panel = panel(&[long.as_str()]).await;

        let entries = panel.entries().await.unwrap();
        assert_eq!(entries[0].preview, format!("{}...", "y".repeat(100)));
        assert_eq!(panel.pending().await.unwrap(), vec![long]);
    }

    #[tokio::test]
    async fn snapshots_round_trip_through_the_live_queue() {
        let panel = panel(&["a", "b"]).await;
        panel.save_snapshot("work").await.unwrap();
        panel.router.replace(strings(&["c"])).await.unwrap();

        assert_eq!(panel.load_snapshot("work").await.unwrap(), strings(&["a", "b"]));
        assert_eq!(panel.router.peek_next().await.unwrap().as_deref(), Some("a"));
        assert_eq!(panel.snapshot_names().unwrap(), strings(&["work"]));

        assert!(panel.delete_snapshot("work").unwrap());
        assert!(!panel.delete_snapshot("work").unwrap());
        assert!(matches!(
            panel.load_snapshot("work").await,
            Err(PanelError::SnapshotNotFound(name)) if name == "work"
        ));
    }

    #[tokio::test]
    async fn blank_snapshot_names_are_rejected() {
        let panel = panel(&["a"]).await;
        assert!(matches!(panel.save_snapshot("  ").await, Err(PanelError::EmptyName)));
        assert!(panel.snapshot_names().unwrap().is_empty());
    }

    #[tokio::test]
    async fn toggle_is_persisted() {
        let panel = panel(&[]).await;
        assert!(panel.is_enabled());
        panel.set_enabled(false).unwrap();
        assert!(!panel.is_enabled());
        assert!(!panel.store.load_enabled().unwrap());
    }
}
