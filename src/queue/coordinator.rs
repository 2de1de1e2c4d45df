//! PasteQueue - Queue coordinator
//!
//! Owns the live queue and the read cursor. Items before the cursor have been
//! pasted, items from the cursor onward are pending.

use crate::storage::QueueStore;

pub struct QueueCoordinator {
    queue: Vec<String>,
    /// Invariant: `cursor <= queue.len()`
    cursor: usize,
    store: QueueStore,
}

impl QueueCoordinator {
    /// Load the queue from storage with the cursor at 0
    ///
    /// A persisted cursor is never restored, so items pasted before a restart
    /// are offered again.
    pub fn load(store: QueueStore) -> Self {
        let queue = match store.load_queue() {
            Ok(queue) => queue,
            Err(e) => {
                log::warn!("[Coordinator] Failed to load queue, starting empty: {}", e);
                Vec::new()
            }
        };
        log::info!("[Coordinator] Loaded {} queued items", queue.len());

        Self {
            queue,
            cursor: 0,
            store,
        }
    }

    /// Pending items, from the cursor to the end
    pub fn peek_pending(&self) -> Vec<String> {
        self.queue[self.cursor..].to_vec()
    }

    /// Replace the whole queue and reset the cursor. Always succeeds.
    pub fn replace_queue(&mut self, queue: Vec<String>) -> bool {
        self.queue = queue;
        self.cursor = 0;
        self.persist();
        log::debug!("[Coordinator] Queue replaced with {} items", self.queue.len());
        true
    }

    /// Take the item at the cursor and advance. `None` when exhausted.
    pub fn consume_next(&mut self) -> Option<String> {
        let text = self.queue.get(self.cursor).cloned()?;
        self.cursor += 1;
        self.persist();
        log::debug!("[Coordinator] Consumed item {} of {}", self.cursor, self.queue.len());
        Some(text)
    }

    /// Item at the cursor without consuming it
    pub fn peek_next(&self) -> Option<String> {
        self.queue.get(self.cursor).cloned()
    }

    /// Move the cursor back one item. `false` when already at the start.
    pub fn rewind_one(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        log::debug!("[Coordinator] Rewound to item {}", self.cursor);
        true
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Flush pending writes before the coordinator goes away
    pub fn close(self) {
        if let Err(e) = self.store.flush() {
            log::warn!("[Coordinator] Failed to flush store on close: {}", e);
        }
        log::info!("[Coordinator] Closed");
    }

    fn persist(&self) {
        // The in-memory queue stays authoritative when the write fails
        if let Err(e) = self.store.save_queue(&self.queue) {
            log::warn!("[Coordinator] Failed to persist queue: {}", e);
        }
    }
}
