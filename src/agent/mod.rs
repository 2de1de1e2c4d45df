//! PasteQueue - Page agent
//!
//! Runs alongside a page: turns paste combinations into queue consumption and
//! undo combinations into queue rewinds.
//!
//! Undo is two-phase. The native undo is allowed to run first and the rewind
//! is sent after a short delay. This is a best-effort ordering heuristic: the
//! agent cannot observe when the native undo has applied.

pub mod insert;
pub mod keys;
pub mod tracker;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::commands::RouterHandle;
use crate::config::{EnabledFlag, Settings};

pub use insert::{insert_into, ClipboardSink, FocusTarget, Insertion, RichNode, RichText, TextField, TextSink};
pub use keys::{Combo, Key, KeyEvent};
pub use tracker::{PasteTracker, Phase};

/// Result of a paste attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasteOutcome {
    Inserted(Insertion),
    /// Nothing left in the queue
    Exhausted,
    /// The router could not be reached
    Unavailable,
}

/// What the page should do with a key event
#[derive(Debug)]
pub enum KeyOutcome {
    /// Let the default action run
    PassThrough,
    /// Default paste suppressed; queue paste attempted
    Paste(PasteOutcome),
    /// Native undo runs; a rewind is scheduled when the handle is present.
    /// The handle resolves to whether the rewind succeeded.
    Undo(Option<JoinHandle<bool>>),
}

impl KeyOutcome {
    /// Whether the page must suppress the event's default action
    pub fn prevents_default(&self) -> bool {
        matches!(self, KeyOutcome::Paste(_))
    }
}

pub struct PageAgent {
    router: RouterHandle,
    enabled: EnabledFlag,
    tracker: Arc<Mutex<PasteTracker>>,
    rewind_delay: Duration,
    fallback: Option<Box<dyn TextSink>>,
}

impl PageAgent {
    pub fn new(router: RouterHandle, enabled: EnabledFlag, settings: &Settings) -> Self {
        Self {
            router,
            enabled,
            tracker: Arc::new(Mutex::new(PasteTracker::from_settings(settings))),
            rewind_delay: settings.rewind_delay(),
            fallback: None,
        }
    }

    /// Generic insertion used when focus is not an editable surface
    pub fn with_fallback(mut self, sink: Box<dyn TextSink>) -> Self {
        self.fallback = Some(sink);
        self
    }

    pub fn phase(&self, now: DateTime<Utc>) -> Phase {
        let mut tracker = self.tracker.lock();
        tracker.tick(now);
        tracker.phase(now)
    }

    pub async fn key_down(&self, event: KeyEvent, focus: &mut FocusTarget) -> KeyOutcome {
        if event.key.is_modifier() {
            self.tracker.lock().modifier_down(event.at);
            return KeyOutcome::PassThrough;
        }
        if !self.enabled.get() {
            return KeyOutcome::PassThrough;
        }

        let held = self.tracker.lock().modifier_held();
        match event.combo(held) {
            Some(Combo::Paste) => {
                log::debug!("[Agent] Paste combination intercepted");
                KeyOutcome::Paste(self.paste(focus, event.at).await)
            }
            Some(Combo::Undo) => KeyOutcome::Undo(self.schedule_rewind(event.at)),
            None => KeyOutcome::PassThrough,
        }
    }

    pub fn key_up(&self, event: KeyEvent) {
        let mut tracker = self.tracker.lock();
        if event.key.is_modifier() {
            tracker.modifier_up(event.at);
        } else if event.key == Key::Char('z') {
            tracker.undo_key_up(event.at);
        } else {
            tracker.tick(event.at);
        }
    }

    /// Native paste event. `None` when disabled and the default should run.
    pub async fn paste_event(&self, focus: &mut FocusTarget, at: DateTime<Utc>) -> Option<PasteOutcome> {
        if !self.enabled.get() {
            return None;
        }
        log::debug!("[Agent] Paste event intercepted");
        self.tracker.lock().reset_streak();
        Some(self.paste(focus, at).await)
    }

    async fn paste(&self, focus: &mut FocusTarget, at: DateTime<Utc>) -> PasteOutcome {
        let text = match self.router.paste().await {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::debug!("[Agent] Queue exhausted");
                return PasteOutcome::Exhausted;
            }
            Err(e) => {
                log::warn!("[Agent] Paste skipped: {}", e);
                return PasteOutcome::Unavailable;
            }
        };

        let insertion = insert_into(focus, &text, self.fallback.as_deref());
        if insertion != Insertion::Dropped {
            self.tracker.lock().pasted(at);
        }
        PasteOutcome::Inserted(insertion)
    }

    fn schedule_rewind(&self, at: DateTime<Utc>) -> Option<JoinHandle<bool>> {
        if !self.tracker.lock().begin_rewind(at) {
            return None;
        }

        let router = self.router.clone();
        let tracker = Arc::clone(&self.tracker);
        let delay = self.rewind_delay;
        Some(tokio::spawn(async move {
            // Give the native undo a chance to apply first
            tokio::time::sleep(delay).await;
            match router.undo().await {
                Ok(true) => {
                    let mut tracker = tracker.lock();
                    tracker.rewound();
                    log::debug!("[Agent] Rewind succeeded, streak {:?}", tracker.phase(at));
                    true
                }
                Ok(false) => false,
                Err(e) => {
                    log::warn!("[Agent] Rewind skipped: {}", e);
                    false
                }
            }
        }))
    }
}
