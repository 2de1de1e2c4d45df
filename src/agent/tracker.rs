//! PasteQueue - Paste/undo tracker
//!
//! Per-page state deciding whether an undo should also rewind the queue.
//!
//! ```text
//! Idle --paste--> JustPasted --undo+rewind--> RewindStreak(n)
//!  ^                  |                           |
//!  +--window expires--+      modifier released + reset delay elapsed
//!  +----------------------------------------------+
//! ```
//!
//! Timers are deadlines checked by `tick` at each event time, so the tracker
//! is driven entirely by the timestamps it is given.

use chrono::{DateTime, Duration, Utc};

use crate::config::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A paste landed recently enough for undo to rewind it
    JustPasted { at: DateTime<Utc> },
    /// `count` consecutive rewinds have succeeded
    RewindStreak { count: u32 },
}

#[derive(Debug, Clone)]
pub struct PasteTracker {
    recent_window: Duration,
    streak_reset: Duration,
    modifier_held: bool,
    last_paste: Option<DateTime<Utc>>,
    streak: u32,
    reset_at: Option<DateTime<Utc>>,
}

impl PasteTracker {
    pub fn new(recent_window: Duration, streak_reset: Duration) -> Self {
        Self {
            recent_window,
            streak_reset,
            modifier_held: false,
            last_paste: None,
            streak: 0,
            reset_at: None,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.recent_paste_window(), settings.streak_reset())
    }

    /// Fire the streak reset if its deadline has passed
    pub fn tick(&mut self, now: DateTime<Utc>) {
        if let Some(deadline) = self.reset_at {
            if now >= deadline {
                self.reset_at = None;
                if !self.modifier_held && self.streak > 0 {
                    log::debug!("[Tracker] Rewind streak of {} ended", self.streak);
                    self.streak = 0;
                }
            }
        }
    }

    pub fn phase(&self, now: DateTime<Utc>) -> Phase {
        if self.streak > 0 {
            return Phase::RewindStreak { count: self.streak };
        }
        match self.last_paste {
            Some(at) if now - at < self.recent_window => Phase::JustPasted { at },
            _ => Phase::Idle,
        }
    }

    pub fn modifier_held(&self) -> bool {
        self.modifier_held
    }

    pub fn modifier_down(&mut self, now: DateTime<Utc>) {
        self.tick(now);
        self.modifier_held = true;
    }

    pub fn modifier_up(&mut self, now: DateTime<Utc>) {
        self.tick(now);
        self.modifier_held = false;
        self.arm_reset(now);
    }

    /// The undo key was released
    pub fn undo_key_up(&mut self, now: DateTime<Utc>) {
        self.tick(now);
        self.arm_reset(now);
    }

    /// A queued item was inserted
    pub fn pasted(&mut self, now: DateTime<Utc>) {
        self.tick(now);
        self.last_paste = Some(now);
        self.reset_streak();
    }

    /// End any streak without recording a paste
    pub fn reset_streak(&mut self) {
        self.streak = 0;
        self.reset_at = None;
    }

    /// An undo combination arrived. Returns whether it should rewind the queue.
    pub fn begin_rewind(&mut self, now: DateTime<Utc>) -> bool {
        self.tick(now);
        match self.phase(now) {
            Phase::Idle => false,
            Phase::JustPasted { .. } | Phase::RewindStreak { .. } => {
                // A further rewind cancels a pending streak reset
                self.reset_at = None;
                true
            }
        }
    }

    /// The coordinator confirmed a rewind
    pub fn rewound(&mut self) {
        self.streak += 1;
    }

    fn arm_reset(&mut self, now: DateTime<Utc>) {
        if self.streak > 0 {
            // Out of range deadline: the streak lasts until the next paste
            self.reset_at = now.checked_add_signed(self.streak_reset);
            if self.reset_at.is_none() {
                log::warn!("[Tracker] Streak reset delay out of range, not armed");
            }
        }
    }
}
