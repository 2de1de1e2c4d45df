//! PasteQueue - Keyboard event model
//!
//! Key events as the page delivers them, and the paste/undo combinations

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Printable key, as reported (`'v'`, not `'V'`)
    Char(char),
    Control,
    Meta,
    Other,
}

impl Key {
    pub fn is_modifier(self) -> bool {
        matches!(self, Key::Control | Key::Meta)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    /// Control reported held by the event itself
    pub ctrl: bool,
    /// Meta/Command reported held by the event itself
    pub meta: bool,
    /// When the event fired
    pub at: DateTime<Utc>,
}

/// Combinations the agent reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combo {
    Paste,
    Undo,
}

impl KeyEvent {
    pub fn new(key: Key, at: DateTime<Utc>) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            at,
        }
    }

    /// Same key with Control held
    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    /// Same key with Meta held
    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Combination this event completes, given the tracked modifier state
    pub fn combo(&self, modifier_held: bool) -> Option<Combo> {
        if !(modifier_held || self.ctrl || self.meta) {
            return None;
        }
        match self.key {
            Key::Char('v') => Some(Combo::Paste),
            Key::Char('z') => Some(Combo::Undo),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combos_need_a_modifier() {
        let now = Utc::now();
        assert_eq!(KeyEvent::new(Key::Char('v'), now).combo(false), None);
        assert_eq!(KeyEvent::new(Key::Char('v'), now).combo(true), Some(Combo::Paste));
        assert_eq!(
            KeyEvent::new(Key::Char('v'), now).with_meta().combo(false),
            Some(Combo::Paste)
        );
        assert_eq!(
            KeyEvent::new(Key::Char('z'), now).with_ctrl().combo(false),
            Some(Combo::Undo)
        );
    }

    #[test]
    fn other_keys_are_not_combos() {
        let now = Utc::now();
        assert_eq!(KeyEvent::new(Key::Char('V'), now).with_ctrl().combo(true), None);
        assert_eq!(KeyEvent::new(Key::Control, now).with_ctrl().combo(true), None);
        assert!(Key::Meta.is_modifier());
        assert!(!Key::Other.is_modifier());
    }
}
