//! PasteQueue - Queue entry data models
//!
//! Display structures for pending queue entries

use serde::{Deserialize, Serialize};

/// Preview length for list display
pub const PREVIEW_LENGTH: usize = 100;

/// Simplified entry for control panel display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntryView {
    /// 1-based position among the pending items
    pub position: usize,
    /// Preview text (for list display)
    pub preview: String,
    /// Number of lines in the full entry
    pub line_count: usize,
}

impl QueueEntryView {
    pub fn new(position: usize, text: &str) -> Self {
        Self {
            position,
            preview: generate_preview(text, PREVIEW_LENGTH),
            line_count: text.split('\n').count(),
        }
    }

    /// Numbered label, e.g. `"1. hello"`
    pub fn label(&self) -> String {
        format!("{}. {}", self.position, self.preview)
    }

    /// Views for a pending sequence, numbered from 1
    pub fn list(pending: &[String]) -> Vec<Self> {
        pending
            .iter()
            .enumerate()
            .map(|(index, text)| Self::new(index + 1, text))
            .collect()
    }
}

/// Generate preview text
fn generate_preview(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_from_one() {
        let views = QueueEntryView::list(&["a".to_string(), "b\nc".to_string()]);
        assert_eq!(views[0].label(), "1. a");
        assert_eq!(views[1].position, 2);
        assert_eq!(views[1].line_count, 2);
    }

    #[test]
    fn long_entries_are_truncated_on_char_boundaries() {
        let text = "é".repeat(PREVIEW_LENGTH + 5);
        let view = QueueEntryView::new(1, &text);
        assert_eq!(view.preview.chars().count(), PREVIEW_LENGTH + 3);
        assert!(view.preview.ends_with("..."));
    }
}
