//! PasteQueue - Text insertion
//!
//! Editable surfaces a queued item can be inserted into, plus the generic
//! fallback used when the focused element is neither

use std::ops::Range;

use arboard::Clipboard;

/// Non-breaking space used for leading indentation in rich text
pub const NBSP: char = '\u{00A0}';

/// Insertion error type
#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] arboard::Error),
}

/// Plain input or textarea: a value and a selection in chars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    value: String,
    selection: Range<usize>,
}

impl TextField {
    /// Field with the caret at the end
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let end = value.chars().count();
        Self {
            value,
            selection: end..end,
        }
    }

    /// Select `start..end` (chars), clamped to the value
    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        let len = self.value.chars().count();
        let end = end.min(len);
        self.selection = start.min(end)..end;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// Replace the selection and put the caret after the inserted text
    pub fn insert(&mut self, text: &str) {
        let start = byte_offset(&self.value, self.selection.start);
        let end = byte_offset(&self.value, self.selection.end);
        self.value.replace_range(start..end, text);

        let caret = self.selection.start + text.chars().count();
        self.selection = caret..caret;
    }
}

fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map(|(i, _)| i).unwrap_or(s.len())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichNode {
    Text(String),
    LineBreak,
}

/// Content-editable surface as a flat list of text and line-break nodes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RichText {
    nodes: Vec<RichNode>,
    /// Selected node range, `None` when the surface has no selection
    selection: Option<Range<usize>>,
}

impl RichText {
    pub fn new(nodes: Vec<RichNode>) -> Self {
        Self {
            nodes,
            selection: None,
        }
    }

    /// Select nodes `start..end`, clamped to the content
    pub fn with_selection(mut self, start: usize, end: usize) -> Self {
        let end = end.min(self.nodes.len());
        self.selection = Some(start.min(end)..end);
        self
    }

    pub fn nodes(&self) -> &[RichNode] {
        &self.nodes
    }

    pub fn selection(&self) -> Option<Range<usize>> {
        self.selection.clone()
    }

    /// Text content with line breaks as `\n`
    pub fn plain_text(&self) -> String {
        self.nodes
            .iter()
            .map(|node| match node {
                RichNode::Text(text) => text.as_str(),
                RichNode::LineBreak => "\n",
            })
            .collect()
    }

    /// Replace the selection with `text` and collapse it to the end.
    /// Without a selection the text is appended.
    pub fn insert(&mut self, text: &str) {
        let fragment = rich_fragment(text);
        let inserted = fragment.len();
        match self.selection.take() {
            Some(range) => {
                let start = range.start;
                self.nodes.splice(range, fragment);
                let end = start + inserted;
                self.selection = Some(end..end);
            }
            None => self.nodes.extend(fragment),
        }
    }
}

/// One block per line, separated by line breaks, with each leading space
/// turned into a non-breaking space so the indentation survives
pub fn rich_fragment(text: &str) -> Vec<RichNode> {
    let mut nodes = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            nodes.push(RichNode::LineBreak);
        }
        let body = line.trim_start_matches(' ');
        let indent = line.len() - body.len();
        let mut block = String::with_capacity(line.len() + indent);
        block.extend(std::iter::repeat(NBSP).take(indent));
        block.push_str(body);
        if !block.is_empty() {
            nodes.push(RichNode::Text(block));
        }
    }
    nodes
}

/// Generic insertion primitive for surfaces the agent does not recognise
pub trait TextSink: Send + Sync {
    fn insert_text(&self, text: &str) -> Result<(), InsertError>;
}

/// Puts the text on the system clipboard for the focused application
#[derive(Default)]
pub struct ClipboardSink;

impl TextSink for ClipboardSink {
    fn insert_text(&self, text: &str) -> Result<(), InsertError> {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        log::debug!("[Insert] Placed {} chars on the system clipboard", text.chars().count());
        Ok(())
    }
}

/// Whatever currently has focus on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    TextField(TextField),
    RichText(RichText),
    /// Focus is somewhere the agent cannot edit directly
    Other,
}

/// Where a consumed item ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    TextField,
    RichText,
    Fallback,
    /// Nothing could take the text; the cursor has still advanced
    Dropped,
}

/// Insert into the focused surface, falling back to `fallback`
pub fn insert_into(focus: &mut FocusTarget, text: &str, fallback: Option<&dyn TextSink>) -> Insertion {
    match focus {
        FocusTarget::TextField(field) => {
            field.insert(text);
            Insertion::TextField
        }
        FocusTarget::RichText(rich) => {
            rich.insert(text);
            Insertion::RichText
        }
        FocusTarget::Other => match fallback {
            Some(sink) => match sink.insert_text(text) {
                Ok(()) => Insertion::Fallback,
                Err(e) => {
                    log::warn!("[Insert] Fallback insertion failed: {}", e);
                    Insertion::Dropped
                }
            },
            None => {
                log::debug!("[Insert] No editable target, dropping paste");
                Insertion::Dropped
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> RichNode {
        RichNode::Text(s.to_string())
    }

    #[test]
    fn text_field_replaces_selection() {
        let mut field = TextField::new("hello world").with_selection(6, 11);
        field.insert("there");
        assert_eq!(field.value(), "hello there");
        assert_eq!(field.selection(), 11..11);
    }

    #[test]
    fn text_field_counts_chars_not_bytes() {
        let mut field = TextField::new("héllo").with_selection(1, 2);
        field.insert("e");
        assert_eq!(field.value(), "hello");
        assert_eq!(field.selection(), 2..2);
    }

    #[test]
    fn fragment_splits_lines_and_keeps_indentation() {
        assert_eq!(
            rich_fragment("fn main() {\n    body();\n}"),
            vec![
                text("fn main() {"),
                RichNode::LineBreak,
                text("\u{a0}\u{a0}\u{a0}\u{a0}body();"),
                RichNode::LineBreak,
                text("}"),
            ]
        );
        assert_eq!(rich_fragment("a\n\nb"), vec![text("a"), RichNode::LineBreak, RichNode::LineBreak, text("b")]);
    }

    #[test]
    fn rich_text_replaces_selection_and_collapses() {
        let mut rich = RichText::new(vec![text("one"), text("two"), text("three")]).with_selection(1, 2);
        rich.insert("a\nb");
        assert_eq!(rich.plain_text(), "onea\nbthree");
        assert_eq!(rich.selection(), Some(4..4));
    }

    #[test]
    fn rich_text_without_selection_appends() {
        let mut rich = RichText::new(vec![text("x")]);
        rich.insert(" y");
        assert_eq!(rich.nodes(), &[text("x"), text("\u{a0}y")]);
        assert_eq!(rich.selection(), None);
    }

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<String>>);

    impl TextSink for RecordingSink {
        fn insert_text(&self, text: &str) -> Result<(), InsertError> {
            self.0.lock().push(text.to_string());
            Ok(())
        }
    }

    #[test]
    fn unknown_focus_uses_fallback_or_drops() {
        let sink = RecordingSink::default();
        let mut focus = FocusTarget::Other;
        assert_eq!(insert_into(&mut focus, "x", Some(&sink as &dyn TextSink)), Insertion::Fallback);
        assert_eq!(*sink.0.lock(), vec!["x".to_string()]);
        assert_eq!(insert_into(&mut focus, "y", None), Insertion::Dropped);
    }
}
