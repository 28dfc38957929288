//! Clipboard adapter and the cut/copy/paste edits built on it.

use crate::document::Document;
use crate::error::ClipboardError;
use padcore::safety::{byte_offset, char_range_to_bytes, char_len, slice_chars};

pub trait Clipboard {
    /// Current text content, `None` when the clipboard holds no text.
    fn get_text(&mut self) -> Option<String>;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
    fn clear(&mut self) -> Result<(), ClipboardError>;
}

/// The platform clipboard.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, ClipboardError> {
        let inner = arboard::Clipboard::new().map_err(|e| ClipboardError(e.to_string()))?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.inner.get_text().ok().filter(|t| !t.is_empty())
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner
            .set_text(text)
            .map_err(|e| ClipboardError(e.to_string()))
    }

    fn clear(&mut self) -> Result<(), ClipboardError> {
        self.inner.clear().map_err(|e| ClipboardError(e.to_string()))
    }
}

/// Process-local clipboard, used when no platform clipboard is reachable
/// (headless sessions) and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    #[cfg(test)]
    pub fn with_text(text: &str) -> Self {
        Self { contents: Some(text.to_string()) }
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Option<String> {
        self.contents.clone().filter(|t| !t.is_empty())
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ClipboardError> {
        self.contents = None;
        Ok(())
    }
}

/// Platform clipboard if available, otherwise an in-memory one.
pub fn system_or_memory() -> Box<dyn Clipboard> {
    match SystemClipboard::new() {
        Ok(c) => Box::new(c),
        Err(e) => {
            log::warn!("platform clipboard unavailable ({}), using in-process clipboard", e);
            Box::new(MemoryClipboard::default())
        }
    }
}

/// Character-indexed selection on the text surface. `caret` is where the
/// cursor sits; the two ends may be in either order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub caret: usize,
}

impl Selection {
    pub fn caret(at: usize) -> Self {
        Self { anchor: at, caret: at }
    }

    pub fn new(anchor: usize, caret: usize) -> Self {
        Self { anchor, caret }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.caret
    }

    pub fn start(&self) -> usize {
        self.anchor.min(self.caret)
    }

    pub fn end(&self) -> usize {
        self.anchor.max(self.caret)
    }

    /// The selected text, or `None` for an empty selection.
    pub fn text<'a>(&self, text: &'a str) -> Option<&'a str> {
        if self.is_empty() {
            return None;
        }
        Some(slice_chars(text, self.start()..self.end())).filter(|s| !s.is_empty())
    }
}

/// Move the selected text to the clipboard. Returns the collapsed selection
/// after the cut, or `None` if nothing was selected.
pub fn cut(
    doc: &mut Document,
    selection: Selection,
    clipboard: &mut dyn Clipboard,
) -> Result<Option<Selection>, ClipboardError> {
    let Some(selected) = selection.text(&doc.text) else {
        return Ok(None);
    };
    clipboard.clear()?;
    clipboard.set_text(selected)?;
    let bytes = char_range_to_bytes(&doc.text, selection.start()..selection.end());
    doc.text.replace_range(bytes, "");
    doc.modified = true;
    Ok(Some(Selection::caret(selection.start())))
}

/// Copy the selected text. Returns whether anything was copied.
pub fn copy(
    doc: &Document,
    selection: Selection,
    clipboard: &mut dyn Clipboard,
) -> Result<bool, ClipboardError> {
    match selection.text(&doc.text) {
        Some(selected) => {
            clipboard.clear()?;
            clipboard.set_text(selected)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Insert the clipboard text at the caret. Returns the caret after the
/// inserted text, or `None` if the clipboard was empty.
pub fn paste(doc: &mut Document, selection: Selection, clipboard: &mut dyn Clipboard) -> Option<Selection> {
    let text = clipboard.get_text()?;
    let caret = selection.caret.min(char_len(&doc.text));
    doc.text.insert_str(byte_offset(&doc.text, caret), &text);
    doc.modified = true;
    Some(Selection::caret(caret + char_len(&text)))
}
