//! The document buffer and the file persistence adapter.

use crate::error::{EditorError, Result};
use std::path::{Path, PathBuf};

/// The single open document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub path: Option<PathBuf>,
    pub modified: bool,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// True when there is nothing worth saving.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn title(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string())
    }

    pub fn display_title(&self) -> String {
        if self.modified {
            format!("{}*", self.title())
        } else {
            self.title()
        }
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count().max(1)
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Where documents are read from and written to.
pub trait Persistence {
    fn read(&self, path: &Path) -> Result<String>;
    fn write(&self, path: &Path, text: &str) -> Result<()>;
}

/// Plain UTF-8 files on the local file system.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSystem;

impl Persistence for FileSystem {
    fn read(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).map_err(|e| EditorError::io(path, e))
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        std::fs::write(path, text).map_err(|e| EditorError::io(path, e))
    }
}

pub fn blank_save_error() -> EditorError {
    EditorError::Validation("cannot save an empty file".to_string())
}

/// Read `path` into a fresh document.
pub fn open(store: &dyn Persistence, path: &Path) -> Result<Document> {
    let text = store.read(path)?;
    log::info!("opened {} ({} bytes)", path.display(), text.len());
    Ok(Document {
        text,
        path: Some(path.to_path_buf()),
        modified: false,
    })
}

/// Write the document to `path`. A blank document is rejected before
/// anything touches the disk.
pub fn save(store: &dyn Persistence, path: &Path, doc: &mut Document) -> Result<()> {
    if doc.is_blank() {
        return Err(blank_save_error());
    }
    store.write(path, &doc.text)?;
    log::info!("saved {} ({} bytes)", path.display(), doc.text.len());
    doc.path = Some(path.to_path_buf());
    doc.modified = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_document() {
        let doc = Document::new();
        assert!(doc.is_blank());
        assert_eq!(doc.title(), "untitled");
        assert_eq!(doc.line_count(), 1);
        assert!(!doc.modified);
    }

    #[test]
    fn test_save_then_open_in_new_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");

        let mut doc = Document::from_text("hello world");
        doc.modified = true;
        save(&FileSystem, &path, &mut doc).unwrap();
        assert!(!doc.modified);
        assert_eq!(doc.display_title(), "a.txt");

        let reopened = open(&FileSystem, &path).unwrap();
        assert_eq!(reopened.text, "hello world");
        assert_eq!(reopened.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_whitespace_buffer_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");

        for text in ["", "   ", "\n\t \r\n"] {
            let mut doc = Document::from_text(text);
            let err = save(&FileSystem, &path, &mut doc).unwrap_err();
            assert!(matches!(err, EditorError::Validation(_)));
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_open_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open(&FileSystem, &dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, EditorError::Io { .. }));
    }

    #[test]
    fn test_open_non_utf8_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.dat");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0xc3]).unwrap();
        assert!(matches!(open(&FileSystem, &path), Err(EditorError::Io { .. })));
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("a.txt");
        let mut doc = Document::from_text("text");
        doc.modified = true;
        assert!(matches!(save(&FileSystem, &path, &mut doc), Err(EditorError::Io { .. })));
        assert!(doc.modified);
        assert!(doc.path.is_none());
    }

    proptest! {
        #[test]
        fn save_open_round_trip(text in "\\PC*[a-zA-Z0-9]\\PC*") {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("doc.txt");
            let mut doc = Document::from_text(text.clone());
            save(&FileSystem, &path, &mut doc).unwrap();
            prop_assert_eq!(open(&FileSystem, &path).unwrap().text, text);
        }
    }
}
