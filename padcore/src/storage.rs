//! File browser state for the in-app open/save dialogs.

use std::path::{Path, PathBuf};

/// Whether the browser is picking an existing file or a save target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserMode {
    Open,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
}

/// Directory listing plus selection, rendered by the app with
/// [`crate::widgets::FileListItem`].
#[derive(Debug, Clone)]
pub struct FileBrowser {
    pub mode: BrowserMode,
    pub current_dir: PathBuf,
    pub entries: Vec<FileEntry>,
    pub selected_index: Option<usize>,
    /// Editable file name shown in save mode.
    pub filename: String,
    default_extension: Option<String>,
}

impl FileBrowser {
    pub fn new(mode: BrowserMode, start_dir: PathBuf) -> Self {
        let mut browser = Self {
            mode,
            current_dir: start_dir,
            entries: Vec::new(),
            selected_index: None,
            filename: String::new(),
            default_extension: None,
        };
        browser.refresh();
        browser
    }

    /// Extension appended to save names typed without one, e.g. `"txt"`.
    pub fn with_default_extension(mut self, ext: &str) -> Self {
        self.default_extension = Some(ext.trim_start_matches('.').to_string());
        self
    }

    pub fn refresh(&mut self) {
        self.entries.clear();
        self.selected_index = None;

        if let Some(parent) = self.current_dir.parent() {
            self.entries.push(FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_directory: true,
            });
        }

        let read_dir = match std::fs::read_dir(&self.current_dir) {
            Ok(rd) => rd,
            Err(e) => {
                log::warn!("cannot list {}: {}", self.current_dir.display(), e);
                return;
            }
        };

        let (mut dirs, mut files): (Vec<_>, Vec<_>) = read_dir
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().to_string();
                // hidden files
                if name.starts_with('.') {
                    return None;
                }
                let path = entry.path();
                Some(FileEntry {
                    is_directory: path.is_dir(),
                    name,
                    path,
                })
            })
            .partition(|e| e.is_directory);

        dirs.sort_by_key(|e| e.name.to_lowercase());
        files.sort_by_key(|e| e.name.to_lowercase());
        self.entries.extend(dirs);
        self.entries.extend(files);
    }

    pub fn navigate_to(&mut self, path: PathBuf) {
        if path.is_dir() {
            self.current_dir = path;
            self.refresh();
        }
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.selected_index.and_then(|i| self.entries.get(i))
    }

    /// Select an entry; in save mode picking a file copies its name into
    /// the filename field.
    pub fn select(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index) else {
            return;
        };
        if self.mode == BrowserMode::Save && !entry.is_directory {
            self.filename = entry.name.clone();
        }
        self.selected_index = Some(index);
    }

    /// Directory a save should land in: the selected directory if one is
    /// selected (other than ".."), otherwise the current directory.
    pub fn save_directory(&self) -> PathBuf {
        match self.selected_entry() {
            Some(e) if e.is_directory && e.name != ".." => e.path.clone(),
            _ => self.current_dir.clone(),
        }
    }

    /// Full save path for the typed filename, or `None` if it is blank.
    pub fn resolve_save_path(&self) -> Option<PathBuf> {
        let name = self.filename.trim();
        if name.is_empty() {
            return None;
        }
        let mut path = self.save_directory().join(name);
        if let Some(ext) = &self.default_extension {
            if Path::new(name).extension().is_none() {
                path.set_extension(ext);
            }
        }
        Some(path)
    }
}

/// The user's documents directory, or `.` when the platform has none.
pub fn documents_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
}
