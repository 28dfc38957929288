//! Application state and the handlers behind every menu entry.
//!
//! `ShellState` owns the document and the adapters. The eframe app renders
//! it and forwards user actions here; nothing in this module draws.

use crate::appearance::{Appearance, ColorChoice, ColorChooser};
use crate::clipboard::{self, Clipboard, Selection};
use crate::document::{self, blank_save_error, Document, Persistence};
use crate::error::{EditorError, UpdateError};
use crate::update::task::UpdateResult;
use crate::update::{SystemUpdater, UpdateConfig, UpdateOutcome, UpdateState, UpdateTask};
use padcore::storage::{documents_dir, BrowserMode, FileBrowser};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    New,
    Open,
    Save,
    Update,
    Exit,
    Cut,
    Copy,
    Paste,
    ChangeTheme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A modal message the user has to acknowledge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, title: title.to_string(), message: message.into() }
    }

    pub fn error(title: &str, message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, title: title.to_string(), message: message.into() }
    }
}

/// The dialog currently open over the editor, if any.
pub enum Dialog {
    Browser(FileBrowser),
    Color(ColorChooser),
}

/// Starts update checks. `on_finish` must be run by the worker when the
/// result is ready.
pub trait UpdateLauncher {
    fn launch(&self, on_finish: Box<dyn FnOnce() + Send>) -> std::io::Result<UpdateTask>;
}

impl<F> UpdateLauncher for F
where
    F: Fn(Box<dyn FnOnce() + Send>) -> std::io::Result<UpdateTask>,
{
    fn launch(&self, on_finish: Box<dyn FnOnce() + Send>) -> std::io::Result<UpdateTask> {
        self(on_finish)
    }
}

/// Checks the real release feed and installs with `unzip`.
pub struct FeedLauncher {
    pub config: UpdateConfig,
}

impl UpdateLauncher for FeedLauncher {
    fn launch(&self, on_finish: Box<dyn FnOnce() + Send>) -> std::io::Result<UpdateTask> {
        UpdateTask::spawn(SystemUpdater::system(self.config.clone()), on_finish)
    }
}

pub struct ShellState {
    pub doc: Document,
    /// Last selection seen on the text surface.
    pub selection: Selection,
    pub appearance: Appearance,
    pub dialog: Option<Dialog>,
    store: Box<dyn Persistence>,
    clipboard: Box<dyn Clipboard>,
    launcher: Box<dyn UpdateLauncher>,
    waker: Option<egui::Context>,
    notices: VecDeque<Notice>,
    /// Selection the text surface should adopt on its next frame.
    pending_cursor: Option<Selection>,
    paste_enabled: bool,
    update: Option<UpdateTask>,
    update_status: String,
    /// Worker state last copied into `update_status`.
    shown_state: Option<UpdateState>,
    exit_requested: bool,
}

impl ShellState {
    pub fn new(
        store: Box<dyn Persistence>,
        clipboard: Box<dyn Clipboard>,
        launcher: Box<dyn UpdateLauncher>,
    ) -> Self {
        Self {
            doc: Document::new(),
            selection: Selection::default(),
            appearance: Appearance::default(),
            dialog: None,
            store,
            clipboard,
            launcher,
            waker: None,
            notices: VecDeque::new(),
            pending_cursor: None,
            paste_enabled: true,
            update: None,
            update_status: String::new(),
            shown_state: None,
            exit_requested: false,
        }
    }

    /// Context to repaint when a background check finishes.
    pub fn with_waker(mut self, ctx: egui::Context) -> Self {
        self.waker = Some(ctx);
        self
    }

    pub fn dispatch(&mut self, action: MenuAction) {
        log::debug!("menu action {:?}", action);
        match action {
            MenuAction::New => self.new_document(),
            MenuAction::Open => self.show_open_dialog(),
            MenuAction::Save => self.show_save_dialog(),
            MenuAction::Update => self.start_update(),
            MenuAction::Exit => {
                self.cancel_update();
                self.exit_requested = true;
            }
            MenuAction::Cut => self.cut(),
            MenuAction::Copy => self.copy(),
            MenuAction::Paste => self.paste(),
            MenuAction::ChangeTheme => {
                self.dialog = Some(Dialog::Color(ColorChooser::starting_at(
                    self.appearance.background(),
                )));
            }
        }
    }

    fn new_document(&mut self) {
        self.doc = Document::new();
        self.set_cursor(Selection::caret(0));
    }

    fn browser_start_dir(&self) -> PathBuf {
        self.doc
            .path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(documents_dir)
    }

    fn show_open_dialog(&mut self) {
        let browser = FileBrowser::new(BrowserMode::Open, self.browser_start_dir());
        self.dialog = Some(Dialog::Browser(browser));
    }

    fn show_save_dialog(&mut self) {
        if self.doc.is_blank() {
            self.push_notice(Notice::error("Error", blank_save_error().to_string()));
            return;
        }
        let mut browser = FileBrowser::new(BrowserMode::Save, self.browser_start_dir())
            .with_default_extension("txt");
        browser.filename = match self.doc.path {
            Some(_) => self.doc.title(),
            None => "untitled.txt".to_string(),
        };
        self.dialog = Some(Dialog::Browser(browser));
    }

    /// Replace the buffer with the contents of `path`.
    pub fn open_path(&mut self, path: &Path) {
        match document::open(self.store.as_ref(), path) {
            Ok(doc) => {
                self.doc = doc;
                self.set_cursor(Selection::caret(0));
            }
            Err(e) => {
                log::error!("open failed: {}", e);
                self.push_notice(Notice::error("Error", e.to_string()));
            }
        }
    }

    pub fn save_to(&mut self, path: &Path) {
        match document::save(self.store.as_ref(), path, &mut self.doc) {
            Ok(()) => self.push_notice(Notice::info("Success", "File saved successfully!")),
            Err(e) => {
                log::error!("save failed: {}", e);
                self.push_notice(Notice::error("Error", e.to_string()));
            }
        }
    }

    pub fn finish_color_choice(&mut self, choice: ColorChoice) {
        self.appearance.apply_choice(choice);
        self.dialog = None;
    }

    fn cut(&mut self) {
        match clipboard::cut(&mut self.doc, self.selection, self.clipboard.as_mut()) {
            Ok(Some(after)) => self.set_cursor(after),
            Ok(None) => {}
            Err(e) => self.push_notice(Notice::error("Error", EditorError::from(e).to_string())),
        }
    }

    fn copy(&mut self) {
        match clipboard::copy(&self.doc, self.selection, self.clipboard.as_mut()) {
            Ok(copied) => self.paste_enabled = copied,
            Err(e) => self.push_notice(Notice::error("Error", EditorError::from(e).to_string())),
        }
    }

    fn paste(&mut self) {
        match clipboard::paste(&mut self.doc, self.selection, self.clipboard.as_mut()) {
            Some(after) => {
                self.paste_enabled = true;
                self.set_cursor(after);
            }
            None => self.paste_enabled = false,
        }
    }

    fn set_cursor(&mut self, selection: Selection) {
        self.selection = selection;
        self.pending_cursor = Some(selection);
    }

    pub fn take_pending_cursor(&mut self) -> Option<Selection> {
        self.pending_cursor.take()
    }

    pub fn paste_enabled(&self) -> bool {
        self.paste_enabled
    }

    fn start_update(&mut self) {
        if self.update.is_some() {
            self.update_status = "update check already running".to_string();
            return;
        }
        let waker = self.waker.clone();
        let on_finish: Box<dyn FnOnce() + Send> = Box::new(move || {
            if let Some(ctx) = waker {
                ctx.request_repaint();
            }
        });
        match self.launcher.launch(on_finish) {
            Ok(task) => {
                self.update_status = task.state().status_text();
                self.shown_state = Some(task.state().clone());
                self.update = Some(task);
            }
            Err(e) => {
                log::error!("could not start update check: {}", e);
                self.push_notice(Notice::error(
                    "Error",
                    format!("An error occurred while checking for updates: {e}"),
                ));
            }
        }
    }

    /// Collect a finished update check. Returns true if one finished.
    pub fn poll_update(&mut self) -> bool {
        let Some(task) = self.update.as_mut() else {
            return false;
        };
        let result = task.poll();
        if self.shown_state.as_ref() != Some(task.state()) {
            self.update_status = task.state().status_text();
            self.shown_state = Some(task.state().clone());
        }
        let Some(result) = result else {
            return false;
        };
        self.update = None;
        self.shown_state = None;
        self.report_update(result);
        true
    }

    fn report_update(&mut self, result: UpdateResult) {
        match result {
            Ok(UpdateOutcome::UpToDate) => {
                self.update_status = "up to date".to_string();
                self.push_notice(Notice::info("Update", "Your application is up to date."));
            }
            Ok(UpdateOutcome::Installed { version }) => {
                self.update_status = format!("{version} installed, restart required");
                self.push_notice(Notice::info(
                    "Update",
                    format!("Update {version} installed successfully. Please restart the application."),
                ));
            }
            Err(UpdateError::Cancelled) => {
                self.update_status = "update cancelled".to_string();
            }
            Err(e) => {
                self.update_status = "update failed".to_string();
                self.push_notice(Notice::error(
                    "Error",
                    format!("An error occurred while checking for updates: {e}"),
                ));
            }
        }
    }

    pub fn cancel_update(&mut self) {
        if let Some(task) = &self.update {
            task.cancel();
        }
    }

    pub fn is_update_running(&self) -> bool {
        self.update.is_some()
    }

    pub fn update_status(&self) -> &str {
        &self.update_status
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::document::FileSystem;
    use crate::update::testing::{release_json, RecordingInstaller, ScriptedTransport};
    use crate::update::{Updater, RELEASES_URL};
    use std::time::{Duration, Instant};

    fn launcher_for(transport: fn() -> ScriptedTransport, dir: PathBuf) -> Box<dyn UpdateLauncher> {
        Box::new(move |on_finish: Box<dyn FnOnce() + Send>| {
            let updater = Updater::new(
                UpdateConfig::for_dir(dir.clone()),
                transport(),
                RecordingInstaller::default(),
            );
            UpdateTask::spawn(updater, on_finish)
        })
    }

    fn shell_with(transport: fn() -> ScriptedTransport, dir: &Path) -> ShellState {
        ShellState::new(
            Box::new(FileSystem),
            Box::new(MemoryClipboard::default()),
            launcher_for(transport, dir.to_path_buf()),
        )
    }

    fn up_to_date() -> ScriptedTransport {
        ScriptedTransport::new().ok(RELEASES_URL, r#"{"tag_name": "1.0.0"}"#)
    }

    fn server_error() -> ScriptedTransport {
        ScriptedTransport::new().status(RELEASES_URL, 500)
    }

    fn newer_release() -> ScriptedTransport {
        ScriptedTransport::new()
            .ok(RELEASES_URL, &release_json("1.2.0", &["https://example.invalid/u.zip"]))
            .ok("https://example.invalid/u.zip", "zip")
    }

    fn wait_for_update(shell: &mut ShellState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !shell.poll_update() {
            assert!(Instant::now() < deadline, "update check did not finish");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_save_blank_buffer_reports_without_dialog() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(up_to_date, dir.path());
        shell.doc.text = "  \n ".to_string();
        shell.dispatch(MenuAction::Save);
        assert!(shell.dialog.is_none());
        assert_eq!(shell.current_notice().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn test_save_dialog_then_open_in_new_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.txt");

        let mut shell = shell_with(up_to_date, dir.path());
        shell.doc.text = "hello world".to_string();
        shell.dispatch(MenuAction::Save);
        assert!(matches!(shell.dialog, Some(Dialog::Browser(ref b)) if b.mode == BrowserMode::Save));
        shell.dialog = None;
        shell.save_to(&path);
        assert_eq!(shell.current_notice().map(|n| n.title.as_str()), Some("Success"));

        let mut fresh = shell_with(up_to_date, dir.path());
        fresh.open_path(&path);
        assert_eq!(fresh.doc.text, "hello world");
        assert_eq!(fresh.take_pending_cursor(), Some(Selection::caret(0)));
        assert!(fresh.current_notice().is_none());
    }

    #[test]
    fn test_open_failure_keeps_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(up_to_date, dir.path());
        shell.doc.text = "draft".to_string();
        shell.open_path(&dir.path().join("missing.txt"));
        assert_eq!(shell.doc.text, "draft");
        assert_eq!(shell.current_notice().map(|n| n.kind), Some(NoticeKind::Error));
    }

    #[test]
    fn test_new_clears_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(up_to_date, dir.path());
        shell.doc.text = "old".to_string();
        shell.doc.modified = true;
        shell.dispatch(MenuAction::New);
        assert_eq!(shell.doc, Document::new());
    }

    #[test]
    fn test_cut_copy_paste_through_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(up_to_date, dir.path());
        shell.doc.text = "hello world".to_string();

        shell.selection = Selection::new(0, 6);
        shell.dispatch(MenuAction::Cut);
        assert_eq!(shell.doc.text, "world");
        assert_eq!(shell.take_pending_cursor(), Some(Selection::caret(0)));

        shell.selection = Selection::caret(5);
        shell.dispatch(MenuAction::Paste);
        assert_eq!(shell.doc.text, "worldhello ");
        assert!(shell.paste_enabled());
    }

    #[test]
    fn test_paste_entry_toggles_like_copy_results() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(up_to_date, dir.path());
        shell.doc.text = "abc".to_string();

        shell.selection = Selection::caret(1);
        shell.dispatch(MenuAction::Copy);
        assert!(!shell.paste_enabled());

        shell.selection = Selection::new(0, 2);
        shell.dispatch(MenuAction::Copy);
        assert!(shell.paste_enabled());
        assert_eq!(shell.doc.text, "abc");
    }

    #[test]
    fn test_paste_with_empty_clipboard_disables_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(up_to_date, dir.path());
        shell.doc.text = "abc".to_string();
        shell.dispatch(MenuAction::Paste);
        assert_eq!(shell.doc.text, "abc");
        assert!(!shell.paste_enabled());
    }

    #[test]
    fn test_change_theme_cancel_and_apply() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(up_to_date, dir.path());
        let before = shell.appearance.background();

        shell.dispatch(MenuAction::ChangeTheme);
        assert!(matches!(shell.dialog, Some(Dialog::Color(_))));
        shell.finish_color_choice(ColorChoice::Cancelled);
        assert!(shell.dialog.is_none());
        assert_eq!(shell.appearance.background(), before);

        let teal = egui::Color32::from_rgb(0, 128, 128);
        shell.dispatch(MenuAction::ChangeTheme);
        shell.finish_color_choice(ColorChoice::Picked(teal));
        assert_eq!(shell.appearance.background(), teal);
    }

    #[test]
    fn test_update_up_to_date_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(up_to_date, dir.path());
        shell.dispatch(MenuAction::Update);
        assert!(shell.is_update_running());
        assert_eq!(shell.update_status(), "checking for updates...");
        shell.dispatch(MenuAction::Update);
        assert_eq!(shell.update_status(), "update check already running");
        wait_for_update(&mut shell);

        assert!(!shell.is_update_running());
        assert_eq!(shell.update_status(), "up to date");
        let notice = shell.current_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Info);
        assert_eq!(notice.message, "Your application is up to date.");
    }

    #[test]
    fn test_update_server_error_leaves_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(server_error, dir.path());
        shell.doc.text = "unsaved work".to_string();
        shell.dispatch(MenuAction::Update);
        wait_for_update(&mut shell);

        assert_eq!(shell.doc.text, "unsaved work");
        let notice = shell.current_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.contains("500"));
    }

    #[test]
    fn test_update_installed_asks_for_restart() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(newer_release, dir.path());
        shell.dispatch(MenuAction::Update);
        wait_for_update(&mut shell);
        let notice = shell.current_notice().unwrap();
        assert!(notice.message.contains("1.2.0"));
        assert!(notice.message.contains("restart"));
    }

    #[test]
    fn test_notices_queue_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(up_to_date, dir.path());
        shell.push_notice(Notice::info("one", "1"));
        shell.push_notice(Notice::error("two", "2"));
        assert_eq!(shell.current_notice().unwrap().title, "one");
        shell.dismiss_notice();
        assert_eq!(shell.current_notice().unwrap().title, "two");
        shell.dismiss_notice();
        assert!(shell.current_notice().is_none());
    }

    #[test]
    fn test_exit_is_requested_not_performed() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_with(up_to_date, dir.path());
        assert!(!shell.exit_requested());
        shell.dispatch(MenuAction::Exit);
        assert!(shell.exit_requested());
    }
}
