//! notepad+++: menu bar, text surface, status bar and dialogs
//!
//! Rendering only. Every menu entry and shortcut becomes a
//! [`MenuAction`] handed to [`ShellState::dispatch`].

use crate::appearance::ColorChoice;
use crate::clipboard::{self, Selection};
use crate::document::FileSystem;
use crate::shell::{Dialog, FeedLauncher, MenuAction, NoticeKind, ShellState};
use crate::update::UpdateConfig;
use egui::{Context, Key};
use padcore::repaint::RepaintController;
use padcore::storage::{BrowserMode, FileBrowser};
use padcore::theme::{consume_zoom_keys, menu_bar, PadColors, PadTheme};
use padcore::widgets::{status_bar, FileListItem};
use std::path::PathBuf;

/// How a file browser frame ended.
enum BrowserOutcome {
    Pending,
    Cancelled,
    Chosen(PathBuf),
}

pub struct NotepadApp {
    shell: ShellState,
    editor_id: egui::Id,
    repaint: RepaintController,
}

impl NotepadApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let launcher = FeedLauncher { config: UpdateConfig::default() };
        let mut shell = ShellState::new(
            Box::new(FileSystem),
            clipboard::system_or_memory(),
            Box::new(launcher),
        )
        .with_waker(cc.egui_ctx.clone());

        // checked once at startup, like the File > Update entry
        shell.dispatch(MenuAction::Update);

        Self {
            shell,
            editor_id: egui::Id::new("document_text"),
            repaint: RepaintController::new(),
        }
    }

    /// Cmd+N/O/S are taken before the text surface sees them. Cut, copy and
    /// paste keys are left to the text surface, which handles them natively.
    fn handle_keyboard(&mut self, ctx: &Context) {
        consume_zoom_keys(ctx);

        let mut actions = Vec::new();
        ctx.input_mut(|i| {
            let cmd = i.modifiers.command;
            i.events.retain(|event| {
                let action = match event {
                    egui::Event::Key { key: Key::N, pressed: true, .. } if cmd => Some(MenuAction::New),
                    egui::Event::Key { key: Key::O, pressed: true, .. } if cmd => Some(MenuAction::Open),
                    egui::Event::Key { key: Key::S, pressed: true, .. } if cmd => Some(MenuAction::Save),
                    _ => None,
                };
                match action {
                    Some(a) => {
                        actions.push(a);
                        false
                    }
                    None => true,
                }
            });
        });

        for action in actions {
            self.shell.dispatch(action);
        }
    }

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) -> Option<MenuAction> {
        let mut action = None;
        let paste_enabled = self.shell.paste_enabled();
        menu_bar(ui, |ui| {
            ui.menu_button("file", |ui| {
                for (label, a) in [
                    ("new        \u{2318}n", MenuAction::New),
                    ("open...    \u{2318}o", MenuAction::Open),
                    ("save...    \u{2318}s", MenuAction::Save),
                    ("update", MenuAction::Update),
                ] {
                    if ui.button(label).clicked() {
                        action = Some(a);
                        ui.close_menu();
                    }
                }
                ui.separator();
                if ui.button("exit").clicked() {
                    action = Some(MenuAction::Exit);
                    ui.close_menu();
                }
            });

            ui.menu_button("edit", |ui| {
                if ui.button("cut").clicked() {
                    action = Some(MenuAction::Cut);
                    ui.close_menu();
                }
                if ui.button("copy").clicked() {
                    action = Some(MenuAction::Copy);
                    ui.close_menu();
                }
                if ui.add_enabled(paste_enabled, egui::Button::new("paste")).clicked() {
                    action = Some(MenuAction::Paste);
                    ui.close_menu();
                }
            });

            ui.menu_button("settings", |ui| {
                if ui.button("change theme").clicked() {
                    action = Some(MenuAction::ChangeTheme);
                    ui.close_menu();
                }
            });
        });
        action
    }

    fn render_editor(&mut self, ui: &mut egui::Ui) {
        if let Some(sel) = self.shell.take_pending_cursor() {
            let mut state = egui::TextEdit::load_state(ui.ctx(), self.editor_id).unwrap_or_default();
            state.cursor.set_char_range(Some(egui::text::CCursorRange::two(
                egui::text::CCursor::new(sel.anchor),
                egui::text::CCursor::new(sel.caret),
            )));
            state.store(ui.ctx(), self.editor_id);
            ui.ctx().memory_mut(|m| m.request_focus(self.editor_id));
        }

        let available = ui.available_size();
        let text_color = self.shell.appearance.text_color();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let output = egui::TextEdit::multiline(&mut self.shell.doc.text)
                    .id(self.editor_id)
                    .font(egui::FontId::monospace(14.0))
                    .text_color(text_color)
                    .desired_width(available.x)
                    .desired_rows((available.y / 18.0).max(4.0) as usize)
                    .frame(false)
                    .show(ui);

                if output.response.changed() {
                    self.shell.doc.modified = true;
                }
                // menu clicks take focus away; keep the last focused selection
                if output.response.has_focus() {
                    if let Some(cr) = output.cursor_range {
                        self.shell.selection =
                            Selection::new(cr.secondary.ccursor.index, cr.primary.ccursor.index);
                    }
                }
            });
    }

    fn render_dialog(&mut self, ctx: &Context) {
        let Some(dialog) = self.shell.dialog.take() else {
            return;
        };
        match dialog {
            Dialog::Browser(mut browser) => match render_file_browser(ctx, &mut browser) {
                BrowserOutcome::Pending => self.shell.dialog = Some(Dialog::Browser(browser)),
                BrowserOutcome::Cancelled => {}
                BrowserOutcome::Chosen(path) => match browser.mode {
                    BrowserMode::Open => self.shell.open_path(&path),
                    BrowserMode::Save => self.shell.save_to(&path),
                },
            },
            Dialog::Color(mut chooser) => match chooser.show(ctx) {
                Some(choice) => {
                    self.shell.finish_color_choice(choice);
                    if let ColorChoice::Picked(_) = choice {
                        self.repaint.mark_needs_repaint();
                    }
                }
                None => self.shell.dialog = Some(Dialog::Color(chooser)),
            },
        }
    }

    fn render_notice(&mut self, ctx: &Context) {
        let Some(notice) = self.shell.current_notice().cloned() else {
            return;
        };
        let mut dismissed = false;
        let resp = egui::Window::new(notice.title.as_str())
            .id(egui::Id::new("notice"))
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                let marker = match notice.kind {
                    NoticeKind::Info => "(i)",
                    NoticeKind::Error => "(!)",
                };
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(marker).strong());
                    ui.label(notice.message.as_str());
                });
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("ok").clicked() {
                        dismissed = true;
                    }
                });
            });
        if let Some(r) = &resp {
            padcore::dither::draw_window_shadow(ctx, r.response.rect);
        }
        if dismissed {
            self.shell.dismiss_notice();
            self.repaint.mark_needs_repaint();
        }
    }

    fn status_segments(&self) -> Vec<String> {
        let doc = &self.shell.doc;
        let mut segments = vec![
            format!("{} lines", doc.line_count()),
            format!("{} chars", doc.char_count()),
            format!("bg {}", self.shell.appearance.background_hex()),
        ];
        if !self.shell.update_status().is_empty() {
            segments.push(self.shell.update_status().to_string());
        }
        segments
    }
}

fn render_file_browser(ctx: &Context, browser: &mut FileBrowser) -> BrowserOutcome {
    let mut outcome = BrowserOutcome::Pending;
    let title = match browser.mode {
        BrowserMode::Open => "open",
        BrowserMode::Save => "save as",
    };
    let resp = egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .default_width(380.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("location:");
                ui.label(browser.current_dir.to_string_lossy().to_string());
            });
            ui.separator();
            egui::ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                let entries = browser.entries.clone();
                for (idx, entry) in entries.iter().enumerate() {
                    let selected = browser.selected_index == Some(idx);
                    let muted = browser.mode == BrowserMode::Save && !entry.is_directory;
                    let response =
                        ui.add(FileListItem::new(entry).selected(selected).muted(muted));
                    if response.clicked() {
                        browser.select(idx);
                    }
                    if response.double_clicked() {
                        if entry.is_directory {
                            browser.navigate_to(entry.path.clone());
                        } else if browser.mode == BrowserMode::Open {
                            outcome = BrowserOutcome::Chosen(entry.path.clone());
                        }
                    }
                }
            });
            if browser.mode == BrowserMode::Save {
                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("filename:");
                    ui.text_edit_singleline(&mut browser.filename);
                });
            }
            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("cancel").clicked() {
                    outcome = BrowserOutcome::Cancelled;
                }
                let confirm = match browser.mode {
                    BrowserMode::Open => "open",
                    BrowserMode::Save => "save",
                };
                if ui.button(confirm).clicked() {
                    let chosen = match browser.mode {
                        BrowserMode::Open => browser
                            .selected_entry()
                            .filter(|e| !e.is_directory)
                            .map(|e| e.path.clone()),
                        BrowserMode::Save => browser.resolve_save_path(),
                    };
                    if let Some(path) = chosen {
                        outcome = BrowserOutcome::Chosen(path);
                    }
                }
            });
        });
    if let Some(r) = &resp {
        padcore::dither::draw_window_shadow(ctx, r.response.rect);
    }
    outcome
}

impl eframe::App for NotepadApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.repaint.begin_frame();
        self.handle_keyboard(ctx);

        if self.shell.poll_update() {
            self.repaint.mark_needs_repaint();
        }
        self.repaint.set_continuous(self.shell.is_update_running());

        let mut menu_action = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            menu_action = self.render_menu_bar(ui);
        });
        if let Some(action) = menu_action {
            self.shell.dispatch(action);
        }

        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            PadTheme::title_bar_frame().show(ui, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(self.shell.doc.display_title());
                });
            });
        });
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let segments = self.status_segments();
            let refs: Vec<&str> = segments.iter().map(String::as_str).collect();
            status_bar(ui, &refs);
        });

        let background = self.shell.appearance.background();
        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(background)
                    .stroke(egui::Stroke::new(1.0, PadColors::BLACK))
                    .inner_margin(egui::Margin::same(4.0)),
            )
            .show(ctx, |ui| self.render_editor(ui));

        self.render_dialog(ctx);
        self.render_notice(ctx);

        if self.shell.exit_requested() {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        self.repaint.end_frame(ctx);
    }
}
