//! Custom widgets: white fill, black outline, dithered highlights

use crate::dither;
use crate::storage::FileEntry;
use crate::theme::PadColors;
use egui::{Response, Ui, Widget};

/// Status bar: white bg, 1px black border. Segments are separated by `|`.
pub fn status_bar(ui: &mut Ui, segments: &[&str]) {
    egui::Frame::none()
        .fill(PadColors::WHITE)
        .stroke(egui::Stroke::new(1.0, PadColors::BLACK))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(segments.join("  |  "));
        });
}

/// Row label: directories end in `/`, the parent entry reads `../`.
pub fn entry_label(entry: &FileEntry) -> String {
    if entry.is_directory {
        format!("{}/", entry.name)
    } else {
        entry.name.clone()
    }
}

/// One row in the open/save file list.
///
/// A muted row is screened by a white checkerboard and ignores hover.
pub struct FileListItem<'a> {
    entry: &'a FileEntry,
    selected: bool,
    muted: bool,
}

impl<'a> FileListItem<'a> {
    pub fn new(entry: &'a FileEntry) -> Self {
        Self { entry, selected: false, muted: false }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }
}

impl Widget for FileListItem<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let font = egui::FontId::monospace(13.0);
        let row_height = ui.fonts(|f| f.row_height(&font)) + 6.0;
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), row_height),
            egui::Sense::click(),
        );
        if !ui.is_rect_visible(rect) {
            return response;
        }

        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, PadColors::WHITE);
        if self.selected {
            dither::draw_dither_selection(painter, rect);
        } else if response.hovered() && !self.muted {
            dither::draw_dither_hover(painter, rect);
        }
        let text_color = if self.selected { PadColors::WHITE } else { PadColors::BLACK };

        let text_rect = painter.text(
            egui::pos2(rect.min.x + 6.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            entry_label(self.entry),
            font,
            text_color,
        );
        if self.muted && !self.selected {
            dither::draw_dither_rect(painter, text_rect.expand(1.0), PadColors::WHITE, 1);
        }

        response
    }
}
