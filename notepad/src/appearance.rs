//! Background color of the text surface and the chooser that sets it.

use egui::Color32;
use padcore::theme::{readable_text_on, to_hex, PadColors};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Appearance {
    background: Color32,
}

impl Default for Appearance {
    fn default() -> Self {
        Self { background: PadColors::WHITE }
    }
}

impl Appearance {
    pub fn background(&self) -> Color32 {
        self.background
    }

    /// Text color that stays readable on the current background.
    pub fn text_color(&self) -> Color32 {
        readable_text_on(self.background)
    }

    pub fn background_hex(&self) -> String {
        to_hex(self.background)
    }

    pub fn set_background(&mut self, color: Color32) {
        self.background = color;
        log::info!("background set to {}", to_hex(color));
    }

    /// Apply a finished pick. Returns the applied color, `None` if the
    /// chooser was cancelled.
    pub fn apply_choice(&mut self, choice: ColorChoice) -> Option<Color32> {
        match choice {
            ColorChoice::Picked(color) => {
                self.set_background(color);
                Some(color)
            }
            ColorChoice::Cancelled => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorChoice {
    Picked(Color32),
    Cancelled,
}

/// State of the "change theme" window while it is open.
#[derive(Debug, Clone)]
pub struct ColorChooser {
    draft: Color32,
}

impl ColorChooser {
    pub fn starting_at(color: Color32) -> Self {
        Self { draft: color }
    }

    /// Draw the chooser. Returns a choice once the user applies or cancels.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<ColorChoice> {
        let mut choice = None;
        let resp = egui::Window::new("change theme")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::color_picker::color_picker_color32(
                    ui,
                    &mut self.draft,
                    egui::color_picker::Alpha::Opaque,
                );
                ui.label(to_hex(self.draft));
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("cancel").clicked() {
                        choice = Some(ColorChoice::Cancelled);
                    }
                    if ui.button("apply").clicked() {
                        choice = Some(ColorChoice::Picked(self.draft));
                    }
                });
            });
        if let Some(r) = &resp {
            padcore::dither::draw_window_shadow(ctx, r.response.rect);
        }
        choice
    }
}
