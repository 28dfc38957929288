//! notepad+++: a minimal text editor
//!
//! One document, cut/copy/paste, a background color picker and a
//! self-update check against the GitHub release feed.

mod app;
mod appearance;
mod clipboard;
mod document;
mod error;
mod shell;
mod update;

use app::NotepadApp;
use eframe::NativeOptions;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("notepad+++ {} starting", update::CURRENT_VERSION);

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_title("notepad+++"),
        ..Default::default()
    };

    eframe::run_native(
        "notepad+++",
        options,
        Box::new(|cc| {
            padcore::PadTheme::default().apply(&cc.egui_ctx);
            Box::new(NotepadApp::new(cc))
        }),
    )
}
