//! padcore: shared library for the notepad+++ editor

pub mod dither;
pub mod repaint;
pub mod safety;
pub mod storage;
pub mod theme;
pub mod widgets;

pub use repaint::RepaintController;
pub use theme::PadTheme;
