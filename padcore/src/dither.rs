//! Dither pattern drawing for overlays.
//!
//! Selections and window shadows are drawn as a checkerboard so the
//! content underneath stays visible.

use egui::{Color32, Painter, Pos2, Rect};

/// Draw a checkerboard over `rect`.
/// `density` controls spacing: 1 = every other pixel, 2 and up = sparser.
pub fn draw_dither_rect(painter: &Painter, rect: Rect, color: Color32, density: u32) {
    let density = density.max(1) as i32;

    // Iteration bounds are pulled inward so the loop never leaves `rect`.
    let x0 = rect.min.x.ceil() as i32;
    let y0 = rect.min.y.ceil() as i32;
    let x1 = rect.max.x.floor() as i32;
    let y1 = rect.max.y.floor() as i32;
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let pixel = egui::Vec2::splat(1.0);
    let x_step = density * 2;

    for y in (y0..y1).step_by(density as usize) {
        let row = (y - y0) / density;
        let mut x = x0 + if row % 2 == 0 { 0 } else { density };
        while x < x1 {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x as f32, y as f32), pixel),
                0.0,
                color,
            );
            x += x_step;
        }
    }
}

/// Dense checkerboard used for selected list items.
pub fn draw_dither_selection(painter: &Painter, rect: Rect) {
    draw_dither_rect(painter, rect, Color32::BLACK, 1);
}

/// Lighter checkerboard for hover states.
pub fn draw_dither_hover(painter: &Painter, rect: Rect) {
    draw_dither_rect(painter, rect, Color32::BLACK, 2);
}

/// Dithered drop shadow offset 4px down and right of a window.
/// Call after `egui::Window::show()` with the window's rect.
pub fn draw_window_shadow(ctx: &egui::Context, window_rect: Rect) {
    let shadow_rect = window_rect.translate(egui::vec2(4.0, 4.0));
    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::PanelResizeLine,
        egui::Id::new("dither_shadows"),
    ));
    draw_dither_rect(&painter, shadow_rect, Color32::BLACK, 2);
}
