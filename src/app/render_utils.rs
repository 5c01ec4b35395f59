use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::camera::Camera;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, camera: &Camera) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let mut step = 80.0 * camera.zoom;
    while step < 24.0 {
        step *= 2.0;
    }

    let origin = camera.world_to_screen(rect, eframe::egui::Vec2::ZERO);
    let grid_stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment(
            [Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())],
            grid_stroke,
        );
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            grid_stroke,
        );
        y += step;
    }
}

pub(super) fn box_visible(rect: Rect, node_rect: Rect) -> bool {
    rect.intersects(node_rect)
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

pub(super) fn operator_color(name: &str) -> Color32 {
    let upper = name.to_ascii_uppercase();

    if upper.contains("SCAN") {
        Color32::from_rgb(52, 129, 115)
    } else if upper.contains("JOIN") {
        Color32::from_rgb(171, 103, 54)
    } else if upper.contains("AGGREGAT") || upper.contains("GROUP") {
        Color32::from_rgb(122, 86, 160)
    } else if upper.contains("EXCHANGE") || upper.contains("SHUFFLE") || upper.contains("GATHER") {
        Color32::from_rgb(62, 103, 160)
    } else if upper.contains("SORT") || upper.contains("ORDER") || upper.contains("TOP") {
        Color32::from_rgb(88, 134, 62)
    } else if upper.contains("FILTER") || upper.contains("PROJECT") {
        Color32::from_rgb(130, 116, 58)
    } else {
        Color32::from_rgb(83, 92, 104)
    }
}
