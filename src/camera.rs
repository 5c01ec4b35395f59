use eframe::egui::{Pos2, Rect, Vec2};

#[derive(Clone, Copy, Debug)]
pub struct ViewConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Per-press zoom factor for the keyboard bindings.
    pub zoom_step: f32,
    /// Per-tick zoom factor for wheel events.
    pub wheel_factor: f32,
    /// Pannable margin beyond the content box, as a fraction of content size.
    pub overscroll_fraction: f32,
    /// Arrow-key pan distance in screen pixels.
    pub arrow_pan_step: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 6.0,
            zoom_step: 1.1,
            wheel_factor: 1.01,
            overscroll_fraction: 0.5,
            arrow_pan_step: 48.0,
        }
    }
}

/// Affine view into world space: `pos` is the world point under the rendering
/// surface's top-left corner, `zoom` the world-to-screen scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn screen_to_world(&self, surface: Rect, screen: Pos2) -> Vec2 {
        self.pos + (screen - surface.left_top()) / self.zoom
    }

    pub fn world_to_screen(&self, surface: Rect, world: Vec2) -> Pos2 {
        surface.left_top() + (world - self.pos) * self.zoom
    }

    /// Changes zoom while keeping the world point under `anchor` fixed on
    /// screen: capture the world point first, clamp the new zoom, then solve
    /// the camera position back from the anchor.
    pub fn apply_zoom(&mut self, surface: Rect, new_zoom: f32, anchor: Pos2, config: &ViewConfig) {
        let world_at_anchor = self.screen_to_world(surface, anchor);
        self.zoom = new_zoom.clamp(config.min_zoom, config.max_zoom);
        self.pos = world_at_anchor - (anchor - surface.left_top()) / self.zoom;
    }

    /// Pans by a screen-space delta; the world-space amount shrinks as zoom
    /// grows so drags feel the same at every zoom level.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pos -= delta / self.zoom;
    }

    /// Restricts the camera to the content box plus overscroll. When the
    /// viewport is larger than the content, a symmetric margin per axis keeps
    /// a centered camera valid. No-op while the content size is degenerate.
    pub fn clamp_to_bounds(&mut self, content: Vec2, viewport: Vec2, config: &ViewConfig) {
        if content.x <= 0.0 || content.y <= 0.0 {
            return;
        }

        let view_world = viewport / self.zoom;
        self.pos.x = clamp_axis(
            self.pos.x,
            content.x,
            view_world.x,
            config.overscroll_fraction,
        );
        self.pos.y = clamp_axis(
            self.pos.y,
            content.y,
            view_world.y,
            config.overscroll_fraction,
        );
    }

    /// Chooses the zoom that shows the whole content (never past 100%) and
    /// centers it in the viewport.
    pub fn fit_to_view(&mut self, content: Vec2, viewport: Vec2, config: &ViewConfig) {
        if content.x <= 0.0 || content.y <= 0.0 || viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }

        let zoom = (viewport.x / content.x)
            .min(viewport.y / content.y)
            .min(1.0);
        self.zoom = zoom.clamp(config.min_zoom, config.max_zoom);
        self.pos = (content - viewport / self.zoom) / 2.0;
    }

    pub fn zoom_percent(&self) -> i32 {
        (self.zoom * 100.0).round() as i32
    }
}

fn clamp_axis(value: f32, content: f32, view: f32, overscroll: f32) -> f32 {
    let over = content * overscroll;
    let mut lo = -over;
    let mut hi = content + over - view;

    if view > content {
        let margin = (view - content) / 2.0;
        lo -= margin;
        hi += margin;
    }

    value.clamp(lo, hi)
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};
    use pretty_assertions::assert_eq;

    use super::*;

    fn surface() -> Rect {
        Rect::from_min_size(pos2(40.0, 20.0), vec2(800.0, 600.0))
    }

    #[test]
    fn screen_world_transforms_are_inverse() {
        let camera = Camera {
            pos: vec2(120.0, -40.0),
            zoom: 2.0,
        };

        let screen = pos2(240.0, 180.0);
        let world = camera.screen_to_world(surface(), screen);
        let back = camera.world_to_screen(surface(), world);
        assert!((back - screen).length() < 1e-4);
    }

    #[test]
    fn zoom_keeps_anchor_point_fixed() {
        let config = ViewConfig::default();
        let mut camera = Camera {
            pos: vec2(300.0, 150.0),
            zoom: 1.3,
        };

        let anchor = pos2(200.0, 400.0);
        let before = camera.screen_to_world(surface(), anchor);
        camera.apply_zoom(surface(), camera.zoom * 1.4, anchor, &config);
        let after = camera.screen_to_world(surface(), anchor);

        assert!((after - before).length() < 1e-3);
    }

    #[test]
    fn zoom_keeps_anchor_fixed_even_when_clamped() {
        let config = ViewConfig::default();
        let mut camera = Camera::default();

        let anchor = pos2(500.0, 300.0);
        let before = camera.screen_to_world(surface(), anchor);
        camera.apply_zoom(surface(), 40.0, anchor, &config);
        let after = camera.screen_to_world(surface(), anchor);

        assert_eq!(camera.zoom, config.max_zoom);
        assert!((after - before).length() < 1e-3);
    }

    #[test]
    fn zoom_stays_within_bounds_over_any_sequence() {
        let config = ViewConfig::default();
        let mut camera = Camera::default();

        for step in 0..200 {
            let target = if step % 3 == 0 { 0.0001 } else { 50.0 };
            camera.apply_zoom(surface(), target, pos2(100.0, 100.0), &config);
            assert!(camera.zoom >= config.min_zoom && camera.zoom <= config.max_zoom);
        }
    }

    #[test]
    fn pan_is_inversely_scaled_by_zoom() {
        let mut camera = Camera {
            pos: vec2(100.0, 100.0),
            zoom: 2.0,
        };

        camera.pan_by(vec2(50.0, 30.0));
        assert_eq!(camera.pos, vec2(75.0, 85.0));
    }

    #[test]
    fn clamp_is_idempotent() {
        let config = ViewConfig::default();
        let content = vec2(900.0, 400.0);
        let viewport = vec2(800.0, 600.0);
        let mut camera = Camera {
            pos: vec2(5000.0, -5000.0),
            zoom: 1.0,
        };

        camera.clamp_to_bounds(content, viewport, &config);
        let once = camera.pos;
        camera.clamp_to_bounds(content, viewport, &config);
        assert_eq!(camera.pos, once);
    }

    #[test]
    fn clamp_allows_overscroll_fraction() {
        let config = ViewConfig::default();
        let content = vec2(1000.0, 1000.0);
        let viewport = vec2(500.0, 500.0);
        let mut camera = Camera {
            pos: vec2(-10_000.0, 10_000.0),
            zoom: 1.0,
        };

        camera.clamp_to_bounds(content, viewport, &config);
        assert_eq!(camera.pos.x, -500.0);
        assert_eq!(camera.pos.y, 1000.0 + 500.0 - 500.0);
    }

    #[test]
    fn clamp_ignores_degenerate_content() {
        let config = ViewConfig::default();
        let mut camera = Camera {
            pos: vec2(123.0, 456.0),
            zoom: 1.0,
        };

        camera.clamp_to_bounds(Vec2::ZERO, vec2(800.0, 600.0), &config);
        assert_eq!(camera.pos, vec2(123.0, 456.0));
    }

    #[test]
    fn fit_contains_content_and_never_zooms_past_full() {
        let config = ViewConfig::default();
        let content = vec2(1600.0, 900.0);
        let viewport = vec2(800.0, 600.0);
        let mut camera = Camera::default();

        camera.fit_to_view(content, viewport, &config);
        assert!(camera.zoom <= 1.0);

        let rect = surface();
        let top_left = camera.world_to_screen(rect, Vec2::ZERO);
        let bottom_right = camera.world_to_screen(rect, content);
        assert!(top_left.x >= rect.left() - 0.5 && top_left.y >= rect.top() - 0.5);
        assert!(bottom_right.x <= rect.right() + 0.5 && bottom_right.y <= rect.bottom() + 0.5);
    }

    #[test]
    fn fit_does_not_enlarge_small_content() {
        let config = ViewConfig::default();
        let mut camera = Camera::default();

        camera.fit_to_view(vec2(200.0, 100.0), vec2(800.0, 600.0), &config);
        assert_eq!(camera.zoom, 1.0);
        // Content centered: equal margins on both sides.
        assert_eq!(camera.pos, vec2((200.0 - 800.0) / 2.0, (100.0 - 600.0) / 2.0));
    }

    #[test]
    fn fit_ignores_degenerate_content() {
        let config = ViewConfig::default();
        let mut camera = Camera {
            pos: vec2(9.0, 9.0),
            zoom: 3.0,
        };

        camera.fit_to_view(vec2(0.0, 100.0), vec2(800.0, 600.0), &config);
        assert_eq!(camera.pos, vec2(9.0, 9.0));
        assert_eq!(camera.zoom, 3.0);
    }
}
