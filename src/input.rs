use eframe::egui::{Pos2, Rect, Vec2, vec2};

use crate::camera::{Camera, ViewConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    ZoomIn,
    ZoomOut,
    Fit,
    ResetOrigin,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
}

/// Abstract input stream for one canvas. The egui binding translates raw
/// events into these; tests drive the state machine with them directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown {
        pointer_id: u64,
        button: PointerButton,
        pos: Pos2,
    },
    PointerMove {
        pointer_id: u64,
        pos: Pos2,
    },
    PointerUp {
        pointer_id: u64,
    },
    /// The host revoked pointer capture without delivering an up event.
    PointerLost {
        pointer_id: u64,
    },
    Wheel {
        delta_y: f32,
        pos: Pos2,
    },
    Key(KeyCommand),
    DoubleClick,
    /// A click inside the minimap, already mapped to world coordinates.
    MinimapJump {
        world: Vec2,
    },
    SpaceChanged {
        held: bool,
    },
}

#[derive(Clone, Copy, Debug)]
struct DragAnchor {
    screen: Pos2,
    camera_at_start: Vec2,
}

#[derive(Clone, Copy, Debug, Default)]
struct InteractionState {
    active_pointer: Option<u64>,
    drag_anchor: Option<DragAnchor>,
    space_held: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    pub camera_changed: bool,
    /// Presentation hint: the camera change is a discrete jump the renderer
    /// may want to animate toward.
    pub smooth: bool,
}

impl EventOutcome {
    fn changed() -> Self {
        Self {
            camera_changed: true,
            smooth: false,
        }
    }

    fn changed_smooth() -> Self {
        Self {
            camera_changed: true,
            smooth: true,
        }
    }
}

/// Owns the camera and transient interaction state for one open canvas.
pub struct ViewportSession {
    pub camera: Camera,
    pub config: ViewConfig,
    state: InteractionState,
}

impl ViewportSession {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            camera: Camera::default(),
            config,
            state: InteractionState::default(),
        }
    }

    pub fn is_panning(&self) -> bool {
        self.state.active_pointer.is_some()
    }

    pub fn space_held(&self) -> bool {
        self.state.space_held
    }

    /// Advances the interaction state machine by one event. `surface` is the
    /// current on-screen rectangle of the canvas and `content` the laid-out
    /// content size; every camera mutation is clamped before returning.
    pub fn handle_event(&mut self, event: InputEvent, surface: Rect, content: Vec2) -> EventOutcome {
        let viewport = surface.size();
        match event {
            InputEvent::SpaceChanged { held } => {
                self.state.space_held = held;
                EventOutcome::default()
            }
            InputEvent::PointerDown {
                pointer_id,
                button,
                pos,
            } => {
                let starts_pan = button == PointerButton::Secondary
                    || (button == PointerButton::Primary && self.state.space_held);
                if starts_pan && self.state.active_pointer.is_none() {
                    self.state.active_pointer = Some(pointer_id);
                    self.state.drag_anchor = Some(DragAnchor {
                        screen: pos,
                        camera_at_start: self.camera.pos,
                    });
                }
                EventOutcome::default()
            }
            InputEvent::PointerMove { pointer_id, pos } => {
                if self.state.active_pointer != Some(pointer_id) {
                    return EventOutcome::default();
                }
                let Some(anchor) = self.state.drag_anchor else {
                    return EventOutcome::default();
                };

                self.camera.pos =
                    anchor.camera_at_start - (pos - anchor.screen) / self.camera.zoom;
                self.camera.clamp_to_bounds(content, viewport, &self.config);
                EventOutcome::changed()
            }
            InputEvent::PointerUp { pointer_id } | InputEvent::PointerLost { pointer_id } => {
                if self.state.active_pointer == Some(pointer_id) {
                    self.state.active_pointer = None;
                    self.state.drag_anchor = None;
                }
                EventOutcome::default()
            }
            InputEvent::Wheel { delta_y, pos } => {
                if delta_y == 0.0 {
                    return EventOutcome::default();
                }

                // One event is one tick: +1% in, -1% out.
                let direction = if delta_y > 0.0 { -1.0 } else { 1.0 };
                let factor = 1.0 + (self.config.wheel_factor - 1.0) * direction;
                self.camera
                    .apply_zoom(surface, self.camera.zoom * factor, pos, &self.config);
                self.camera.clamp_to_bounds(content, viewport, &self.config);
                EventOutcome::changed()
            }
            InputEvent::Key(KeyCommand::ZoomIn) => self.zoom_to_center(surface, content, true),
            InputEvent::Key(KeyCommand::ZoomOut) => self.zoom_to_center(surface, content, false),
            InputEvent::Key(KeyCommand::Fit) | InputEvent::DoubleClick => {
                self.camera.fit_to_view(content, viewport, &self.config);
                self.camera.clamp_to_bounds(content, viewport, &self.config);
                EventOutcome::changed()
            }
            InputEvent::Key(KeyCommand::ResetOrigin) => {
                self.camera.pos = Vec2::ZERO;
                self.camera.clamp_to_bounds(content, viewport, &self.config);
                EventOutcome::changed()
            }
            InputEvent::Key(command @ (KeyCommand::PanLeft
            | KeyCommand::PanRight
            | KeyCommand::PanUp
            | KeyCommand::PanDown)) => {
                let step = self.config.arrow_pan_step;
                let delta = match command {
                    KeyCommand::PanLeft => vec2(step, 0.0),
                    KeyCommand::PanRight => vec2(-step, 0.0),
                    KeyCommand::PanUp => vec2(0.0, step),
                    _ => vec2(0.0, -step),
                };
                self.camera.pan_by(delta);
                self.camera.clamp_to_bounds(content, viewport, &self.config);
                EventOutcome::changed()
            }
            InputEvent::MinimapJump { world } => {
                self.camera.pos = world - (viewport / self.camera.zoom) / 2.0;
                self.camera.clamp_to_bounds(content, viewport, &self.config);
                EventOutcome::changed()
            }
        }
    }

    fn zoom_to_center(&mut self, surface: Rect, content: Vec2, zoom_in: bool) -> EventOutcome {
        let step = if zoom_in {
            self.config.zoom_step
        } else {
            1.0 / self.config.zoom_step
        };
        self.camera
            .apply_zoom(surface, self.camera.zoom * step, surface.center(), &self.config);
        self.camera
            .clamp_to_bounds(content, surface.size(), &self.config);
        EventOutcome::changed_smooth()
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;
    use pretty_assertions::assert_eq;

    use super::*;

    fn surface() -> Rect {
        Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0))
    }

    // Large enough that the pan scenarios below never hit the clamp.
    fn content() -> Vec2 {
        vec2(6000.0, 6000.0)
    }

    fn session() -> ViewportSession {
        let mut session = ViewportSession::new(ViewConfig::default());
        session.camera.pos = vec2(500.0, 500.0);
        session
    }

    #[test]
    fn secondary_drag_pans_inversely_scaled_by_zoom() {
        let mut session = session();
        session.camera.zoom = 2.0;
        let start = session.camera.pos;

        session.handle_event(
            InputEvent::PointerDown {
                pointer_id: 7,
                button: PointerButton::Secondary,
                pos: pos2(100.0, 100.0),
            },
            surface(),
            content(),
        );
        assert!(session.is_panning());

        let outcome = session.handle_event(
            InputEvent::PointerMove {
                pointer_id: 7,
                pos: pos2(150.0, 130.0),
            },
            surface(),
            content(),
        );

        assert!(outcome.camera_changed);
        assert_eq!(session.camera.pos, start + vec2(-25.0, -15.0));

        session.handle_event(InputEvent::PointerUp { pointer_id: 7 }, surface(), content());
        assert!(!session.is_panning());
    }

    #[test]
    fn primary_drag_pans_only_while_space_is_held() {
        let mut session = session();

        session.handle_event(
            InputEvent::PointerDown {
                pointer_id: 1,
                button: PointerButton::Primary,
                pos: pos2(10.0, 10.0),
            },
            surface(),
            content(),
        );
        assert!(!session.is_panning());

        session.handle_event(InputEvent::SpaceChanged { held: true }, surface(), content());
        session.handle_event(
            InputEvent::PointerDown {
                pointer_id: 1,
                button: PointerButton::Primary,
                pos: pos2(10.0, 10.0),
            },
            surface(),
            content(),
        );
        assert!(session.is_panning());
    }

    #[test]
    fn moves_from_other_pointers_are_ignored() {
        let mut session = session();
        session.handle_event(
            InputEvent::PointerDown {
                pointer_id: 1,
                button: PointerButton::Secondary,
                pos: pos2(10.0, 10.0),
            },
            surface(),
            content(),
        );
        let before = session.camera.pos;

        let outcome = session.handle_event(
            InputEvent::PointerMove {
                pointer_id: 2,
                pos: pos2(300.0, 300.0),
            },
            surface(),
            content(),
        );

        assert_eq!(outcome, EventOutcome::default());
        assert_eq!(session.camera.pos, before);
    }

    #[test]
    fn lost_capture_abandons_the_gesture_cleanly() {
        let mut session = session();
        session.handle_event(
            InputEvent::PointerDown {
                pointer_id: 4,
                button: PointerButton::Secondary,
                pos: pos2(10.0, 10.0),
            },
            surface(),
            content(),
        );
        session.handle_event(
            InputEvent::PointerMove {
                pointer_id: 4,
                pos: pos2(20.0, 10.0),
            },
            surface(),
            content(),
        );
        let pos_after_move = session.camera.pos;

        session.handle_event(InputEvent::PointerLost { pointer_id: 4 }, surface(), content());
        assert!(!session.is_panning());
        assert_eq!(session.camera.pos, pos_after_move);

        // Late moves for the lost pointer must not resurrect the pan.
        session.handle_event(
            InputEvent::PointerMove {
                pointer_id: 4,
                pos: pos2(500.0, 500.0),
            },
            surface(),
            content(),
        );
        assert_eq!(session.camera.pos, pos_after_move);
    }

    #[test]
    fn wheel_down_at_center_zooms_out_one_percent() {
        let mut session = session();
        let center = surface().center();
        let world_before = session.camera.screen_to_world(surface(), center);

        let outcome = session.handle_event(
            InputEvent::Wheel {
                delta_y: 120.0,
                pos: center,
            },
            surface(),
            content(),
        );

        assert!(outcome.camera_changed);
        assert!((session.camera.zoom - 0.99).abs() < 1e-6);
        let world_after = session.camera.screen_to_world(surface(), center);
        assert!((world_after - world_before).length() < 1e-3);
    }

    #[test]
    fn wheel_zoom_respects_bounds() {
        let mut session = session();
        for _ in 0..2000 {
            session.handle_event(
                InputEvent::Wheel {
                    delta_y: -1.0,
                    pos: pos2(400.0, 300.0),
                },
                surface(),
                content(),
            );
        }
        assert_eq!(session.camera.zoom, session.config.max_zoom);
    }

    #[test]
    fn keyboard_zoom_is_smooth_and_anchored_at_center() {
        let mut session = session();
        let outcome = session.handle_event(InputEvent::Key(KeyCommand::ZoomIn), surface(), content());
        assert!(outcome.smooth);
        assert!((session.camera.zoom - 1.1).abs() < 1e-6);

        let outcome = session.handle_event(InputEvent::Key(KeyCommand::ZoomOut), surface(), content());
        assert!(outcome.smooth);
        assert!((session.camera.zoom - 1.0).abs() < 1e-6);
    }

    #[test]
    fn home_resets_origin_but_keeps_zoom() {
        let mut session = session();
        session.camera.zoom = 1.7;
        session.handle_event(InputEvent::Key(KeyCommand::ResetOrigin), surface(), content());
        assert_eq!(session.camera.pos, Vec2::ZERO);
        assert_eq!(session.camera.zoom, 1.7);
    }

    #[test]
    fn arrow_keys_pan_by_fixed_screen_step() {
        let mut session = session();
        let start = session.camera.pos;
        let step = session.config.arrow_pan_step;

        session.handle_event(InputEvent::Key(KeyCommand::PanRight), surface(), content());
        assert_eq!(session.camera.pos, start + vec2(step, 0.0));

        session.handle_event(InputEvent::Key(KeyCommand::PanDown), surface(), content());
        assert_eq!(session.camera.pos, start + vec2(step, step));
    }

    #[test]
    fn double_click_fits_content() {
        let mut session = session();
        session.camera.zoom = 3.0;
        let content = vec2(1600.0, 1200.0);

        session.handle_event(InputEvent::DoubleClick, surface(), content);
        assert!(session.camera.zoom <= 1.0);
        assert_eq!(
            session.camera.pos,
            (content - surface().size() / session.camera.zoom) / 2.0
        );
    }

    #[test]
    fn minimap_jump_centers_the_clicked_point() {
        let mut session = session();
        session.handle_event(
            InputEvent::MinimapJump {
                world: vec2(3000.0, 2000.0),
            },
            surface(),
            content(),
        );

        let centered = vec2(3000.0, 2000.0) - surface().size() / 2.0;
        assert_eq!(session.camera.pos, centered);
    }
}
