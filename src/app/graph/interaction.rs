use eframe::egui::{self, Key, Rect, Ui, Vec2};

use crate::input::{InputEvent, KeyCommand, PointerButton};

use super::super::ViewModel;

impl ViewModel {
    /// Translates raw egui input for the canvas into the abstract event
    /// stream the viewport session consumes. Returns whether the camera
    /// changed this frame.
    pub(in crate::app) fn handle_canvas_input(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        content: Vec2,
    ) -> bool {
        let mut events = Vec::new();

        let space_held = ui.input(|input| input.key_down(Key::Space));
        events.push(InputEvent::SpaceChanged { held: space_held });

        let pointer_pos = ui.input(|input| input.pointer.interact_pos());
        if let Some(pos) = pointer_pos {
            if response.drag_started_by(egui::PointerButton::Secondary)
                || response.drag_started_by(egui::PointerButton::Middle)
            {
                events.push(InputEvent::PointerDown {
                    pointer_id: 0,
                    button: PointerButton::Secondary,
                    pos,
                });
            }
            if response.drag_started_by(egui::PointerButton::Primary) {
                events.push(InputEvent::PointerDown {
                    pointer_id: 0,
                    button: PointerButton::Primary,
                    pos,
                });
            }
            if response.dragged() {
                events.push(InputEvent::PointerMove { pointer_id: 0, pos });
            }
        }

        if response.drag_stopped() {
            events.push(InputEvent::PointerUp { pointer_id: 0 });
        } else if self.session.is_panning() && !ui.input(|input| input.pointer.any_down()) {
            // The press ended outside the canvas and egui dropped the drag
            // without a stop notification.
            events.push(InputEvent::PointerLost { pointer_id: 0 });
        }

        if response.hovered() {
            let scroll = ui.input(|input| input.raw_scroll_delta.y);
            if scroll.abs() > f32::EPSILON {
                let pos = ui
                    .input(|input| input.pointer.hover_pos())
                    .unwrap_or_else(|| rect.center());
                // egui scrolls up positive; wheel ticks use the DOM sign.
                events.push(InputEvent::Wheel {
                    delta_y: -scroll,
                    pos,
                });
            }
        }

        if response.double_clicked() {
            events.push(InputEvent::DoubleClick);
        }

        // Keep canvas bindings quiet while a text field has focus.
        let keyboard_free = ui.ctx().memory(|memory| memory.focused().is_none());
        if keyboard_free {
            ui.input(|input| {
                for (key, command) in [
                    (Key::Plus, KeyCommand::ZoomIn),
                    (Key::Equals, KeyCommand::ZoomIn),
                    (Key::Minus, KeyCommand::ZoomOut),
                    (Key::Num0, KeyCommand::Fit),
                    (Key::F, KeyCommand::Fit),
                    (Key::Home, KeyCommand::ResetOrigin),
                    (Key::ArrowLeft, KeyCommand::PanLeft),
                    (Key::ArrowRight, KeyCommand::PanRight),
                    (Key::ArrowUp, KeyCommand::PanUp),
                    (Key::ArrowDown, KeyCommand::PanDown),
                ] {
                    if input.key_pressed(key) {
                        events.push(InputEvent::Key(command));
                    }
                }
            });
        }

        let mut camera_changed = false;
        let mut smooth_hint = false;
        for event in events {
            let outcome = self.session.handle_event(event, rect, content);
            camera_changed |= outcome.camera_changed;
            smooth_hint |= outcome.smooth;
        }

        if smooth_hint {
            // Smoothed jumps keep repainting so the renderer can ease toward
            // the target camera.
            ui.ctx().request_repaint();
        }

        if self.session.is_panning() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if self.session.space_held() && response.hovered() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grab);
        }

        camera_changed
    }

    pub(in crate::app) fn hovered_index(
        ui: &Ui,
        visible_indices: &[usize],
        screen_rects: &[Rect],
    ) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        visible_indices
            .iter()
            .copied()
            .find(|&index| screen_rects[index].contains(pointer))
    }
}
