use eframe::egui;

use glance_core::{Vector, WHEEL_NOTCH};

use crate::app::{GlanceApp, SCROLL_POINTS_PER_NOTCH};

/// Pointer position relative to the canvas' top-left corner.
fn canvas_point(response: &egui::Response, pos: egui::Pos2) -> Vector {
    let local = pos - response.rect.min;
    Vector::new(local.x as f64, local.y as f64)
}

impl GlanceApp {
    pub(crate) fn handle_canvas_input(&mut self, ctx: &egui::Context, response: &egui::Response) {
        let scroll_y = ctx.input(|i| i.raw_scroll_delta.y);
        if scroll_y.abs() > 0.0 && response.hovered() {
            let delta = scroll_y as f64 / SCROLL_POINTS_PER_NOTCH * WHEEL_NOTCH;
            self.pending |= self.controller.zoom_by_wheel(delta);
        }

        if response.double_clicked() {
            self.drag.end();
            Self::toggle_fullscreen(ctx);
            return;
        }

        if response.drag_started_by(egui::PointerButton::Primary) {
            // Anchor at the press position; egui reports the drag a few pixels late.
            let press = ctx
                .input(|i| i.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(pos) = press {
                self.drag.begin(
                    canvas_point(response, pos),
                    self.controller.translate(),
                    self.controller.scale(),
                );
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let pointer = canvas_point(response, pos);
                if let Some(pan) = self.drag.update(pointer, self.controller.scale()) {
                    self.pending |= self.controller.set_translate(pan.x, pan.y);
                }
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            self.drag.end();
        }
    }

    pub(crate) fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let (previous, next, fullscreen, escape, file_name, hud) = ctx.input(|input| {
            (
                input.key_pressed(egui::Key::ArrowLeft) || input.key_pressed(egui::Key::PageUp),
                input.key_pressed(egui::Key::ArrowRight) || input.key_pressed(egui::Key::PageDown),
                input.key_pressed(egui::Key::F) || input.key_pressed(egui::Key::F11),
                input.key_pressed(egui::Key::Escape),
                input.key_pressed(egui::Key::N),
                input.key_pressed(egui::Key::H),
            )
        });

        if previous {
            self.navigate(-1);
        }
        if next {
            self.navigate(1);
        }
        if fullscreen {
            Self::toggle_fullscreen(ctx);
        }
        if escape {
            if Self::is_fullscreen(ctx) {
                Self::set_fullscreen(ctx, false);
            } else {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
        if file_name {
            self.toggle_file_name();
        }
        if hud {
            self.show_hud = !self.show_hud;
        }
    }
}
