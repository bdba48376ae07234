use eframe::egui;

use crate::app::{GlanceApp, HUD_CORNER_RADIUS, HUD_MARGIN};

impl GlanceApp {
    pub(crate) fn show_hud(&mut self, ctx: &egui::Context) {
        if !self.show_hud {
            return;
        }

        // -- Top-left: file and position --
        egui::Area::new(egui::Id::new("hud_image"))
            .anchor(egui::Align2::LEFT_TOP, [HUD_MARGIN, HUD_MARGIN])
            .show(ctx, |ui| {
                egui::Frame::NONE
                    .fill(egui::Color32::from_black_alpha(160))
                    .inner_margin(egui::Margin::same(8))
                    .corner_radius(HUD_CORNER_RADIUS)
                    .show(ui, |ui| {
                        ui.style_mut().visuals.override_text_color =
                            Some(egui::Color32::from_rgb(220, 220, 220));
                        ui.style_mut().spacing.item_spacing.y = 2.0;

                        let Some(index) = self.controller.index() else {
                            ui.label("No images");
                            return;
                        };
                        if self.show_file_name {
                            if let Some(name) = self.controller.image_file_name() {
                                ui.strong(name);
                            }
                        }
                        ui.label(format!("{} / {}", index + 1, self.controller.len()));
                        ui.label(format!("Zoom: {:.0}%", self.controller.scale() * 100.0));

                        if let Some(error) = &self.load_error {
                            ui.colored_label(egui::Color32::from_rgb(255, 120, 100), error.as_str());
                        }
                    });
            });
    }
}
