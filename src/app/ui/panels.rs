use eframe::egui::{self, Context};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show_controls(&mut self, ctx: &Context) {
        egui::TopBottomPanel::top("canvas-controls").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui
                    .button("Fit")
                    .on_hover_text("Fit the whole plan in view (0 / F)")
                    .clicked()
                {
                    self.pending_fit = true;
                }
                if ui
                    .button("Expand all")
                    .on_hover_text("Expand every collapsed operator")
                    .clicked()
                    && !self.collapsed.is_empty()
                {
                    self.collapsed.clear();
                    self.graph_dirty = true;
                }

                ui.separator();
                ui.label("Search:");
                let search_response = ui.add(
                    egui::TextEdit::singleline(&mut self.search)
                        .desired_width(200.0)
                        .hint_text("operator name"),
                );
                if search_response.changed() {
                    self.search_match_cache = None;
                }
                if !self.search.is_empty() && ui.button("✕").clicked() {
                    self.search.clear();
                    self.search_match_cache = None;
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{}%", self.session.camera.zoom_percent()));
                    ui.separator();
                    ui.label(format!(
                        "{} operators, {} edges",
                        self.visible_node_count, self.visible_edge_count
                    ));
                });
            });
            ui.add_space(4.0);
        });
    }
}
