use eframe::egui::{self, Context, RichText};

use crate::util::{format_property, truncate_label};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn show_details_panel(&mut self, ctx: &Context) {
        egui::SidePanel::right("operator-details")
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.add_space(6.0);

                let Some(selected_id) = self.selected.clone() else {
                    self.show_plan_summary(ui);
                    return;
                };
                let Some(node) = self.graph.nodes.get(&selected_id).cloned() else {
                    self.set_selected(None);
                    self.show_plan_summary(ui);
                    return;
                };

                ui.horizontal(|ui| {
                    ui.heading(truncate_label(&node.name, 24));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("✕").clicked() {
                            self.set_selected(None);
                        }
                    });
                });
                ui.label(RichText::new(format!("id: {}", node.id)).weak());
                ui.add_space(6.0);

                if !node.children.is_empty() {
                    let collapsed = self.collapsed.contains(&selected_id);
                    let toggle_label = if collapsed {
                        format!("Expand {} children", node.children.len())
                    } else {
                        format!("Collapse {} children", node.children.len())
                    };
                    if ui.button(toggle_label).clicked() {
                        self.toggle_collapsed(&selected_id);
                    }
                    ui.add_space(6.0);
                }

                egui::ScrollArea::vertical().show(ui, |ui| {
                    if node.properties.is_empty() {
                        ui.label(RichText::new("No properties.").weak());
                    } else {
                        ui.strong("Properties");
                        egui::Grid::new("operator-properties")
                            .striped(true)
                            .num_columns(2)
                            .show(ui, |ui| {
                                for (key, value) in &node.properties {
                                    ui.label(key);
                                    ui.label(format_property(value));
                                    ui.end_row();
                                }
                            });
                    }

                    if !node.children.is_empty() {
                        ui.add_space(8.0);
                        ui.strong("Children");
                        for child_id in &node.children {
                            let Some(child) = self.graph.nodes.get(child_id) else {
                                continue;
                            };
                            if ui
                                .link(format!("{} ({})", truncate_label(&child.name, 24), child.id))
                                .clicked()
                            {
                                self.set_selected(Some(child_id.clone()));
                            }
                        }
                    }
                });
            });
    }

    fn show_plan_summary(&self, ui: &mut egui::Ui) {
        ui.heading("Query plan");
        ui.add_space(6.0);

        let root_name = self
            .graph
            .nodes
            .get(&self.graph.root_id)
            .map(|node| node.name.as_str())
            .unwrap_or("?");

        ui.label(format!("Root operator: {root_name}"));
        ui.label(format!("Operators: {}", self.graph.node_count()));
        ui.label(format!("Edges: {}", self.graph.edge_count));
        if !self.collapsed.is_empty() {
            ui.label(format!("Collapsed: {}", self.collapsed.len()));
        }

        ui.add_space(12.0);
        ui.label(RichText::new("Click an operator to inspect it.").weak());
        ui.add_space(4.0);
        ui.label(
            RichText::new(
                "Pan: right-drag or space+drag · Zoom: wheel, +/- · Fit: 0, F or double-click · \
                 Home: origin",
            )
            .weak(),
        );
    }
}
