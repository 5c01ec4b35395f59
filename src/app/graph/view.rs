use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, Vec2, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::camera::Camera;
use crate::input::InputEvent;
use crate::profile::PlanGraph;
use crate::util::truncate_label;

use super::super::render_utils::{
    blend_color, box_visible, dim_color, draw_background, edge_visible, operator_color,
};
use super::super::{RenderGraph, SearchMatchCache, ViewModel};

const MINIMAP_MAX_SIZE: Vec2 = vec2(200.0, 140.0);
const MINIMAP_MARGIN: f32 = 12.0;

enum ClickAction {
    Select(Option<String>),
    ToggleCollapse(String),
    MinimapJump(Vec2),
}

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

struct Minimap {
    frame: Rect,
    origin: Pos2,
    scale: f32,
}

impl Minimap {
    fn new(canvas: Rect, content: Vec2) -> Option<Self> {
        if content.x <= 0.0 || content.y <= 0.0 {
            return None;
        }

        let inner_max = MINIMAP_MAX_SIZE - vec2(8.0, 8.0);
        let scale = (inner_max.x / content.x).min(inner_max.y / content.y);
        let inner = content * scale;
        let frame = Rect::from_min_size(
            canvas.right_bottom() - vec2(MINIMAP_MARGIN, MINIMAP_MARGIN) - inner - vec2(8.0, 8.0),
            inner + vec2(8.0, 8.0),
        );

        Some(Self {
            frame,
            origin: frame.min + vec2(4.0, 4.0),
            scale,
        })
    }

    fn to_mini(&self, world: Vec2) -> Pos2 {
        self.origin + world * self.scale
    }

    fn to_world(&self, mini: Pos2) -> Vec2 {
        (mini - self.origin) / self.scale
    }
}

impl ViewModel {
    fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.graph_revision == self.render_graph_revision
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let cache = self.graph_cache.as_ref()?;
        let matcher = SkimMatcherV2::default();
        let matches = cache
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                fuzzy_match_score(&matcher, &node.name, query).map(|_| index)
            })
            .collect::<HashSet<_>>();
        let matches = Arc::new(matches);

        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            graph_revision: self.render_graph_revision,
            matches: Arc::clone(&matches),
        });

        Some(matches)
    }

    fn root_path_indices(
        graph: &PlanGraph,
        selected: Option<&str>,
        cache: &RenderGraph,
    ) -> (HashSet<usize>, HashSet<(usize, usize)>) {
        let mut path_nodes = HashSet::new();
        let mut path_edges = HashSet::new();

        if let Some(selected) = selected
            && let Some(path) = graph.path_from_root(selected)
        {
            let indices = path
                .iter()
                .filter_map(|id| cache.index_by_id.get(id).copied())
                .collect::<Vec<_>>();
            for pair in indices.windows(2) {
                path_edges.insert((pair[0], pair[1]));
            }
            path_nodes.extend(indices);
        }

        (path_nodes, path_edges)
    }

    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, &self.session.camera);

        let Some(content_size) = self.graph_cache.as_ref().map(|cache| cache.content_size) else {
            // Degenerate content keeps every camera mutation a no-op.
            self.handle_canvas_input(ui, rect, &response, Vec2::ZERO);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No operators found to visualize.",
                FontId::proportional(15.0),
                Color32::from_gray(200),
            );
            return;
        };

        if self.pending_fit {
            let config = self.session.config;
            self.session
                .camera
                .fit_to_view(content_size, rect.size(), &config);
            self.pending_fit = false;
        }

        self.handle_canvas_input(ui, rect, &response, content_size);
        let search_matches = self.cached_search_matches();
        let search_active = search_matches
            .as_ref()
            .is_some_and(|matches| !matches.is_empty());

        let camera = self.session.camera;
        let node_size = self.layout_config.node_size();
        let space_held = self.session.space_held();
        let panning = self.session.is_panning();
        let zoom = camera.zoom;

        let mut action = None;

        {
            let Some(cache) = self.graph_cache.as_mut() else {
                return;
            };

            cache.view_scratch.screen_rects.clear();
            cache.view_scratch.handle_rects.clear();
            for node in &cache.nodes {
                let min = camera.world_to_screen(rect, node.world_pos.to_vec2());
                let screen_rect = Rect::from_min_size(min, node_size * zoom);
                let handle = if node.child_count > 0 {
                    Some(Rect::from_center_size(
                        screen_rect.center_bottom(),
                        vec2(14.0, 14.0),
                    ))
                } else {
                    None
                };
                cache.view_scratch.screen_rects.push(screen_rect);
                cache.view_scratch.handle_rects.push(handle);
            }

            cache.view_scratch.visible_indices.clear();
            for (index, screen_rect) in cache.view_scratch.screen_rects.iter().enumerate() {
                if box_visible(rect, *screen_rect) {
                    cache.view_scratch.visible_indices.push(index);
                }
            }

            let (path_nodes, path_edges) =
                Self::root_path_indices(&self.graph, self.selected.as_deref(), cache);
            let selection_active = !path_nodes.is_empty();
            let zoom_sqrt = zoom.sqrt();

            for &(parent, child) in &cache.edges {
                let start = cache.view_scratch.screen_rects[parent].center_bottom();
                let end = cache.view_scratch.screen_rects[child].center_top();
                if !edge_visible(rect, start, end, 2.0) {
                    continue;
                }

                let (width, color) = if path_edges.contains(&(parent, child)) {
                    (
                        (3.0 * zoom_sqrt).clamp(1.6, 5.2),
                        Color32::from_rgb(246, 206, 104),
                    )
                } else if selection_active || search_active {
                    (
                        (1.1 * zoom_sqrt).clamp(0.5, 2.4),
                        Color32::from_rgba_unmultiplied(80, 90, 104, 150),
                    )
                } else {
                    (
                        (1.4 * zoom_sqrt).clamp(0.6, 3.0),
                        Color32::from_rgba_unmultiplied(110, 118, 128, 200),
                    )
                };
                painter.line_segment([start, end], Stroke::new(width, color));
            }

            let hovered = Self::hovered_index(
                ui,
                &cache.view_scratch.visible_indices,
                &cache.view_scratch.screen_rects,
            );

            if hovered.is_some() && !panning && !space_held {
                ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
            }

            let selected_color = Color32::from_rgb(245, 206, 93);
            let label_font = FontId::proportional((13.0 * zoom).clamp(9.0, 18.0));

            for &index in &cache.view_scratch.visible_indices {
                let node = &cache.nodes[index];
                let screen_rect = cache.view_scratch.screen_rects[index];

                let is_selected = self.selected.as_deref() == Some(node.id.as_str());
                let is_hovered = hovered == Some(index);
                let is_on_path = path_nodes.contains(&index);
                let is_match = search_matches
                    .as_ref()
                    .is_some_and(|matches| matches.contains(&index));

                let base = operator_color(&node.name);
                let mut fill = if is_match {
                    blend_color(base, Color32::from_rgb(103, 196, 255), 0.45)
                } else if is_on_path {
                    blend_color(base, Color32::from_rgb(247, 194, 111), 0.35)
                } else if selection_active || search_active {
                    dim_color(base, 0.5)
                } else {
                    base
                };
                if is_hovered {
                    fill = blend_color(fill, Color32::WHITE, 0.12);
                }

                painter.rect_filled(screen_rect, 4.0, fill);

                let stroke = if is_selected {
                    Stroke::new(2.2, selected_color)
                } else if is_on_path {
                    Stroke::new(1.6, Color32::from_rgb(247, 194, 111))
                } else {
                    Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
                };
                painter.rect_stroke(screen_rect, 4.0, stroke, StrokeKind::Inside);

                if zoom > 0.35 {
                    painter.text(
                        screen_rect.center(),
                        Align2::CENTER_CENTER,
                        truncate_label(&node.name, 18),
                        label_font.clone(),
                        Color32::from_gray(235),
                    );
                }

                if let Some(handle) = cache.view_scratch.handle_rects[index] {
                    painter.rect_filled(handle, 3.0, Color32::from_rgb(40, 46, 54));
                    painter.rect_stroke(
                        handle,
                        3.0,
                        Stroke::new(1.0, Color32::from_gray(120)),
                        StrokeKind::Inside,
                    );
                    let glyph = if node.collapsed { "+" } else { "−" };
                    painter.text(
                        handle.center(),
                        Align2::CENTER_CENTER,
                        glyph,
                        FontId::proportional(12.0),
                        Color32::from_gray(220),
                    );

                    if node.collapsed && node.hidden_count > 0 && zoom > 0.35 {
                        painter.text(
                            handle.center() + vec2(0.0, 14.0),
                            Align2::CENTER_CENTER,
                            format!("{} hidden", node.hidden_count),
                            FontId::proportional(10.0),
                            Color32::from_gray(170),
                        );
                    }
                }
            }

            let minimap = Minimap::new(rect, content_size);
            if let Some(minimap) = &minimap {
                Self::draw_minimap(&painter, minimap, cache, &camera, rect, node_size / 2.0);
            }

            if response.clicked_by(egui::PointerButton::Primary) && !space_held {
                if let Some(pointer) = ui.input(|input| input.pointer.hover_pos()) {
                    if let Some(minimap) = &minimap
                        && minimap.frame.contains(pointer)
                    {
                        action = Some(ClickAction::MinimapJump(minimap.to_world(pointer)));
                    } else if let Some(index) = cache
                        .view_scratch
                        .visible_indices
                        .iter()
                        .copied()
                        .find(|&index| {
                            cache.view_scratch.handle_rects[index]
                                .is_some_and(|handle| handle.contains(pointer))
                        })
                    {
                        action = Some(ClickAction::ToggleCollapse(cache.nodes[index].id.clone()));
                    } else {
                        let clicked_id =
                            hovered.map(|index| cache.nodes[index].id.clone());
                        action = Some(ClickAction::Select(clicked_id));
                    }
                }
            }
        }

        match action {
            Some(ClickAction::Select(selected)) => self.set_selected(selected),
            Some(ClickAction::ToggleCollapse(id)) => self.toggle_collapsed(&id),
            Some(ClickAction::MinimapJump(world)) => {
                self.session
                    .handle_event(InputEvent::MinimapJump { world }, rect, content_size);
            }
            None => {}
        }
    }

    fn draw_minimap(
        painter: &egui::Painter,
        minimap: &Minimap,
        cache: &RenderGraph,
        camera: &Camera,
        canvas: Rect,
        half_node: Vec2,
    ) {
        painter.rect_filled(
            minimap.frame,
            4.0,
            Color32::from_rgba_unmultiplied(12, 15, 19, 220),
        );
        painter.rect_stroke(
            minimap.frame,
            4.0,
            Stroke::new(1.0, Color32::from_gray(90)),
            StrokeKind::Inside,
        );

        for node in &cache.nodes {
            let dot = minimap.to_mini(node.world_pos.to_vec2() + half_node);
            painter.circle_filled(dot, 1.5, dim_color(operator_color(&node.name), 0.9));
        }

        let view_min = minimap.to_mini(camera.pos);
        let view_max = minimap.to_mini(camera.pos + canvas.size() / camera.zoom);
        let view_rect = Rect::from_min_max(view_min, view_max).intersect(minimap.frame);
        if view_rect.is_positive() {
            painter.rect_stroke(
                view_rect,
                0.0,
                Stroke::new(1.0, Color32::from_gray(230)),
                StrokeKind::Inside,
            );
        }
    }
}
