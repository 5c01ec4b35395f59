use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};

use crate::camera::ViewConfig;
use crate::input::ViewportSession;
use crate::layout::LayoutConfig;
use crate::profile::{PlanGraph, load_profile};

mod graph;
mod render_utils;
mod ui;

pub struct PlanScopeApp {
    profile_path: String,
    state: AppState,
    reload_rx: Option<Receiver<Result<PlanGraph, String>>>,
}

enum AppState {
    Empty,
    Loading {
        rx: Receiver<Result<PlanGraph, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    graph: PlanGraph,
    layout_config: LayoutConfig,
    session: ViewportSession,
    collapsed: HashSet<String>,
    selected: Option<String>,
    search: String,
    graph_dirty: bool,
    pending_fit: bool,
    render_graph_revision: u64,
    graph_cache: Option<RenderGraph>,
    search_match_cache: Option<SearchMatchCache>,
    visible_node_count: usize,
    visible_edge_count: usize,
}

struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<(usize, usize)>,
    index_by_id: HashMap<String, usize>,
    content_size: Vec2,
    view_scratch: ViewScratch,
}

struct RenderNode {
    id: String,
    name: String,
    world_pos: Pos2,
    child_count: usize,
    hidden_count: usize,
    collapsed: bool,
}

struct SearchMatchCache {
    query: String,
    graph_revision: u64,
    matches: Arc<HashSet<usize>>,
}

#[derive(Default)]
struct ViewScratch {
    screen_rects: Vec<egui::Rect>,
    visible_indices: Vec<usize>,
    handle_rects: Vec<Option<egui::Rect>>,
}

impl PlanScopeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, profile_path: Option<String>) -> Self {
        let (profile_path, state) = match profile_path {
            Some(path) => {
                let state = Self::start_load(path.clone());
                (path, state)
            }
            None => (String::new(), AppState::Empty),
        };

        Self {
            profile_path,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(profile_path: String) -> Receiver<Result<PlanGraph, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_profile(&profile_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(profile_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(profile_path),
        }
    }

    fn show_path_bar(&mut self, ctx: &Context, is_loading: bool) -> bool {
        let mut load_requested = false;
        egui::TopBottomPanel::top("profile-path").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label("Profile:");
                ui.add(
                    egui::TextEdit::singleline(&mut self.profile_path)
                        .desired_width(420.0)
                        .hint_text("path to query-plan profile JSON"),
                );
                let can_load = !self.profile_path.trim().is_empty() && !is_loading;
                if ui
                    .add_enabled(can_load, egui::Button::new("Load"))
                    .clicked()
                {
                    load_requested = true;
                }
                if is_loading {
                    ui.spinner();
                }
            });
            ui.add_space(4.0);
        });
        load_requested
    }
}

impl eframe::App for PlanScopeApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let is_loading =
            matches!(self.state, AppState::Loading { .. }) || self.reload_rx.is_some();
        let load_requested = self.show_path_bar(ctx, is_loading);

        match &mut self.state {
            AppState::Empty => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("No profile loaded");
                        ui.add_space(8.0);
                        ui.label("Enter a profile path above and press Load.");
                    });
                });
            }
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading query-plan profile...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load query-plan profile");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.profile_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                model.show(ctx);

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => {
                            transition = Some(match result {
                                Ok(graph) => AppState::Ready(Box::new(ViewModel::new(graph))),
                                Err(error) => AppState::Error(error),
                            });
                        }
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if load_requested {
            match &self.state {
                AppState::Ready(_) => {
                    if self.reload_rx.is_none() {
                        self.reload_rx = Some(Self::spawn_load(self.profile_path.clone()));
                    }
                }
                _ => {
                    transition = Some(Self::start_load(self.profile_path.clone()));
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(graph: PlanGraph) -> Self {
        Self {
            graph,
            layout_config: LayoutConfig::default(),
            session: ViewportSession::new(ViewConfig::default()),
            collapsed: HashSet::new(),
            selected: None,
            search: String::new(),
            graph_dirty: true,
            pending_fit: true,
            render_graph_revision: 0,
            graph_cache: None,
            search_match_cache: None,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    fn show(&mut self, ctx: &Context) {
        if self.graph_dirty {
            self.rebuild_render_graph();
        }

        self.show_controls(ctx);
        self.show_details_panel(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.draw_canvas(ui);
            });
    }

    fn set_selected(&mut self, selected: Option<String>) {
        self.selected = selected;
    }

    fn toggle_collapsed(&mut self, id: &str) {
        if !self.collapsed.remove(id) {
            self.collapsed.insert(id.to_string());
        }
        // Re-layout with the camera held in place; the canvas clamps against
        // the new content size on the next frame.
        self.graph_dirty = true;
    }
}
