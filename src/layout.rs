use std::collections::{HashMap, HashSet};

use eframe::egui::{Pos2, Vec2, pos2, vec2};

use crate::profile::{PlanError, PlanGraph};

#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    pub node_width: f32,
    pub node_height: f32,
    pub horizontal_spacing: f32,
    pub vertical_spacing: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 140.0,
            node_height: 50.0,
            horizontal_spacing: 30.0,
            vertical_spacing: 70.0,
        }
    }
}

impl LayoutConfig {
    pub fn node_size(&self) -> Vec2 {
        vec2(self.node_width, self.node_height)
    }

    pub fn row_step(&self) -> f32 {
        self.node_height + self.vertical_spacing
    }
}

#[derive(Clone, Debug, Default)]
pub struct LayoutResult {
    /// World-space top-left corner per positioned node id.
    pub positions: HashMap<String, Pos2>,
    /// Bounding box of the laid-out tree in world units.
    pub content_size: Vec2,
}

/// Two-pass depth-first tree layout. The first pass computes per-node subtree
/// widths bottom-up; the second places nodes top-down, children left to right
/// below their parent. Each pass carries its own visited set so a node that
/// re-enters the traversal through a cycle is counted (pass one) or placed
/// (pass two) at most once. Collapsed nodes are laid out as leaves.
pub fn layout_tree(
    graph: &PlanGraph,
    collapsed: &HashSet<String>,
    config: LayoutConfig,
) -> Result<LayoutResult, PlanError> {
    let mut widths = HashMap::with_capacity(graph.node_count());
    let mut counted = HashSet::with_capacity(graph.node_count());
    let root_width = subtree_width(
        graph,
        &graph.root_id,
        collapsed,
        config,
        &mut counted,
        &mut widths,
    );

    let mut positions = HashMap::with_capacity(graph.node_count());
    let mut placed = HashSet::with_capacity(graph.node_count());
    let mut max_y = 0.0f32;
    place_subtree(
        graph,
        &graph.root_id,
        0.0,
        0,
        collapsed,
        config,
        &widths,
        &mut placed,
        &mut positions,
        &mut max_y,
    );

    if positions.is_empty() {
        return Err(PlanError::EmptyGraph);
    }

    Ok(LayoutResult {
        positions,
        content_size: vec2(root_width, max_y + config.node_height),
    })
}

fn subtree_width(
    graph: &PlanGraph,
    id: &str,
    collapsed: &HashSet<String>,
    config: LayoutConfig,
    counted: &mut HashSet<String>,
    widths: &mut HashMap<String, f32>,
) -> f32 {
    // A node seen a second time closed a cycle; count a plain node footprint
    // instead of recursing.
    if !counted.insert(id.to_string()) {
        return config.node_width;
    }

    let Some(node) = graph.nodes.get(id) else {
        return config.node_width;
    };

    let width = if node.children.is_empty() || collapsed.contains(id) {
        config.node_width
    } else {
        let mut total = 0.0f32;
        for (index, child) in node.children.iter().enumerate() {
            if index > 0 {
                total += config.horizontal_spacing;
            }
            total += subtree_width(graph, child, collapsed, config, counted, widths);
        }
        total.max(config.node_width)
    };

    widths.insert(id.to_string(), width);
    width
}

#[allow(clippy::too_many_arguments)]
fn place_subtree(
    graph: &PlanGraph,
    id: &str,
    left: f32,
    depth: usize,
    collapsed: &HashSet<String>,
    config: LayoutConfig,
    widths: &HashMap<String, f32>,
    placed: &mut HashSet<String>,
    positions: &mut HashMap<String, Pos2>,
    max_y: &mut f32,
) {
    if !placed.insert(id.to_string()) {
        return;
    }

    let Some(node) = graph.nodes.get(id) else {
        return;
    };

    let width = widths.get(id).copied().unwrap_or(config.node_width);
    let y = depth as f32 * config.row_step();
    // Center the node over its subtree's horizontal footprint.
    positions.insert(id.to_string(), pos2(left + (width - config.node_width) / 2.0, y));
    if y > *max_y {
        *max_y = y;
    }

    if collapsed.contains(id) {
        return;
    }

    let mut cursor = left;
    for child in &node.children {
        let child_width = widths.get(child).copied().unwrap_or(config.node_width);
        place_subtree(
            graph, child, cursor, depth + 1, collapsed, config, widths, placed, positions, max_y,
        );
        cursor += child_width + config.horizontal_spacing;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::profile::{PlanGraph, build_plan_graph, test_node};

    use super::*;

    fn graph(records: Vec<crate::profile::RawPlanNode>, root: &str) -> PlanGraph {
        build_plan_graph(records, root).unwrap()
    }

    fn join_over_two_scans() -> PlanGraph {
        graph(
            vec![
                test_node("0", "JOIN", &["1", "2"]),
                test_node("1", "SCAN_A", &[]),
                test_node("2", "SCAN_B", &[]),
            ],
            "0",
        )
    }

    #[test]
    fn join_over_two_scans_centers_the_root() {
        let config = LayoutConfig::default();
        let result = layout_tree(&join_over_two_scans(), &HashSet::new(), config).unwrap();

        let root = result.positions["0"];
        let left = result.positions["1"];
        let right = result.positions["2"];

        assert_eq!(left.y, right.y);
        assert_eq!(left.y, config.node_height + config.vertical_spacing);
        assert_eq!(root.y, 0.0);

        assert_eq!(left.x, 0.0);
        assert_eq!(right.x, config.node_width + config.horizontal_spacing);
        assert_eq!(root.x, (left.x + right.x) / 2.0);

        assert_eq!(
            result.content_size,
            vec2(
                2.0 * config.node_width + config.horizontal_spacing,
                2.0 * config.node_height + config.vertical_spacing,
            )
        );
    }

    #[test]
    fn layout_is_deterministic() {
        let plan = join_over_two_scans();
        let first = layout_tree(&plan, &HashSet::new(), LayoutConfig::default()).unwrap();
        let second = layout_tree(&plan, &HashSet::new(), LayoutConfig::default()).unwrap();
        assert_eq!(first.positions, second.positions);
        assert_eq!(first.content_size, second.content_size);
    }

    #[test]
    fn leaf_width_is_node_width() {
        let config = LayoutConfig::default();
        let plan = graph(vec![test_node("0", "SCAN", &[])], "0");
        let result = layout_tree(&plan, &HashSet::new(), config).unwrap();
        assert_eq!(result.content_size.x, config.node_width);
        assert_eq!(result.content_size.y, config.node_height);
    }

    #[test]
    fn parent_width_covers_all_children() {
        let config = LayoutConfig::default();
        let plan = graph(
            vec![
                test_node("0", "UNION", &["1", "2", "3"]),
                test_node("1", "SCAN_A", &[]),
                test_node("2", "SCAN_B", &[]),
                test_node("3", "SCAN_C", &[]),
            ],
            "0",
        );

        let result = layout_tree(&plan, &HashSet::new(), config).unwrap();
        assert_eq!(
            result.content_size.x,
            3.0 * config.node_width + 2.0 * config.horizontal_spacing
        );
        assert!(result.content_size.x >= config.node_width);
    }

    #[test]
    fn cycles_terminate_and_place_every_node_once() {
        // 0 -> 1 -> 2 -> 0 closes a cycle back to the root.
        let plan = graph(
            vec![
                test_node("0", "JOIN", &["1"]),
                test_node("1", "EXCHANGE", &["2"]),
                test_node("2", "SCAN", &["0"]),
            ],
            "0",
        );

        let result = layout_tree(&plan, &HashSet::new(), LayoutConfig::default()).unwrap();
        assert_eq!(result.positions.len(), 3);
        assert_eq!(result.positions["0"].y, 0.0);
    }

    #[test]
    fn shared_child_is_placed_once() {
        let plan = graph(
            vec![
                test_node("0", "JOIN", &["1", "2"]),
                test_node("1", "EXCHANGE", &["3"]),
                test_node("2", "EXCHANGE", &["3"]),
                test_node("3", "SCAN", &[]),
            ],
            "0",
        );

        let result = layout_tree(&plan, &HashSet::new(), LayoutConfig::default()).unwrap();
        assert_eq!(result.positions.len(), 4);
    }

    #[test]
    fn collapsed_node_is_laid_out_as_leaf() {
        let config = LayoutConfig::default();
        let plan = join_over_two_scans();
        let collapsed = HashSet::from(["0".to_string()]);

        let result = layout_tree(&plan, &collapsed, config).unwrap();
        assert_eq!(result.positions.len(), 1);
        assert_eq!(result.content_size, vec2(config.node_width, config.node_height));
    }
}
