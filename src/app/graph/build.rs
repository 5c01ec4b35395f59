use std::collections::{HashMap, HashSet};

use crate::layout::layout_tree;

use super::super::{RenderGraph, RenderNode, ViewModel, ViewScratch};

impl ViewModel {
    /// Depth-first preorder over the expanded part of the plan, following
    /// display order. Gives render nodes a stable index independent of hash
    /// map iteration.
    fn visible_ids(&self) -> Vec<String> {
        let mut ids = Vec::with_capacity(self.graph.node_count());
        let mut visited = HashSet::with_capacity(self.graph.node_count());
        let mut stack = vec![self.graph.root_id.clone()];

        while let Some(id) = stack.pop() {
            if !visited.insert(id.clone()) {
                continue;
            }
            let Some(node) = self.graph.nodes.get(&id) else {
                continue;
            };
            if !self.collapsed.contains(&id) {
                for child in node.children.iter().rev() {
                    stack.push(child.clone());
                }
            }
            ids.push(id);
        }

        ids
    }

    fn hidden_descendant_count(&self, id: &str) -> usize {
        let Some(node) = self.graph.nodes.get(id) else {
            return 0;
        };

        let mut visited = HashSet::new();
        visited.insert(id.to_string());
        let mut stack = node.children.clone();
        let mut count = 0usize;

        while let Some(next) = stack.pop() {
            if !visited.insert(next.clone()) {
                continue;
            }
            count += 1;
            if let Some(child) = self.graph.nodes.get(&next) {
                stack.extend(child.children.iter().cloned());
            }
        }

        count
    }

    fn collect_edges(&self, ids: &[String], index_by_id: &HashMap<String, usize>) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for (parent_index, parent_id) in ids.iter().enumerate() {
            if self.collapsed.contains(parent_id) {
                continue;
            }
            let Some(node) = self.graph.nodes.get(parent_id) else {
                continue;
            };

            for child_id in &node.children {
                if let Some(&child_index) = index_by_id.get(child_id)
                    && parent_index != child_index
                {
                    edges.push((parent_index, child_index));
                }
            }
        }
        edges
    }

    pub(in crate::app) fn rebuild_render_graph(&mut self) {
        self.render_graph_revision = self.render_graph_revision.wrapping_add(1);
        self.search_match_cache = None;

        let result = match layout_tree(&self.graph, &self.collapsed, self.layout_config) {
            Ok(result) => result,
            Err(_) => {
                self.graph_cache = None;
                self.visible_node_count = 0;
                self.visible_edge_count = 0;
                self.graph_dirty = false;
                return;
            }
        };

        let ids = self.visible_ids();
        let mut index_by_id = HashMap::with_capacity(ids.len());
        for (index, id) in ids.iter().enumerate() {
            index_by_id.insert(id.clone(), index);
        }
        let edges = self.collect_edges(&ids, &index_by_id);

        let nodes = ids
            .iter()
            .filter_map(|id| {
                let node = self.graph.nodes.get(id)?;
                let world_pos = result.positions.get(id).copied()?;
                let collapsed = self.collapsed.contains(id);
                Some(RenderNode {
                    id: id.clone(),
                    name: node.name.clone(),
                    world_pos,
                    child_count: node.children.len(),
                    hidden_count: if collapsed {
                        self.hidden_descendant_count(id)
                    } else {
                        0
                    },
                    collapsed,
                })
            })
            .collect::<Vec<_>>();

        self.visible_node_count = nodes.len();
        self.visible_edge_count = edges.len();
        self.graph_cache = Some(RenderGraph {
            nodes,
            edges,
            index_by_id,
            content_size: result.content_size,
            view_scratch: ViewScratch::default(),
        });
        self.graph_dirty = false;
    }
}
