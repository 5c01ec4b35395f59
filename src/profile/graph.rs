use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde_json::{Map, Value};

use super::parse::RawPlanNode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanError {
    RootNotFound,
    EmptyGraph,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RootNotFound => write!(f, "could not find root node in profile"),
            Self::EmptyGraph => write!(f, "no operators found to visualize"),
        }
    }
}

impl std::error::Error for PlanError {}

#[derive(Clone, Debug)]
pub struct PlanNode {
    pub id: String,
    pub name: String,
    /// Child ids in display order, left to right.
    pub children: Vec<String>,
    pub properties: Map<String, Value>,
}

#[derive(Clone, Debug)]
pub struct PlanGraph {
    pub root_id: String,
    pub nodes: HashMap<String, PlanNode>,
    pub edge_count: usize,
}

/// Builds the plan graph from raw profile records. Child ids that do not
/// resolve to a present record are dropped; cycles are left in place for the
/// layout pass to guard against.
pub fn build_plan_graph(records: Vec<RawPlanNode>, root_id: &str) -> Result<PlanGraph, PlanError> {
    if records.is_empty() {
        return Err(PlanError::EmptyGraph);
    }

    let mut nodes = HashMap::with_capacity(records.len());
    for record in records {
        if record.id.is_empty() {
            continue;
        }

        let name = if record.name.is_empty() {
            "UNKNOWN".to_string()
        } else {
            record.name
        };

        nodes.insert(
            record.id.clone(),
            PlanNode {
                id: record.id,
                name,
                children: record.children,
                properties: record.properties,
            },
        );
    }

    if !nodes.contains_key(root_id) {
        return Err(PlanError::RootNotFound);
    }

    let known_ids = nodes.keys().cloned().collect::<HashSet<_>>();
    let mut edge_count = 0usize;

    for (id, node) in &mut nodes {
        let mut seen = HashSet::new();
        node.children
            .retain(|child| child != id && known_ids.contains(child) && seen.insert(child.clone()));
        edge_count += node.children.len();
    }

    Ok(PlanGraph {
        root_id: root_id.to_string(),
        nodes,
        edge_count,
    })
}

impl PlanGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn path_from_root(&self, target: &str) -> Option<Vec<String>> {
        if !self.nodes.contains_key(target) {
            return None;
        }

        if target == self.root_id {
            return Some(vec![self.root_id.clone()]);
        }

        let mut queue = VecDeque::new();
        let mut visited = HashSet::new();
        let mut parent: HashMap<String, String> = HashMap::new();

        queue.push_back(self.root_id.clone());
        visited.insert(self.root_id.clone());

        while let Some(current) = queue.pop_front() {
            if current == target {
                break;
            }

            let Some(node) = self.nodes.get(&current) else {
                continue;
            };

            for next in &node.children {
                if visited.contains(next) {
                    continue;
                }

                visited.insert(next.clone());
                parent.insert(next.clone(), current.clone());
                queue.push_back(next.clone());
            }
        }

        if !visited.contains(target) {
            return None;
        }

        let mut path = Vec::new();
        let mut cursor = target.to_string();
        path.push(cursor.clone());

        while cursor != self.root_id {
            let prev = parent.get(&cursor)?;
            cursor = prev.clone();
            path.push(cursor.clone());
        }

        path.reverse();
        Some(path)
    }
}

#[cfg(test)]
pub(crate) fn test_node(id: &str, name: &str, children: &[&str]) -> RawPlanNode {
    RawPlanNode {
        id: id.to_string(),
        name: name.to_string(),
        children: children.iter().map(|child| child.to_string()).collect(),
        properties: Map::new(),
    }
}
