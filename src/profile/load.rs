use std::fs;

use anyhow::{Context, Result};

use super::graph::{PlanGraph, build_plan_graph};
use super::parse::parse_topology;

pub fn load_profile(path: &str) -> Result<PlanGraph> {
    let raw = fs::read_to_string(path).with_context(|| format!("failed to read profile {path}"))?;
    let topology =
        parse_topology(&raw).with_context(|| format!("failed to parse profile {path}"))?;
    build_plan_graph(topology.nodes, &topology.root_id)
        .with_context(|| format!("profile {path} has no drawable plan"))
}
