mod graph;
mod load;
mod parse;

pub use graph::{PlanError, PlanGraph, PlanNode, build_plan_graph};
pub use load::load_profile;
pub use parse::{RawPlanNode, parse_topology};

#[cfg(test)]
pub(crate) use graph::test_node;
