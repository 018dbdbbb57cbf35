//! Dependency tree rendering
//!
//! Roots are the dependency-free resources; below each resource hang the
//! resources that depend on it. A resource with several dependencies shows
//! up under each of them.

use crate::graph::{NodeId, ResourceGraph};

/// Heading printed above the tree by the CLI.
pub const TREE_HEADING: &str = "All Resources";

/// Render the graph as box-drawing lines, one resource per line.
pub fn render_tree(graph: &ResourceGraph) -> Vec<String> {
    let mut lines = Vec::new();
    draw_level(graph, &graph.dependency_free(), "", &mut lines);
    lines
}

fn draw_level(graph: &ResourceGraph, level: &[NodeId], indent: &str, lines: &mut Vec<String>) {
    for (index, &id) in level.iter().enumerate() {
        let Some(node) = graph.node(id) else {
            continue;
        };
        let is_last = index + 1 == level.len();

        lines.push(format!(
            "{}{} {}",
            indent,
            if is_last { "└" } else { "├" },
            node.name()
        ));

        let child_indent = format!("{}{}", indent, if is_last { "  " } else { "│ " });
        draw_level(graph, &graph.dependents(id), &child_indent, lines);
    }
}
