//! Acyclicity precondition for the raw include graph.
//!
//! Self-loop stripping at the end of raw-edge construction removes `X → X`
//! edges only. A genuine multi-node cycle (two components mutually including
//! each other's headers) leaves both closure seeding and transitive
//! reduction without a well-defined result, so the pipeline checks the raw
//! graph up front and aborts loudly instead of silently producing an
//! unstable edge set.
//!
//! Detection is a standard three-color depth-first search over a petgraph
//! [`DiGraph`] built from every component's `raw_include_deps`.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::core::DepgraphError;
use crate::registry::Registry;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is currently being visited (in the DFS stack).
    Gray,
    /// Node has been fully visited.
    Black,
}

/// Verify that the raw include graph, after self-loop removal, is acyclic.
///
/// Returns [`DepgraphError::CircularIncludes`] carrying the offending cycle
/// path if one exists.
pub fn ensure_acyclic(registry: &Registry) -> Result<(), DepgraphError> {
    let mut graph: DiGraph<String, ()> = DiGraph::new();
    let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

    let mut ensure_node = |graph: &mut DiGraph<String, ()>, name: &str| -> NodeIndex {
        if let Some(&index) = node_map.get(name) {
            index
        } else {
            let index = graph.add_node(name.to_string());
            node_map.insert(name.to_string(), index);
            index
        }
    };

    for lib in registry.iter() {
        let from = ensure_node(&mut graph, &lib.name);
        for dep in &lib.raw_include_deps {
            let to = ensure_node(&mut graph, dep);
            if from != to && !graph.contains_edge(from, to) {
                graph.add_edge(from, to, ());
            }
        }
    }

    let mut colors: HashMap<NodeIndex, Color> = HashMap::new();
    for node in graph.node_indices() {
        colors.insert(node, Color::White);
    }

    let mut path: Vec<NodeIndex> = Vec::new();
    for node in graph.node_indices() {
        if matches!(colors.get(&node), Some(Color::White))
            && let Some(cycle) = dfs_visit(&graph, node, &mut colors, &mut path)
        {
            let cycle_str =
                cycle.iter().map(|idx| graph[*idx].clone()).collect::<Vec<_>>().join(" -> ");
            return Err(DepgraphError::CircularIncludes { cycle: cycle_str });
        }
    }

    Ok(())
}

/// DFS visit for cycle detection.
///
/// Returns `Some(cycle_path)` if a cycle is detected, None otherwise.
fn dfs_visit(
    graph: &DiGraph<String, ()>,
    node: NodeIndex,
    colors: &mut HashMap<NodeIndex, Color>,
    path: &mut Vec<NodeIndex>,
) -> Option<Vec<NodeIndex>> {
    colors.insert(node, Color::Gray);
    path.push(node);

    for neighbor in graph.neighbors(node) {
        match colors.get(&neighbor) {
            Some(Color::Gray) => {
                // Found a cycle - close it at the point the path re-enters.
                let cycle_start = path.iter().position(|n| *n == neighbor)?;
                let mut cycle = path[cycle_start..].to_vec();
                cycle.push(neighbor);
                return Some(cycle);
            }
            Some(Color::White) => {
                if let Some(cycle) = dfs_visit(graph, neighbor, colors, path) {
                    return Some(cycle);
                }
            }
            _ => {}
        }
    }

    path.pop();
    colors.insert(node, Color::Black);
    None
}
