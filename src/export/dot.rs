//! Graphviz rendering of the dependency graph.
//!
//! One directed edge per dependency entry, components in registry order.
//! Written twice per scan: over the raw include edges before processing and
//! over the reduced build edges after.

use std::collections::BTreeSet;
use std::path::Path;

use crate::core::DepgraphError;
use crate::registry::{Library, Registry};

/// Which edge set to render.
#[derive(Debug, Clone, Copy)]
pub enum DotEdges {
    /// Raw include edges (pre-classification).
    RawIncludes,
    /// Final build dependencies.
    Build,
}

impl DotEdges {
    fn of<'a>(self, lib: &'a Library) -> &'a BTreeSet<String> {
        match self {
            Self::RawIncludes => &lib.raw_include_deps,
            Self::Build => &lib.deps,
        }
    }
}

/// Render the selected edge set as a Graphviz digraph.
#[must_use]
pub fn dot_string(registry: &Registry, edges: DotEdges) -> String {
    let mut out = String::from("digraph G {\n");
    for lib in registry.iter() {
        for dep in edges.of(lib) {
            out.push_str(&format!("    \"{}\" -> \"{}\";\n", lib.name, dep));
        }
    }
    out.push_str("}\n");
    out
}

/// Render and write the digraph to `path`.
pub fn write_dot(registry: &Registry, edges: DotEdges, path: &Path) -> Result<(), DepgraphError> {
    std::fs::write(path, dot_string(registry, edges))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_edge_per_dependency() {
        let mut registry = Registry::new();
        registry.get("a").deps.extend(["b".to_string(), "c".to_string()]);
        registry.get("b").deps.insert("c".to_string());
        registry.get("c");

        let dot = dot_string(&registry, DotEdges::Build);
        assert!(dot.starts_with("digraph G {"));
        assert!(dot.contains("\"a\" -> \"b\";"));
        assert!(dot.contains("\"a\" -> \"c\";"));
        assert!(dot.contains("\"b\" -> \"c\";"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn raw_and_build_edge_sets_render_independently() {
        let mut registry = Registry::new();
        registry.get("a").raw_include_deps.insert("b".to_string());
        registry.get("b");

        assert!(dot_string(&registry, DotEdges::RawIncludes).contains("\"a\" -> \"b\";"));
        assert!(!dot_string(&registry, DotEdges::Build).contains("->"));
    }
}
