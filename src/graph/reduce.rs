//! Transitive reduction of per-component dependency sets.
//!
//! This is the algorithmic heart of the tool. Given a component's dependency
//! set `D`, the reducer removes every `d2 ∈ D` that is reachable from some
//! other `d1 ∈ D` through `d1`'s own edges of the relation being reduced, so
//! that the final graph contains only the dependencies a component must
//! declare directly.
//!
//! # Containment notions
//!
//! Two reachability depths are offered; running [`Depth::Full`] subsumes
//! [`Depth::Simple`]:
//!
//! - **Simple**: `d1` contains `d2` iff `d2` is a direct member of `d1`'s
//!   dependency set (one hop).
//! - **Full**: recursive reachability over the dependency relation, guarded
//!   by an explicit visited set so a cycle terminates the search instead of
//!   the process. A node already on the search path is treated as
//!   non-containing, not re-explored.
//!
//! # Fixed-point scan
//!
//! Per component, ordered pairs `(d1, d2)` over the current set are scanned
//! in sorted-name order. Pairs are skipped when `d1 == d2`, when `d1` has an
//! empty dependency set (it cannot contain anything), or when the pair was
//! already proven non-containing in this pass (negative-result cache). On a
//! containing pair, `d2` is removed and the scan restarts from scratch; a
//! full scan with no removal means the component is stable. The cache is
//! scoped to one reduction of one component and never invalidated mid-pass:
//! dependency sets only shrink during reduction, so a proven negative stays
//! negative.
//!
//! The sweep visits components in registry (canonical-name) order exactly
//! once; all dependency sets must be fully populated before it starts. The
//! reducer only ever removes edges. On an acyclic graph the reduced edge set
//! is unique, so the scan order affects which redundant edge goes first but
//! never the fixed point. Genuine cycles in the raw graph make reduction
//! ill-defined and are rejected upstream (see [`crate::graph::cycles`]).

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::registry::{Library, Registry};

/// Which per-component dependency set a reduction pass operates on.
///
/// Containment is always evaluated through the same relation that is being
/// reduced: build edges through build edges, header-only edges through
/// header-only edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `deps` — build-time (link) dependencies.
    Build,
    /// `header_only_deps` — include-path-only dependencies.
    HeaderOnly,
}

impl Relation {
    fn edges<'a>(self, lib: &'a Library) -> &'a BTreeSet<String> {
        match self {
            Self::Build => &lib.deps,
            Self::HeaderOnly => &lib.header_only_deps,
        }
    }

    fn edges_mut(self, lib: &mut Library) -> &mut BTreeSet<String> {
        match self {
            Self::Build => &mut lib.deps,
            Self::HeaderOnly => &mut lib.header_only_deps,
        }
    }
}

/// Reachability depth used by a reduction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// One-hop membership only.
    Simple,
    /// Depth-first reachability, cycle-safe.
    Full,
}

/// Does `from` contain `target` directly (one hop) through `relation`?
fn contains_simple(registry: &Registry, relation: Relation, from: &str, target: &str) -> bool {
    registry.lookup(from).is_some_and(|lib| relation.edges(lib).contains(target))
}

/// Does `from` reach `target` through `relation`, at any depth?
///
/// `origin` is the component being reduced; it is seeded into the visited
/// set so paths that run back through the component itself never count as
/// containment. Iterative so termination depends only on the visited set.
fn contains(
    registry: &Registry,
    relation: Relation,
    origin: &str,
    from: &str,
    target: &str,
) -> bool {
    let mut visited: BTreeSet<&str> = BTreeSet::new();
    visited.insert(origin);
    let mut stack: Vec<&str> = vec![from];

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        if let Some(lib) = registry.lookup(current) {
            let edges = relation.edges(lib);
            if edges.contains(target) {
                return true;
            }
            for dep in edges {
                if !visited.contains(dep.as_str()) {
                    stack.push(dep);
                }
            }
        }
    }
    false
}

/// Reduce one component's set of `relation` edges to a fixed point.
///
/// Returns the surviving edge set; the registry is not mutated. Absence of a
/// containing relationship is a normal boolean outcome, never an error, and
/// a missing or empty set reduces to itself.
#[must_use]
pub fn reduce_component(
    registry: &Registry,
    name: &str,
    relation: Relation,
    depth: Depth,
) -> BTreeSet<String> {
    let mut edges: BTreeSet<String> = match registry.lookup(name) {
        Some(lib) => relation.edges(lib).clone(),
        None => return BTreeSet::new(),
    };

    // Negative-result cache for this component's pass. Edges only shrink,
    // so a proven non-containing pair stays non-containing.
    let mut fails: BTreeSet<(String, String)> = BTreeSet::new();

    'rescan: loop {
        let candidates: Vec<String> = edges.iter().cloned().collect();
        for d1 in &candidates {
            let d1_can_contain =
                registry.lookup(d1).is_some_and(|lib| !relation.edges(lib).is_empty());
            if !d1_can_contain {
                continue;
            }
            for d2 in &candidates {
                if d1 == d2 || fails.contains(&(d1.clone(), d2.clone())) {
                    continue;
                }
                let reachable = match depth {
                    Depth::Simple => contains_simple(registry, relation, d1, d2),
                    Depth::Full => contains(registry, relation, name, d1, d2),
                };
                if reachable {
                    trace!(component = name, via = %d1, removed = %d2, "redundant edge");
                    edges.remove(d2);
                    continue 'rescan;
                }
                fails.insert((d1.clone(), d2.clone()));
            }
        }
        break;
    }

    edges
}

/// Sweep the whole registry once, reducing `relation` for every component
/// in canonical-name order.
///
/// Components stabilized earlier in the sweep are visible, already reduced,
/// to later ones; reduction preserves reachability, so the outcome is the
/// same either way. All dependency sets must be populated before calling —
/// there is no cross-component revisitation.
pub fn reduce_all(registry: &mut Registry, relation: Relation, depth: Depth) {
    for name in registry.names() {
        let before = registry.lookup(&name).map_or(0, |lib| relation.edges(lib).len());
        let reduced = reduce_component(registry, &name, relation, depth);
        debug!(
            component = %name,
            relation = ?relation,
            kept = reduced.len(),
            dropped = before - reduced.len(),
            "reduced"
        );
        if let Some(lib) = registry.lookup_mut(&name) {
            *relation.edges_mut(lib) = reduced;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(edges: &[(&str, &[&str])]) -> Registry {
        let mut registry = Registry::new();
        for (name, deps) in edges {
            let lib = registry.get(name);
            for dep in *deps {
                lib.deps.insert((*dep).to_string());
            }
        }
        registry
    }

    fn deps(registry: &Registry, name: &str) -> Vec<String> {
        registry.lookup(name).map(|lib| lib.deps.iter().cloned().collect()).unwrap_or_default()
    }

    #[test]
    fn diamond_drops_the_far_corner() {
        // a -> {b, c, d}, b -> d, c -> d: d is reachable via either branch.
        let mut registry = registry_with(&[
            ("a", &["b", "c", "d"]),
            ("b", &["d"]),
            ("c", &["d"]),
            ("d", &[]),
        ]);
        reduce_all(&mut registry, Relation::Build, Depth::Full);
        assert_eq!(deps(&registry, "a"), vec!["b", "c"]);
        assert_eq!(deps(&registry, "b"), vec!["d"]);
        assert_eq!(deps(&registry, "c"), vec!["d"]);
    }

    #[test]
    fn chain_reduces_each_component_independently() {
        // a -> {b, d}, b -> c -> d. Full reachability drops d from a, but
        // b keeps c and c keeps d: reduction is per component, not global.
        let mut registry = registry_with(&[
            ("a", &["b", "d"]),
            ("b", &["c"]),
            ("c", &["d"]),
            ("d", &[]),
        ]);
        reduce_all(&mut registry, Relation::Build, Depth::Full);
        assert_eq!(deps(&registry, "a"), vec!["b"]);
        assert_eq!(deps(&registry, "b"), vec!["c"]);
        assert_eq!(deps(&registry, "c"), vec!["d"]);
    }

    #[test]
    fn simple_depth_only_sees_one_hop() {
        let mut registry = registry_with(&[
            ("a", &["b", "d"]),
            ("b", &["c"]),
            ("c", &["d"]),
            ("d", &[]),
        ]);
        reduce_all(&mut registry, Relation::Build, Depth::Simple);
        // d is two hops from b; the simple pass cannot see it.
        assert_eq!(deps(&registry, "a"), vec!["b", "d"]);
    }

    #[test]
    fn reduction_is_idempotent() {
        let mut registry = registry_with(&[
            ("a", &["b", "c", "d"]),
            ("b", &["c"]),
            ("c", &["d"]),
            ("d", &[]),
        ]);
        reduce_all(&mut registry, Relation::Build, Depth::Full);
        let first: Vec<_> = registry.iter().map(|lib| (lib.name.clone(), lib.deps.clone())).collect();
        reduce_all(&mut registry, Relation::Build, Depth::Full);
        let second: Vec<_> = registry.iter().map(|lib| (lib.name.clone(), lib.deps.clone())).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn reduction_is_sound() {
        // Every removed target must still be reachable from a surviving
        // dependency of the same component.
        let original = registry_with(&[
            ("a", &["b", "c", "d", "e"]),
            ("b", &["c", "e"]),
            ("c", &["d"]),
            ("d", &[]),
            ("e", &[]),
        ]);
        let mut registry = original.clone();
        reduce_all(&mut registry, Relation::Build, Depth::Full);

        for lib in original.iter() {
            let reduced = registry.lookup(&lib.name).map(|l| l.deps.clone()).unwrap_or_default();
            for removed in lib.deps.difference(&reduced) {
                let reachable = reduced.iter().any(|kept| {
                    contains(&registry, Relation::Build, &lib.name, kept, removed)
                });
                assert!(reachable, "{removed} was dropped from {} without a path", lib.name);
            }
        }
    }

    #[test]
    fn deterministic_across_runs() {
        let build = || {
            let mut registry = registry_with(&[
                ("m", &["a", "b", "c", "d", "e"]),
                ("a", &["c"]),
                ("b", &["c", "d"]),
                ("c", &["e"]),
                ("d", &["e"]),
                ("e", &[]),
            ]);
            reduce_all(&mut registry, Relation::Build, Depth::Full);
            registry.iter().map(|lib| (lib.name.clone(), lib.deps.clone())).collect::<Vec<_>>()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn empty_and_missing_sets_are_not_errors() {
        let mut registry = registry_with(&[("lonely", &[])]);
        reduce_all(&mut registry, Relation::Build, Depth::Full);
        assert!(deps(&registry, "lonely").is_empty());
        assert!(reduce_component(&registry, "ghost", Relation::Build, Depth::Full).is_empty());
    }

    #[test]
    fn containment_terminates_on_cycles() {
        // a <-> b plus an edge set referencing both: the search must
        // terminate. Reduction on cyclic input has no specified shape, so
        // this asserts termination only; cycles are rejected upstream.
        let mut registry = registry_with(&[("a", &["b"]), ("b", &["a"]), ("top", &["a", "b"])]);
        assert!(contains(&registry, Relation::Build, "top", "a", "b"));
        reduce_all(&mut registry, Relation::Build, Depth::Full);
    }

    #[test]
    fn header_only_relation_reduces_through_its_own_edges() {
        let mut registry = Registry::new();
        registry.get("a").header_only_deps.extend(["b".to_string(), "c".to_string()]);
        registry.get("b").header_only_deps.insert("c".to_string());
        registry.get("c");
        // Build edges are unrelated and must not be consulted.
        registry.get("a").deps.insert("x".to_string());
        registry.get("x");

        reduce_all(&mut registry, Relation::HeaderOnly, Depth::Full);
        let a = registry.lookup("a").unwrap();
        assert_eq!(a.header_only_deps.iter().cloned().collect::<Vec<_>>(), vec!["b"]);
        assert!(a.deps.contains("x"));
    }
}
