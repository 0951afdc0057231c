//! Transitive closure over the raw include-dependency relation.
//!
//! The classifier seeds each component's header-only set with the full set
//! of components transitively reachable through include edges. The closure
//! walk is a plain iterative depth-first accumulation: it is bounded by
//! visited-set membership rather than recursion depth, so a pathological
//! include cycle terminates the call instead of overflowing the stack. The
//! walk itself does not reject cycles — a component on a cycle reaches
//! itself transiently, and is excluded from its own result at the end.

use std::collections::BTreeSet;

use crate::registry::{Registry, normalize};

/// Compute the set of components transitively reachable from `start` via
/// `raw_include_deps`. The starting component is excluded from the result.
#[must_use]
pub fn include_closure(registry: &Registry, start: &str) -> BTreeSet<String> {
    let start = normalize(start);
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut stack: Vec<String> = match registry.lookup(&start) {
        Some(lib) => lib.raw_include_deps.iter().cloned().collect(),
        None => return visited,
    };

    while let Some(current) = stack.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if let Some(lib) = registry.lookup(&current) {
            for dep in &lib.raw_include_deps {
                if !visited.contains(dep) {
                    stack.push(dep.clone());
                }
            }
        }
    }

    visited.remove(&start);
    visited
}
