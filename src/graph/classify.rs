//! Dependency classification: raw edges into build vs. header-only sets.
//!
//! Runs once over the whole registry, after edge extraction and before
//! reduction:
//!
//! 1. For every component that requires building, the manually configured
//!    extra build dependencies (keyed by display name) are folded into its
//!    raw build edges.
//! 2. Each component's `header_only_deps` is seeded with the transitive
//!    closure of its raw include edges. This happens while `deps` is still
//!    untouched — the closure is defined over the include graph, not the
//!    build graph.
//! 3. `deps` becomes the raw build-edge set for building components, and
//!    stays empty otherwise.
//! 4. Every member of `deps` is removed from `header_only_deps`: a build
//!    dependency subsumes the corresponding header dependency.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use tracing::debug;

use crate::config::RunConfig;
use crate::graph::closure::include_closure;
use crate::registry::{Registry, normalize};

/// Partition every component's raw edges into `deps` and
/// `header_only_deps`. After this returns the two sets are disjoint for
/// every component.
pub fn classify(registry: &mut Registry, config: &RunConfig) {
    fold_extra_build_deps(registry, config);

    // Closures are computed up front against the untouched include graph,
    // then written back in a second sweep.
    let closures: BTreeMap<String, BTreeSet<String>> = registry
        .names()
        .into_iter()
        .map(|name| {
            let closure = include_closure(registry, &name);
            (name, closure)
        })
        .collect();

    for (name, closure) in closures {
        if let Some(lib) = registry.lookup_mut(&name) {
            lib.header_only_deps = closure;
            lib.deps = if lib.build_required {
                lib.raw_build_deps.clone()
            } else {
                BTreeSet::new()
            };
            let build: Vec<String> = lib.deps.iter().cloned().collect();
            for dep in &build {
                lib.header_only_deps.remove(dep);
            }
            debug!(
                component = %name,
                build = lib.deps.len(),
                header_only = lib.header_only_deps.len(),
                "classified"
            );
        }
    }
}

/// Union configured extra build dependencies into the raw build edges of
/// building components. Targets unseen so far get empty records created,
/// the same way build-descriptor scanning introduces them.
fn fold_extra_build_deps(registry: &mut Registry, config: &RunConfig) {
    for name in registry.names() {
        let requires_building = registry.lookup(&name).is_some_and(|lib| lib.build_required);
        if !requires_building {
            continue;
        }
        let display = config.display_name(&name);
        let Some(extras) = config.extra_build_deps.get(&display) else {
            continue;
        };
        for extra in extras.clone() {
            let canonical = normalize(&extra);
            registry.get(&canonical);
            registry.get(&name).raw_build_deps.insert(canonical.clone());
            debug!(component = %name, dep = %canonical, "declared extra build dependency");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RunConfig {
        RunConfig::default()
    }

    #[test]
    fn build_vs_header_split() {
        // t requires building, include closure {u, v}, build descriptor
        // declares {u}: expect deps = {u}, header_only = {v}.
        let mut registry = Registry::new();
        let t = registry.get("t");
        t.build_required = true;
        t.raw_include_deps.extend(["u".to_string(), "v".to_string()]);
        t.raw_build_deps.insert("u".to_string());
        registry.get("u");
        registry.get("v");

        classify(&mut registry, &config());

        let t = registry.lookup("t").unwrap();
        assert_eq!(t.deps.iter().cloned().collect::<Vec<_>>(), vec!["u"]);
        assert_eq!(t.header_only_deps.iter().cloned().collect::<Vec<_>>(), vec!["v"]);
    }

    #[test]
    fn header_only_component_keeps_empty_deps() {
        let mut registry = Registry::new();
        let lib = registry.get("headeronly");
        lib.raw_include_deps.insert("base".to_string());
        // Build edges recorded by mistake must not leak into deps.
        lib.raw_build_deps.insert("base".to_string());
        registry.get("base");

        classify(&mut registry, &config());

        let lib = registry.lookup("headeronly").unwrap();
        assert!(lib.deps.is_empty());
        assert!(lib.header_only_deps.contains("base"));
    }

    #[test]
    fn header_only_set_is_the_include_closure() {
        let mut registry = Registry::new();
        registry.get("a").raw_include_deps.insert("b".to_string());
        registry.get("b").raw_include_deps.insert("c".to_string());
        registry.get("c");

        classify(&mut registry, &config());

        let a = registry.lookup("a").unwrap();
        assert!(a.header_only_deps.contains("b"));
        assert!(a.header_only_deps.contains("c"));
    }

    #[test]
    fn extra_build_deps_fold_into_building_components() {
        let mut registry = Registry::new();
        let thread = registry.get("thread");
        thread.build_required = true;
        thread.raw_include_deps.insert("date_time".to_string());
        registry.get("date_time");

        classify(&mut registry, &config());

        let thread = registry.lookup("thread").unwrap();
        assert!(thread.deps.contains("date_time"));
        // Subsumed by the build dependency.
        assert!(!thread.header_only_deps.contains("date_time"));
    }

    #[test]
    fn extra_build_deps_ignore_header_only_components() {
        let mut registry = Registry::new();
        registry.get("thread"); // not build_required here
        classify(&mut registry, &config());
        assert!(registry.lookup("thread").unwrap().deps.is_empty());
    }

    #[test]
    fn deps_and_header_only_are_disjoint() {
        let mut registry = Registry::new();
        let lib = registry.get("t");
        lib.build_required = true;
        lib.raw_include_deps.extend(["u".to_string(), "v".to_string(), "w".to_string()]);
        lib.raw_build_deps.extend(["u".to_string(), "w".to_string()]);
        for name in ["u", "v", "w"] {
            registry.get(name);
        }

        classify(&mut registry, &config());

        let lib = registry.lookup("t").unwrap();
        assert!(lib.deps.is_disjoint(&lib.header_only_deps));
    }
}
