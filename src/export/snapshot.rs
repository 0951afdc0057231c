//! JSON registry snapshots.
//!
//! Two snapshots are written per scan: `initial.json` right after raw-edge
//! construction (the raw include map, for inspection) and `processed.json`
//! after classification and reduction. The processed snapshot carries the
//! full classified state — build/header-only sets and the build flag — so
//! a later `render` run can reproduce every export artifact without
//! rescanning the source tree. That is the extent of the recovery model:
//! batch runs either complete or are restarted from a snapshot.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::DepgraphError;
use crate::registry::Registry;

/// Serialized form of one component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    /// Whether the component requires building.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub build_required: bool,
    /// Build-time dependencies.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub deps: BTreeSet<String>,
    /// Header-only dependencies.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub header_only_deps: BTreeSet<String>,
}

/// Snapshot of the whole registry, keyed by canonical name.
pub type RegistrySnapshot = BTreeMap<String, LibrarySnapshot>;

/// Write the raw include map (pre-classification state).
pub fn write_raw(registry: &Registry, path: &Path) -> Result<(), DepgraphError> {
    let snapshot: RegistrySnapshot = registry
        .iter()
        .map(|lib| {
            (
                lib.name.clone(),
                LibrarySnapshot {
                    build_required: lib.build_required,
                    deps: lib.raw_include_deps.clone(),
                    header_only_deps: BTreeSet::new(),
                },
            )
        })
        .collect();
    write(&snapshot, path)
}

/// Write the classified, reduced state.
pub fn write_processed(registry: &Registry, path: &Path) -> Result<(), DepgraphError> {
    let snapshot: RegistrySnapshot = registry
        .iter()
        .map(|lib| {
            (
                lib.name.clone(),
                LibrarySnapshot {
                    build_required: lib.build_required,
                    deps: lib.deps.clone(),
                    header_only_deps: lib.header_only_deps.clone(),
                },
            )
        })
        .collect();
    write(&snapshot, path)
}

fn write(snapshot: &RegistrySnapshot, path: &Path) -> Result<(), DepgraphError> {
    let text = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Restore a registry from a processed snapshot.
pub fn read(path: &Path) -> Result<Registry, DepgraphError> {
    let text = std::fs::read_to_string(path).map_err(|err| DepgraphError::SnapshotLoad {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    let snapshot: RegistrySnapshot =
        serde_json::from_str(&text).map_err(|err| DepgraphError::SnapshotLoad {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;

    let mut registry = Registry::new();
    for (name, entry) in snapshot {
        // Dependency targets get records too, matching scan behavior.
        for dep in entry.deps.iter().chain(&entry.header_only_deps) {
            registry.get(dep);
        }
        let lib = registry.get(&name);
        lib.build_required = entry.build_required;
        lib.deps = entry.deps;
        lib.header_only_deps = entry.header_only_deps;
    }
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_snapshot_round_trips() {
        let mut registry = Registry::new();
        let t = registry.get("thread");
        t.build_required = true;
        t.deps.insert("system".to_string());
        t.header_only_deps.insert("config".to_string());
        registry.get("system").build_required = true;
        registry.get("config");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("processed.json");
        write_processed(&registry, &path).unwrap();

        let restored = read(&path).unwrap();
        assert_eq!(restored.names(), registry.names());
        let t = restored.lookup("thread").unwrap();
        assert!(t.build_required);
        assert!(t.deps.contains("system"));
        assert!(t.header_only_deps.contains("config"));
    }

    #[test]
    fn raw_snapshot_serializes_include_edges() {
        let mut registry = Registry::new();
        registry.get("a").raw_include_deps.insert("b".to_string());
        registry.get("b");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("initial.json");
        write_raw(&registry, &path).unwrap();

        let restored = read(&path).unwrap();
        assert!(restored.lookup("a").unwrap().deps.contains("b"));
    }

    #[test]
    fn unknown_dependency_targets_get_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, r#"{"a": {"deps": ["phantom"]}}"#).unwrap();

        let restored = read(&path).unwrap();
        assert!(restored.lookup("phantom").is_some());
    }

    #[test]
    fn broken_snapshot_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(read(&path), Err(DepgraphError::SnapshotLoad { .. })));
    }
}
