//! Source-tree discovery and raw edge extraction.
//!
//! The scanner turns a collection's source tree into the registry's raw
//! state. It is the only stage that touches the filesystem:
//!
//! 1. **Discovery** — one component per immediate subdirectory of the root,
//!    plus the immediate subdirectories of the designated grouping
//!    namespace (whose own empty placeholder entry is discarded). A
//!    component owns every regular file under its `include/` and `src/`
//!    subtrees, and requires building iff it has both a `src/` subtree and
//!    a `build/` descriptor directory.
//! 2. **File index** — include-path (relative to the owning component's
//!    `include/` directory) → component. A duplicate mapping is reported
//!    and the last writer wins.
//! 3. **Build-descriptor edges** — see [`jamfile`].
//! 4. **Include edges** — see [`includes`].
//! 5. **Self-loop stripping** — the very last step of raw-edge
//!    construction removes each component from its own raw sets.
//!
//! Extraction problems (an include that resolves to no component, a
//! missing build descriptor) are warnings, never errors: the graph stages
//! downstream always receive a structurally valid, if logically
//! incomplete, edge set. Only an unreadable root aborts.

pub mod includes;
pub mod jamfile;

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::RunConfig;
use crate::core::DepgraphError;
use crate::registry::Registry;

/// Populate the registry from the source tree at `root`.
pub fn scan_tree(
    registry: &mut Registry,
    config: &RunConfig,
    root: &Path,
) -> Result<(), DepgraphError> {
    if !root.is_dir() {
        return Err(DepgraphError::RootDirNotFound { path: root.display().to_string() });
    }

    discover_components(registry, root, None)?;
    discover_components(registry, root, Some(&config.namespace_dir))?;
    // The grouping directory itself is an empty placeholder, not a component.
    registry.remove(&config.namespace_dir);

    let index = build_file_index(registry, root);

    let jamfiles = jamfile::JamfileScanner::new(&config.include_prefix)?;
    jamfiles.scan_build_descriptors(registry, root);

    let include_scanner = includes::IncludeScanner::new(&config.include_prefix)?;
    include_scanner.extract_edges(registry, &index);

    strip_self_loops(registry);
    Ok(())
}

/// Register one component per immediate subdirectory of `root` (or of
/// `root/<namespace>` when given, qualifying names with the namespace).
fn discover_components(
    registry: &mut Registry,
    root: &Path,
    namespace: Option<&str>,
) -> Result<(), DepgraphError> {
    let dir = match namespace {
        Some(ns) => root.join(ns),
        None => root.to_path_buf(),
    };
    if namespace.is_some() && !dir.is_dir() {
        // Collections without a grouping namespace are fine.
        return Ok(());
    }

    let mut entries: Vec<_> =
        std::fs::read_dir(&dir)?.collect::<Result<Vec<_>, std::io::Error>>()?;
    entries.sort_by_key(std::fs::DirEntry::file_name);

    for entry in entries {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        let name = match namespace {
            Some(ns) => format!("{ns}/{dir_name}"),
            None => dir_name,
        };
        debug!(component = %name, "listing component dir");

        let has_build = path.join("build").is_dir();
        let lib = registry.get(&name);
        for subtree in ["include", "src"] {
            let subdir = path.join(subtree);
            if !subdir.is_dir() {
                continue;
            }
            if subtree == "src" && has_build {
                lib.build_required = true;
            }
            for file in WalkDir::new(&subdir) {
                match file {
                    Ok(file) if file.file_type().is_file() => {
                        lib.files.insert(file.into_path());
                    }
                    Ok(_) => {}
                    Err(err) => warn!(component = %lib.name, error = %err, "skipping entry"),
                }
            }
        }
    }
    Ok(())
}

/// Map every indexed header path to its owning component.
///
/// Keys are paths relative to the owner's `include/` directory with `/`
/// separators, which is exactly the form include statements use. Files
/// under `src/` are private and never indexed.
fn build_file_index(registry: &Registry, root: &Path) -> BTreeMap<String, String> {
    let mut index = BTreeMap::new();
    for lib in registry.iter() {
        let include_root = root.join(&lib.name).join("include");
        for file in &lib.files {
            let Ok(rel) = file.strip_prefix(&include_root) else {
                continue;
            };
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if let Some(previous) = index.insert(key.clone(), lib.name.clone())
                && previous != lib.name
            {
                warn!(file = %key, %previous, now = %lib.name, "duplicate file-to-component mapping");
            }
        }
    }
    index
}

/// Remove each component from its own raw edge sets. Runs as the very last
/// step of raw-edge construction; genuine multi-node cycles are left for
/// the acyclicity check.
fn strip_self_loops(registry: &mut Registry) {
    for name in registry.names() {
        if let Some(lib) = registry.lookup_mut(&name) {
            lib.raw_include_deps.remove(&name);
            lib.raw_build_deps.remove(&name);
        }
    }
}
