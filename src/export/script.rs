//! Build-script dependency listing.
//!
//! An alternative export consumed by build-script generators rather than
//! the manifest-driven packaging flow: two comma-joined quoted lists
//! splitting components into header-only and compiled, plus one
//! `add_public_dependency` call per final edge, flagging whether the edge
//! is include-path-only.

use std::path::Path;

use crate::config::RunConfig;
use crate::core::DepgraphError;
use crate::registry::Registry;

/// Output filenames, relative to the output directory.
pub const HEADER_ONLY_LIST: &str = "cpp_libs_header_only.txt";
/// Compiled-component list filename.
pub const COMPILED_LIST: &str = "cpp_libs_compiled.txt";
/// Dependency-call listing filename.
pub const DEPS_SCRIPT: &str = "cpp_deps.txt";

/// Write the three listing files under `out_dir`.
pub fn write_script(
    registry: &Registry,
    config: &RunConfig,
    out_dir: &Path,
) -> Result<(), DepgraphError> {
    let mut header_only = String::new();
    let mut compiled = String::new();
    let mut calls = String::new();

    for lib in registry.iter() {
        let display = config.display_name(&lib.name);
        if lib.build_required {
            compiled.push_str(&format!("\"{display}\","));
        } else {
            header_only.push_str(&format!("\"{display}\","));
        }

        for dep in &lib.deps {
            let dep_builds = registry.lookup(dep).is_some_and(|d| d.build_required);
            let include_only = !lib.build_required && dep_builds;
            calls.push_str(&format!(
                "add_public_dependency(\"{display}\", \"{}\", {include_only});\n",
                config.display_name(dep)
            ));
        }
        for dep in &lib.header_only_deps {
            calls.push_str(&format!(
                "add_public_dependency(\"{display}\", \"{}\", true);\n",
                config.display_name(dep)
            ));
        }
    }

    std::fs::write(out_dir.join(HEADER_ONLY_LIST), header_only)?;
    std::fs::write(out_dir.join(COMPILED_LIST), compiled)?;
    std::fs::write(out_dir.join(DEPS_SCRIPT), calls)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_components_and_lists_edges() {
        let mut registry = Registry::new();
        let thread = registry.get("thread");
        thread.build_required = true;
        thread.deps.insert("date_time".to_string());
        thread.header_only_deps.insert("config".to_string());
        registry.get("date_time").build_required = true;
        registry.get("config");

        let out = tempfile::tempdir().unwrap();
        write_script(&registry, &RunConfig::default(), out.path()).unwrap();

        let compiled = std::fs::read_to_string(out.path().join(COMPILED_LIST)).unwrap();
        assert!(compiled.contains("\"thread\","));
        assert!(compiled.contains("\"date_time\","));

        let header_only = std::fs::read_to_string(out.path().join(HEADER_ONLY_LIST)).unwrap();
        assert!(header_only.contains("\"config\","));
        assert!(!header_only.contains("thread"));

        let calls = std::fs::read_to_string(out.path().join(DEPS_SCRIPT)).unwrap();
        assert!(calls.contains("add_public_dependency(\"thread\", \"date_time\", false);"));
        assert!(calls.contains("add_public_dependency(\"thread\", \"config\", true);"));
    }
}
