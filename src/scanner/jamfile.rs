//! Build-descriptor edge extraction.
//!
//! A component that requires building carries a `build/` directory with a
//! Jamfile (`Jamfile.v2` preferred over `Jamfile`). Library references in
//! Jamfiles come in several syntactic shapes; four alternative patterns are
//! tried in fixed priority order per match, and scanning consumes the text
//! until no pattern matches what remains:
//!
//! 1. `<library>/boost/<name>//boost_<target>`
//! 2. `/boost//<name>`
//! 3. `/build//boost_<name>`
//! 4. `<library>...//boost_<name>`
//!
//! Each captured short name becomes a raw build edge. A missing descriptor
//! for a building component is a warning and simply yields no edges.

use std::path::Path;

use regex::Regex;
use tracing::{debug, warn};

use crate::registry::{Registry, normalize};

/// The descriptor filenames recognized inside `build/`, in priority order.
const DESCRIPTOR_NAMES: [&str; 2] = ["Jamfile.v2", "Jamfile"];

/// Compiled Jamfile library-reference matchers for one collection prefix.
pub struct JamfileScanner {
    patterns: Vec<Regex>,
}

impl JamfileScanner {
    /// Build the four matchers for a collection prefix (e.g. `boost`).
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let p = regex::escape(prefix);
        let patterns = vec![
            Regex::new(&format!(r"<library>\s*?/{p}/([^/]*?)//{p}_\w+"))?,
            Regex::new(&format!(r"/{p}//(\w+)"))?,
            Regex::new(&format!(r"/build//{p}_(\w+)"))?,
            Regex::new(&format!(r"<library>.*?//{p}_(\w+)"))?,
        ];
        Ok(Self { patterns })
    }

    /// Extract referenced library short names from descriptor text.
    ///
    /// Per iteration the patterns are tried in priority order and the first
    /// one that matches anywhere in the unconsumed text wins; the text up
    /// to and including that match is then consumed.
    #[must_use]
    pub fn referenced_libraries(&self, text: &str) -> Vec<String> {
        let mut names = Vec::new();
        let mut rest = text;
        loop {
            let Some(caps) = self.patterns.iter().find_map(|pattern| pattern.captures(rest))
            else {
                break;
            };
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            names.push(name.as_str().to_string());
            rest = &rest[whole.end()..];
        }
        names
    }

    /// Record raw build edges for every component that requires building.
    pub fn scan_build_descriptors(&self, registry: &mut Registry, root: &Path) {
        for name in registry.names() {
            let requires_building = registry.lookup(&name).is_some_and(|lib| lib.build_required);
            if !requires_building {
                continue;
            }

            let build_dir = root.join(&name).join("build");
            let Some(text) = DESCRIPTOR_NAMES
                .iter()
                .map(|descriptor| build_dir.join(descriptor))
                .find(|path| path.is_file())
                .and_then(|path| std::fs::read_to_string(&path).ok())
            else {
                warn!(component = %name, "no build descriptor found");
                continue;
            };

            for short_name in self.referenced_libraries(&text) {
                let canonical = normalize(&short_name);
                registry.get(&canonical);
                registry.get(&name).raw_build_deps.insert(canonical.clone());
                debug!(component = %name, dep = %canonical, "build descriptor edge");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scanner() -> JamfileScanner {
        JamfileScanner::new("boost").unwrap()
    }

    #[test]
    fn matches_all_four_reference_shapes() {
        let text = r"
lib boost_x : : <library>/boost/filesystem//boost_filesystem ;
requirements /boost//headers ;
uses /build//boost_system ;
also <library>ignored//boost_chrono ;
";
        let refs = scanner().referenced_libraries(text);
        assert_eq!(refs, vec!["filesystem", "headers", "system", "chrono"]);
    }

    #[test]
    fn priority_order_prefers_the_explicit_library_form() {
        // Both pattern 1 and pattern 4 match this text; the explicit form
        // wins and captures the path component, not the target suffix.
        let text = "<library>/boost/date_time//boost_thread";
        let refs = scanner().referenced_libraries(text);
        assert_eq!(refs, vec!["date_time"]);
    }

    #[test]
    fn no_matches_yields_no_edges() {
        assert!(scanner().referenced_libraries("exe tool : main.cpp ;").is_empty());
    }

    #[test]
    fn missing_descriptor_is_a_warning_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("thing/build")).unwrap();

        let mut registry = Registry::new();
        registry.get("thing").build_required = true;

        scanner().scan_build_descriptors(&mut registry, dir.path());
        assert!(registry.lookup("thing").unwrap().raw_build_deps.is_empty());
    }

    #[test]
    fn jamfile_v2_takes_priority() {
        let dir = tempfile::tempdir().unwrap();
        let build = dir.path().join("thing/build");
        std::fs::create_dir_all(&build).unwrap();
        std::fs::write(build.join("Jamfile.v2"), "/boost//good ;").unwrap();
        std::fs::write(build.join("Jamfile"), "/boost//stale ;").unwrap();

        let mut registry = Registry::new();
        registry.get("thing").build_required = true;

        scanner().scan_build_descriptors(&mut registry, dir.path());
        let deps: Vec<_> =
            registry.lookup("thing").unwrap().raw_build_deps.iter().cloned().collect();
        assert_eq!(deps, vec!["good"]);
    }
}
