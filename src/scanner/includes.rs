//! Include-statement edge extraction.
//!
//! Every file owned by a component is scanned for include statements that
//! name one of the collection's own headers. Each captured include path is
//! resolved through the global file index to the owning component, which
//! becomes a raw include edge. Resolution failures are a side-channel
//! warning, never an error: a missing target must not abort the run.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::{debug, warn};

use crate::registry::Registry;

/// Compiled include-statement matcher for one collection prefix.
pub struct IncludeScanner {
    pattern: Regex,
}

impl IncludeScanner {
    /// Build the matcher for headers under `prefix` (e.g. `boost`), which
    /// matches both `#include <prefix/...>` and `#include "prefix/..."`.
    pub fn new(prefix: &str) -> Result<Self, regex::Error> {
        let pattern =
            Regex::new(&format!(r#"#\s*include[^<"]*?[<"]({}/.*?)[>"]"#, regex::escape(prefix)))?;
        Ok(Self { pattern })
    }

    /// Capture the included paths in one file's text.
    pub fn included_paths<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> {
        self.pattern.captures_iter(text).filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }

    /// Scan every component's owned files and record raw include edges.
    pub fn extract_edges(&self, registry: &mut Registry, index: &BTreeMap<String, String>) {
        for name in registry.names() {
            debug!(component = %name, "scanning includes");
            let files = match registry.lookup(&name) {
                Some(lib) => lib.files.clone(),
                None => continue,
            };
            for file in files {
                let text = match std::fs::read(&file) {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(err) => {
                        warn!(file = %file.display(), error = %err, "cannot read file");
                        continue;
                    }
                };
                for include in self.included_paths(&text) {
                    match index.get(include) {
                        Some(owner) => {
                            let owner = owner.clone();
                            registry.get(&name).raw_include_deps.insert(owner);
                        }
                        None => {
                            warn!(component = %name, %include, "cannot resolve include target");
                        }
                    }
                }
            }
        }
    }
}
