//! Package-manifest rendering for the external packaging system.
//!
//! The exporter reads the final registry and produces YAML manifests:
//!
//! - one aggregate document (`packages.yml`) with a `projects` map holding
//!   every component under the configured root project namespace;
//! - per component, a standalone project file under `single/` and a
//!   root-wrapped file under `root/` (the aggregate header plus just that
//!   project), both keyed by display name.
//!
//! Build dependencies are declared as full link dependencies; header-only
//! dependencies — and build dependencies of a header-only component that
//! themselves require building — are marked `include_directories_only`.
//! Built components get the static/shared preprocessor-definition options
//! the packaging system expects; everything else is `header_only: true`.
//!
//! An optional insertions file (a YAML map of display name → project
//! fragment) seeds the `projects` map, and a component whose display name
//! appears there extends its fragment instead of starting empty. A missing
//! commit for a component is a warning; the manifest is still written.

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::core::DepgraphError;
use crate::registry::{Library, Registry};
use crate::revisions::RevisionMap;

/// Aggregate manifest filename.
pub const AGGREGATE_FILE: &str = "packages.yml";

/// Renders the final registry to packaging manifests.
pub struct ManifestExporter<'a> {
    registry: &'a Registry,
    config: &'a RunConfig,
    revisions: &'a RevisionMap,
    version: &'a str,
    inserts: Mapping,
}

fn val(s: impl Into<String>) -> Value {
    Value::String(s.into())
}

fn push(map: &mut Mapping, key: &str, item: Value) {
    match map.entry(val(key)).or_insert_with(|| Value::Sequence(Vec::new())) {
        Value::Sequence(seq) => seq.push(item),
        other => *other = Value::Sequence(vec![item]),
    }
}

impl<'a> ManifestExporter<'a> {
    /// Create an exporter over the final registry state.
    pub fn new(
        registry: &'a Registry,
        config: &'a RunConfig,
        revisions: &'a RevisionMap,
        version: &'a str,
    ) -> Self {
        Self { registry, config, revisions, version, inserts: Mapping::new() }
    }

    /// Load manifest insertions from a YAML file.
    pub fn with_inserts(mut self, path: &Path) -> Result<Self, DepgraphError> {
        let text = std::fs::read_to_string(path)?;
        let value: Value = serde_yaml::from_str(&text)?;
        if let Value::Mapping(map) = value {
            self.inserts = map;
        } else {
            warn!(file = %path.display(), "insertions file is not a mapping, ignoring");
        }
        Ok(self)
    }

    /// Write the aggregate manifest plus the per-component `single/` and
    /// `root/` documents under `out_dir`.
    pub fn write(&self, out_dir: &Path) -> Result<(), DepgraphError> {
        std::fs::create_dir_all(out_dir.join("single"))?;
        std::fs::create_dir_all(out_dir.join("root"))?;

        let root_header = self.root_header();
        let mut projects = Mapping::new();
        for (key, fragment) in &self.inserts {
            if let Some(key) = key.as_str() {
                projects.insert(val(self.qualified(key)), fragment.clone());
            }
        }

        for lib in self.registry.iter() {
            let display = self.config.display_name(&lib.name);
            let qualified = self.qualified(&display);
            let seeded = projects.get(&val(qualified.clone())).cloned();
            let project = self.project_for(lib, &display, seeded, &projects);

            let single_path = out_dir.join("single").join(format!("{display}.yml"));
            let mut single = project.clone();
            single.insert(val("version"), val(self.version));
            std::fs::write(&single_path, serde_yaml::to_string(&Value::Mapping(single))?)?;

            let mut wrapped_projects = Mapping::new();
            wrapped_projects.insert(val(qualified.clone()), Value::Mapping(project.clone()));
            let mut wrapped = root_header.clone();
            wrapped.insert(val("projects"), Value::Mapping(wrapped_projects));
            let root_path = out_dir.join("root").join(format!("{display}.yml"));
            std::fs::write(&root_path, serde_yaml::to_string(&Value::Mapping(wrapped))?)?;

            projects.insert(val(qualified), Value::Mapping(project));
        }

        let mut aggregate = root_header;
        aggregate.insert(val("projects"), Value::Mapping(projects));
        let path = out_dir.join(AGGREGATE_FILE);
        std::fs::write(&path, serde_yaml::to_string(&Value::Mapping(aggregate))?)?;
        info!(manifest = %path.display(), components = self.registry.len(), "manifests written");
        Ok(())
    }

    fn qualified(&self, display: &str) -> String {
        format!("{}.{}", self.config.root_project, display)
    }

    fn root_header(&self) -> Mapping {
        let mut source = Mapping::new();
        source.insert(val("git"), val(self.config.url_base.clone()));
        let mut header = Mapping::new();
        header.insert(val("source"), Value::Mapping(source));
        header.insert(val("version"), val(self.version));
        header.insert(val("root_project"), val(self.config.root_project.clone()));
        header
    }

    fn project_for(
        &self,
        lib: &Library,
        display: &str,
        seeded: Option<Value>,
        earlier: &Mapping,
    ) -> Mapping {
        let mut project = match seeded {
            Some(Value::Mapping(map)) => map,
            _ => Mapping::new(),
        };
        project.insert(val("type"), val("library"));

        let commit = self.revisions.commit_for(&lib.name).unwrap_or_else(|| {
            warn!(component = %lib.name, "no commit for component");
            ""
        });
        let mut source = Mapping::new();
        source.insert(val("git"), val(self.config.repo_url(&lib.name)));
        source.insert(val("commit"), val(commit));
        project.insert(val("source"), Value::Mapping(source));

        // Some components ship from another component's repository.
        if let Some(origin) = self.config.source_aliases.get(display)
            && let Some(Value::Mapping(origin_project)) = earlier.get(&val(self.qualified(origin)))
            && let Some(origin_source) = origin_project.get(&val("source"))
        {
            project.insert(val("source"), origin_source.clone());
        }

        if !project.contains_key(&val("files")) {
            push(&mut project, "files", val("include/.*"));
            if lib.build_required {
                push(&mut project, "files", val("src/.*"));
            }
        }

        let mut include_dirs = Mapping::new();
        push(&mut include_dirs, "public", val("include"));
        if lib.build_required {
            push(&mut include_dirs, "private", val("src"));
        }
        project.insert(val("include_directories"), Value::Mapping(include_dirs));

        let mut dependencies: Vec<Value> = Vec::new();
        for dep in &lib.deps {
            let dep_builds = self.registry.lookup(dep).is_some_and(|d| d.build_required);
            let dep_display = self.config.display_name(dep);
            // A header-only component cannot link its built dependencies;
            // it only needs their include paths.
            let include_only = !lib.build_required && dep_builds;
            dependencies.push(self.dep_entry(&dep_display, include_only));
        }
        for dep in &lib.header_only_deps {
            dependencies.push(self.dep_entry(&self.config.display_name(dep), true));
        }
        if !dependencies.is_empty() {
            project.insert(val("dependencies"), Value::Sequence(dependencies));
        }

        if lib.build_required {
            project.insert(val("options"), Value::Mapping(self.options_for(display)));
        } else {
            project.insert(val("header_only"), Value::Bool(true));
        }

        project
    }

    fn dep_entry(&self, display: &str, include_only: bool) -> Value {
        if include_only {
            let mut entry = Mapping::new();
            entry.insert(val("name"), val(self.qualified(display)));
            entry.insert(val("include_directories_only"), Value::Bool(true));
            Value::Mapping(entry)
        } else {
            val(self.qualified(display))
        }
    }

    fn options_for(&self, display: &str) -> Mapping {
        let prefix = &self.config.definition_prefix;
        let tag = display.to_uppercase();
        let definitions = |groups: &[(&str, Vec<String>)]| {
            let mut defs = Mapping::new();
            for (visibility, values) in groups {
                for value in values {
                    push(&mut defs, visibility, val(value.clone()));
                }
            }
            let mut wrapper = Mapping::new();
            wrapper.insert(val("definitions"), Value::Mapping(defs));
            wrapper
        };

        let mut options = Mapping::new();
        options.insert(
            val("static"),
            Value::Mapping(definitions(&[(
                "public",
                vec![
                    format!("{prefix}{tag}_STATIC_LINK"),
                    format!("{prefix}ALL_STATIC_LINK"),
                    format!("{prefix}{tag}_BUILD_LIB"),
                ],
            )])),
        );
        options.insert(
            val("shared"),
            Value::Mapping(definitions(&[
                (
                    "public",
                    vec![
                        format!("{prefix}{tag}_DYN_LINK"),
                        format!("{prefix}ALL_DYN_LINK"),
                        format!("{prefix}{tag}_USE_DLL"),
                    ],
                ),
                ("private", vec![format!("{prefix}{tag}_BUILD_DLL")]),
            ])),
        );
        options.insert(
            val("any"),
            Value::Mapping(definitions(&[(
                "private",
                vec![format!("{prefix}{tag}_SOURCE"), format!("{prefix}{tag}_BUILDING_THE_LIB")],
            )])),
        );
        options
    }
}
