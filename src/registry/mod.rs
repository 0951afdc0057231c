//! Library registry: the single source of truth for all discovered components.
//!
//! Every component of the scanned collection is represented by exactly one
//! [`Library`] record, keyed by its canonical lower-cased, slash-qualified
//! name (e.g. `filesystem`, `numeric/ublas`). All other stages of the
//! pipeline — edge extraction, classification, closure expansion, transitive
//! reduction, export — read and mutate records through the [`Registry`].
//!
//! The registry is an explicitly passed value owned by the run, never global
//! state, so individual stages can be unit tested against a handful of
//! fabricated records.
//!
//! # Identity and ordering
//!
//! Components are identified by value (the interned canonical name), and all
//! dependency sets are ordered [`BTreeSet`]s. Registry iteration is ordered
//! by canonical name. This makes every sweep over the registry, and every
//! scan over a component's dependencies, deterministic by construction —
//! a requirement of the reduction algorithm, whose final edge set must be a
//! function of the relation alone and not of map iteration order.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// One component of the library collection.
///
/// Created once during discovery (or restored from a snapshot), mutated in
/// place by classification and reduction, and read by the exporters. The
/// dependency sets hold canonical names of other registry entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Library {
    /// Canonical lower-cased, slash-qualified name. Unique registry key.
    pub name: String,
    /// True iff the component has a compiled `src/` subtree accompanied by a
    /// `build/` descriptor directory. Immutable once discovery completes.
    pub build_required: bool,
    /// Build-time (link) dependencies. After the pipeline finishes this
    /// holds only the edges that survived transitive reduction.
    pub deps: BTreeSet<String>,
    /// Header-visibility-only dependencies, disjoint from `deps` after
    /// classification, also reduced.
    pub header_only_deps: BTreeSet<String>,
    /// Unreduced dependency set derived purely from include scanning.
    pub raw_include_deps: BTreeSet<String>,
    /// Unreduced dependencies declared by the build descriptor. Only
    /// consulted when `build_required` is set.
    pub raw_build_deps: BTreeSet<String>,
    /// Files owned by this component, used only during edge extraction.
    pub files: BTreeSet<PathBuf>,
}

impl Library {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Mapping from canonical component name to its [`Library`] record.
///
/// Lookups and insertions are case-insensitive: names are normalized
/// (lower-cased) before keying. Creation is total — [`Registry::get`] never
/// fails, it creates an empty record on first sight of a name.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    libraries: BTreeMap<String, Library>,
}

/// Normalize a component name for use as a registry key.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the record for `name`, creating an empty one if absent.
    pub fn get(&mut self, name: &str) -> &mut Library {
        let key = normalize(name);
        self.libraries.entry(key.clone()).or_insert_with(|| Library::new(key))
    }

    /// Return the record for `name` without creating one.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Library> {
        self.libraries.get(&normalize(name))
    }

    /// Mutable variant of [`Registry::lookup`].
    pub fn lookup_mut(&mut self, name: &str) -> Option<&mut Library> {
        self.libraries.get_mut(&normalize(name))
    }

    /// Remove and return a record. Used to discard the grouping namespace's
    /// empty placeholder entry after discovery.
    pub fn remove(&mut self, name: &str) -> Option<Library> {
        self.libraries.remove(&normalize(name))
    }

    /// Iterate records in canonical-name order.
    pub fn iter(&self) -> impl Iterator<Item = &Library> {
        self.libraries.values()
    }

    /// All canonical names in order. Handy for sweeps that need to mutate
    /// records while consulting others.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.libraries.keys().cloned().collect()
    }

    /// Number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    /// Whether the registry holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }
}
