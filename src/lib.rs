//! depgraph - dependency graph generator for modular C++ library collections
//!
//! depgraph ingests the source tree of a Boost-style library collection
//! (one directory per component, each exposing public headers and
//! optionally compiled sources with a build descriptor), discovers which
//! component depends on which by scanning include statements and build
//! descriptors, computes a minimal, acyclic, non-redundant dependency
//! graph, and renders per-component package manifests for an external
//! packaging system.
//!
//! # Pipeline
//!
//! A run is single-threaded, synchronous, and strictly sequential over one
//! in-memory [`registry::Registry`]:
//!
//! 1. **Discovery & extraction** ([`scanner`]) — enumerate components,
//!    index their public headers, and record raw include and
//!    build-descriptor edges. Extraction problems degrade the edge set
//!    with a warning; they never abort the run.
//! 2. **Classification** ([`graph::classify`]) — split raw edges into
//!    build-time dependencies and header-only dependencies, seeding the
//!    latter with the transitive include closure.
//! 3. **Precondition** ([`graph::cycles`]) — the raw include graph, after
//!    self-loop stripping, must be acyclic; a genuine cycle aborts loudly.
//! 4. **Reduction** ([`graph::reduce`]) — the core: remove every edge
//!    implied by a longer path through other edges of the same relation,
//!    per component, to a deterministic fixed point.
//! 5. **Export** ([`export`]) — JSON snapshots (inspection and restart),
//!    Graphviz visualization, YAML package manifests, and optionally a
//!    build-script dependency listing.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface (`scan`, `render`)
//! - [`config`] - Run configuration and collection conventions
//! - [`core`] - Error types and user-facing error rendering
//! - [`registry`] - The `Library` record and name-keyed registry
//! - [`scanner`] - Directory discovery and raw edge extraction
//! - [`graph`] - Classification, closure, cycle check, transitive reduction
//! - [`revisions`] - Pinned-revision mapping file
//! - [`export`] - Snapshot, dot, manifest, and script writers
//!
//! # Example
//!
//! ```bash
//! # Full scan of a boost checkout, manifests under out/
//! depgraph scan -d /srv/boost/libs --version-id 1.70.0
//!
//! # Regenerate manifests from the processed snapshot
//! depgraph render --snapshot out/processed.json --version-id 1.70.0
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod export;
pub mod graph;
pub mod registry;
pub mod revisions;
pub mod scanner;
