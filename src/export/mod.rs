//! Export adapters: snapshots, visualization, and packaging manifests.
//!
//! Everything here consumes the registry read-only. The graph stages do
//! not care how any of this is serialized.

pub mod dot;
pub mod manifest;
pub mod script;
pub mod snapshot;
