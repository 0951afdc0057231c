//! Graph construction and pruning over a populated registry.
//!
//! The pipeline runs strictly in sequence on the single in-memory registry:
//! classification ([`classify`]) splits raw edges into build and
//! header-only sets, [`cycles`] enforces the acyclicity precondition on the
//! raw include graph, and [`reduce`] prunes every edge implied by a longer
//! path. No stage after classification consults the raw edge sets, and only
//! the reducer mutates the classified sets.

pub mod classify;
pub mod closure;
pub mod cycles;
pub mod reduce;

use tracing::info;

use crate::config::RunConfig;
use crate::core::DepgraphError;
use crate::registry::Registry;
use reduce::{Depth, Relation};

/// Run classification, the cycle precondition, and full-depth reduction of
/// both relations over the registry.
pub fn process(registry: &mut Registry, config: &RunConfig) -> Result<(), DepgraphError> {
    info!(components = registry.len(), "classifying dependencies");
    classify::classify(registry, config);

    cycles::ensure_acyclic(registry)?;

    info!("reducing build dependencies");
    reduce::reduce_all(registry, Relation::Build, Depth::Full);
    info!("reducing header-only dependencies");
    reduce::reduce_all(registry, Relation::HeaderOnly, Depth::Full);
    Ok(())
}
