//! Stock cost models for the search.
//!
//! Version preferences are not baked into the engine: candidate enumeration
//! follows registration order, and anything smarter is expressed through
//! these callbacks. Each stock cost pairs with the zero estimate, which is
//! trivially admissible.

use std::sync::Arc;

use crate::resolver::Resolver;
use crate::state::ResolveState;
use crate::unit::UnitVersion;

/// Cost of a (possibly partial) assignment.
pub type CostFn = Box<dyn Fn(&[Arc<UnitVersion>]) -> f64>;
/// Admissible lower bound on the cost still to come.
pub type EstimateFn = Box<dyn Fn(&ResolveState) -> f64>;
/// Combines cost and estimate into the queue priority.
pub type CombineFn = Box<dyn Fn(f64, f64) -> f64>;

/// Every assignment costs nothing; the search degenerates to registration
/// order. The default.
pub fn zero() -> CostFn {
    Box::new(|_| 0.0)
}

/// The default estimate: claims nothing about the remaining work.
pub fn zero_estimate() -> EstimateFn {
    Box::new(|_| 0.0)
}

/// The default combiner, `cost + estimate`.
pub fn sum() -> CombineFn {
    Box::new(|cost, estimate| cost + estimate)
}

/// Steers the search toward newest versions: each choice that lags its
/// package's latest registered version costs one.
///
/// Captures a snapshot of the latest-version table, so versions registered
/// afterwards are not seen.
pub fn prefer_latest(resolver: &Resolver) -> CostFn {
    let latest = resolver.latest_versions();
    Box::new(move |choices| {
        choices
            .iter()
            .filter(|uv| latest.get(&uv.name).is_some_and(|l| *l > uv.version))
            .count() as f64
    })
}

/// Prefers smaller closures: each choice costs one.
pub fn minimal_footprint() -> CostFn {
    Box::new(|choices| choices.len() as f64)
}
