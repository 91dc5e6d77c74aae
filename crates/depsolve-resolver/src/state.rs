//! Search states and their priority-queue ordering.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::lists::{ConstraintList, DependencyList};
use crate::unit::UnitVersion;

/// One partial assignment in the search space.
///
/// `choices` never holds two entries with the same package name. A state
/// with no pending dependencies is terminal and its `choices` are a valid
/// solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveState {
    pub dependencies: DependencyList,
    pub constraints: ConstraintList,
    pub choices: Vec<Arc<UnitVersion>>,
}

impl ResolveState {
    pub fn is_terminal(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// The choice made for `name`, if any.
    pub fn chosen(&self, name: &str) -> Option<&Arc<UnitVersion>> {
        self.choices.iter().find(|uv| uv.name == name)
    }
}

/// A state queued for expansion, with its scoring snapshot.
///
/// Orders ascending by combined priority, then by progress (more choices
/// first), then FIFO by insertion sequence so that equal-cost searches stay
/// deterministic.
#[derive(Debug)]
pub(crate) struct ScoredState {
    /// `combine(cost(choices), estimate(state))`.
    pub priority: f64,
    /// The raw estimate; an infinite value stops the search on pop.
    pub estimate: f64,
    pub seq: u64,
    pub state: ResolveState,
}

impl Ord for ScoredState {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.state.choices.len().cmp(&self.state.choices.len()))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for ScoredState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScoredState {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredState {}

#[cfg(test)]
mod tests {
    use super::*;
    use depsolve_core::version::parse_version;

    fn state(choice_names: &[&str]) -> ResolveState {
        ResolveState {
            dependencies: DependencyList::new(),
            constraints: ConstraintList::new(),
            choices: choice_names
                .iter()
                .map(|n| {
                    Arc::new(UnitVersion::new(
                        n,
                        parse_version("1.0.0").unwrap(),
                        parse_version("1.0.0").unwrap(),
                    ))
                })
                .collect(),
        }
    }

    fn scored(priority: f64, seq: u64, choices: &[&str]) -> ScoredState {
        ScoredState {
            priority,
            estimate: 0.0,
            seq,
            state: state(choices),
        }
    }

    #[test]
    fn lower_priority_orders_first() {
        assert!(scored(1.0, 0, &[]) < scored(2.0, 1, &[]));
    }

    #[test]
    fn ties_prefer_more_progress() {
        assert!(scored(1.0, 1, &["a", "b"]) < scored(1.0, 0, &["a"]));
    }

    #[test]
    fn full_ties_are_fifo() {
        assert!(scored(1.0, 0, &["a"]) < scored(1.0, 1, &["a"]));
    }

    #[test]
    fn infinite_priority_orders_last() {
        assert!(scored(5.0, 1, &[]) < scored(f64::INFINITY, 0, &[]));
    }

    #[test]
    fn terminal_means_no_pending_dependencies() {
        let mut s = state(&["a"]);
        assert!(s.is_terminal());
        s.dependencies = DependencyList::from_names(["b"]);
        assert!(!s.is_terminal());
        assert!(s.chosen("a").is_some());
        assert!(s.chosen("b").is_none());
    }
}
