//! The resolver: unit-version registry, exact-constraint propagation, and
//! the cost-guided best-first search over partial assignments.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};
use std::sync::Arc;

use depsolve_core::errors::{ResolveError, ResolveResult};
use depsolve_core::requirement::Requirement;
use depsolve_core::version::Version;

use crate::constraint::Constraint;
use crate::cost::{CombineFn, CostFn, EstimateFn};
use crate::lists::{ConstraintList, DependencyList};
use crate::report::{DeadEnd, SearchReport};
use crate::state::{ResolveState, ScoredState};
use crate::unit::UnitVersion;

/// Name of the synthesized root unit that carries the caller's direct
/// dependencies and constraints through the initial propagation. Never
/// registered; stripped from the returned choices.
const TARGET: &str = "target";

/// Knobs for one `resolve` call.
///
/// The search pops states by `combine(cost(choices), estimate(state))`,
/// smallest first. `estimate` must be an admissible lower bound on the cost
/// still to come, and the model must be monotone under `combine`: the driver
/// stops searching on the first popped state whose raw estimate is infinite.
pub struct ResolveOptions {
    pub cost: CostFn,
    pub estimate: EstimateFn,
    pub combine: CombineFn,
    /// Return the initial propagation's choices without searching.
    pub stop_after_first_propagation: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            cost: crate::cost::zero(),
            estimate: crate::cost::zero_estimate(),
            combine: crate::cost::sum(),
            stop_after_first_propagation: false,
        }
    }
}

/// Registry of known unit versions and interned constraints, plus the
/// search driver.
///
/// Registration borrows mutably and resolution borrows immutably, so the
/// registry cannot change under a running search.
#[derive(Debug, Default)]
pub struct Resolver {
    /// Registration order per package; the candidate enumeration order.
    units: HashMap<String, Vec<Arc<UnitVersion>>>,
    /// Interning table keyed by `name@version`.
    units_by_key: HashMap<String, Arc<UnitVersion>>,
    /// Greatest registered version per package.
    latest: HashMap<String, Version>,
    /// Interning table keyed by `(name, printed constraint)`.
    constraints: HashMap<(String, String), Arc<Constraint>>,
    next_constraint_id: u64,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one release. Idempotent on `name@version`: repeat calls
    /// return the first registration untouched.
    pub fn add_unit_version(&mut self, uv: UnitVersion) -> Arc<UnitVersion> {
        let key = uv.key();
        if let Some(existing) = self.units_by_key.get(&key) {
            return existing.clone();
        }
        let uv = Arc::new(uv);
        self.units_by_key.insert(key, uv.clone());
        let raise = match self.latest.get(&uv.name) {
            Some(current) => *current < uv.version,
            None => true,
        };
        if raise {
            self.latest.insert(uv.name.clone(), uv.version.clone());
        }
        self.units.entry(uv.name.clone()).or_default().push(uv.clone());
        uv
    }

    /// Intern-and-return the constraint for `(name, version_constraint)`,
    /// e.g. `("serde", "=1.0.200")` or `("serde", "1.0.0")`.
    pub fn get_constraint(
        &mut self,
        name: &str,
        version_constraint: &str,
    ) -> ResolveResult<Arc<Constraint>> {
        let req = Requirement::from_parts(name, version_constraint)?;
        Ok(self.intern(req))
    }

    /// As [`get_constraint`](Self::get_constraint), from the combined
    /// `name@=1.2.3` / `name@1.2.3` syntax.
    pub fn parse_constraint(&mut self, combined: &str) -> ResolveResult<Arc<Constraint>> {
        let req = Requirement::parse(combined)?;
        Ok(self.intern(req))
    }

    fn intern(&mut self, req: Requirement) -> Arc<Constraint> {
        let key = (req.name.clone(), req.constraint_str());
        if let Some(existing) = self.constraints.get(&key) {
            return existing.clone();
        }
        let constraint = Arc::new(Constraint::new(self.next_constraint_id, req));
        self.next_constraint_id += 1;
        self.constraints.insert(key, constraint.clone());
        constraint
    }

    /// Look up a registered unit version by `name@version`.
    pub fn unit(&self, key: &str) -> Option<&Arc<UnitVersion>> {
        self.units_by_key.get(key)
    }

    /// All registered versions of `name`, in registration order.
    pub fn versions_of(&self, name: &str) -> &[Arc<UnitVersion>] {
        self.units.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The greatest registered version of `name`.
    pub fn latest_version(&self, name: &str) -> Option<&Version> {
        self.latest.get(name)
    }

    /// Snapshot of every package's greatest registered version.
    pub fn latest_versions(&self) -> HashMap<String, Version> {
        self.latest.clone()
    }

    /// Resolve `dependencies` into one unit version per transitively
    /// required package, honoring `constraints` and any pre-fixed
    /// `choices`, minimizing the cost model in `options`.
    pub fn resolve(
        &self,
        dependencies: &[&str],
        constraints: &[Arc<Constraint>],
        choices: &[Arc<UnitVersion>],
        options: &ResolveOptions,
    ) -> ResolveResult<Vec<Arc<UnitVersion>>> {
        let mut target = UnitVersion::new(TARGET, Version::new(0, 0, 0), Version::new(0, 0, 0));
        for name in dependencies {
            target.add_dependency(name)?;
        }
        for constraint in constraints {
            target.add_constraint(constraint.clone())?;
        }
        let target = Arc::new(target);

        let dep_list = DependencyList::from_names(dependencies);
        let constraint_list: ConstraintList = constraints.iter().cloned().collect();

        let mut start = self.propagate_exact_trans_deps(&target, &dep_list, &constraint_list, choices)?;
        start.choices.retain(|uv| uv.name != TARGET);
        tracing::debug!(
            pending = start.dependencies.len(),
            forced = start.choices.len(),
            "initial propagation done"
        );

        if options.stop_after_first_propagation {
            return Ok(start.choices);
        }

        let mut report = SearchReport::new();
        let mut heap: BinaryHeap<Reverse<ScoredState>> = BinaryHeap::new();
        let mut seq = 0u64;
        heap.push(Reverse(score(options, start, &mut seq)));

        while let Some(Reverse(popped)) = heap.pop() {
            if popped.estimate.is_infinite() {
                tracing::debug!("popped an infinite estimate, giving up");
                break;
            }
            if popped.state.is_terminal() {
                tracing::debug!(choices = popped.state.choices.len(), "terminal state reached");
                return Ok(popped.state.choices);
            }
            tracing::trace!(
                priority = popped.priority,
                pending = popped.state.dependencies.len(),
                "expanding"
            );
            for neighbor in self.state_neighbors(&popped.state, &mut report)? {
                heap.push(Reverse(score(options, neighbor, &mut seq)));
            }
        }

        tracing::debug!(dead_ends = report.len(), "search exhausted");
        match report.first() {
            Some(dead_end) => Err(dead_end.error.clone()),
            None => Err(ResolveError::Unresolvable),
        }
    }

    /// Successor states for `state`: pick the head pending dependency, try
    /// every non-violating candidate version, and keep the candidates whose
    /// propagation leaves all choices valid.
    ///
    /// Dead ends are recorded in `report` and yield an empty successor set;
    /// only registry inconsistencies return an error.
    fn state_neighbors(
        &self,
        state: &ResolveState,
        report: &mut SearchReport,
    ) -> ResolveResult<Vec<ResolveState>> {
        let Some(name) = state.dependencies.peek() else {
            return Ok(Vec::new());
        };
        let rest = state.dependencies.remove(name);

        let candidates: Vec<Arc<UnitVersion>> = self
            .versions_of(name)
            .iter()
            .filter(|uv| !state.constraints.violated(uv))
            .cloned()
            .collect();
        if candidates.is_empty() {
            tracing::trace!(package = name, "no satisfying candidates");
            report.record(DeadEnd {
                package: name.to_string(),
                error: ResolveError::NoSatisfyingVersions {
                    name: name.to_string(),
                },
                rejected: Vec::new(),
            });
            return Ok(Vec::new());
        }

        let mut neighbors = Vec::with_capacity(candidates.len());
        let mut last_invalid: Option<ResolveState> = None;
        for candidate in candidates {
            let next =
                self.propagate_exact_trans_deps(&candidate, &rest, &state.constraints, &state.choices)?;
            // Propagation can add constraints that newly invalidate earlier
            // choices, not just the candidate itself.
            if next.choices.iter().all(|uv| !next.constraints.violated(uv)) {
                neighbors.push(next);
            } else {
                last_invalid = Some(next);
            }
        }

        if neighbors.is_empty() {
            let rejected = last_invalid
                .map(|s| s.choices.iter().map(|uv| uv.key()).collect())
                .unwrap_or_default();
            tracing::trace!(package = name, "every candidate invalidated its state");
            report.record(DeadEnd {
                package: name.to_string(),
                error: ResolveError::NoViableNeighbor {
                    name: name.to_string(),
                },
                rejected,
            });
        }
        Ok(neighbors)
    }

    /// Close `(dependencies, constraints, choices)` over the forced choices
    /// introduced by adding `uv`.
    ///
    /// Breadth-first over unit versions, keyed by package name so nothing is
    /// enqueued twice. The tuple passed in must already be propagated; only
    /// `uv` and its consequences can expose new forced pairings.
    pub(crate) fn propagate_exact_trans_deps(
        &self,
        uv: &Arc<UnitVersion>,
        dependencies: &DependencyList,
        constraints: &ConstraintList,
        choices: &[Arc<UnitVersion>],
    ) -> ResolveResult<ResolveState> {
        let mut dependencies = dependencies.clone();
        let mut constraints = constraints.clone();
        let mut choices = choices.to_vec();

        let mut queue: VecDeque<Arc<UnitVersion>> = VecDeque::new();
        let mut enqueued: HashSet<String> = HashSet::new();
        queue.push_back(uv.clone());
        enqueued.insert(uv.name.clone());

        while let Some(unit) = queue.pop_front() {
            push_choice(&mut choices, &unit);

            let closure = self.exact_transitive_constraints(&unit)?;
            let exact_versions = self.exact_transitive_deps_versions(&closure)?;
            let inexact = self.inexact_transitive_deps(&unit, &closure, &exact_versions);

            let mut transitive = unit.constraints.clone();
            for forced in &exact_versions {
                transitive = transitive.union(&forced.constraints);
            }

            dependencies = dependencies.union(&inexact);
            constraints = constraints.union(&transitive);
            for forced in &exact_versions {
                push_choice(&mut choices, forced);
            }

            // Picked packages no longer need picking.
            for chosen in &choices {
                dependencies = dependencies.remove(&chosen.name);
            }

            // Forced pairings born from combining this unit with the state:
            // constraints already in force that pin something it depends on,
            // and its own exact constraints on its own dependencies.
            let in_force = unit.dependencies.exact_constraints_intersection(&constraints);
            let self_imposed = unit.constraints.exact_dependencies_intersection(&unit.dependencies);
            for forced in in_force.union(&self_imposed).iter() {
                let found = self.require_satisfying(forced)?;
                if enqueued.insert(found.name.clone()) {
                    tracing::trace!(unit = %found, constraint = %forced, "forced choice");
                    queue.push_back(found);
                }
            }
        }

        Ok(ResolveState {
            dependencies,
            constraints,
            choices,
        })
    }

    /// Fixed point of the exact constraints reachable from `unit` through
    /// the releases they pin. Worklist, not recursion: the closure can be
    /// deep.
    fn exact_transitive_constraints(
        &self,
        unit: &UnitVersion,
    ) -> ResolveResult<ConstraintList> {
        let mut closure = unit.dependencies.exact_constraints_intersection(&unit.constraints);
        let mut work: VecDeque<Arc<Constraint>> = closure.iter().cloned().collect();
        while let Some(constraint) = work.pop_front() {
            let pinned = self.require_satisfying(&constraint)?;
            let next = pinned
                .dependencies
                .exact_constraints_intersection(&pinned.constraints);
            for c in next.iter() {
                if !closure.contains(c) {
                    closure = closure.push(c.clone());
                    work.push_back(c.clone());
                }
            }
        }
        Ok(closure)
    }

    /// The closure's constraints mapped to their pinned releases, one per
    /// package name.
    fn exact_transitive_deps_versions(
        &self,
        closure: &ConstraintList,
    ) -> ResolveResult<Vec<Arc<UnitVersion>>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut versions = Vec::new();
        for constraint in closure.iter() {
            let pinned = self.require_satisfying(constraint)?;
            if seen.insert(pinned.name.clone()) {
                versions.push(pinned);
            }
        }
        Ok(versions)
    }

    /// The dependency names `unit` and its exact closure bring in that still
    /// need general resolution: everything declared, minus every name the
    /// closure already pins.
    fn inexact_transitive_deps(
        &self,
        unit: &UnitVersion,
        closure: &ConstraintList,
        exact_versions: &[Arc<UnitVersion>],
    ) -> DependencyList {
        let mut names = unit.dependencies.clone();
        for pinned in exact_versions {
            names = names.union(&pinned.dependencies);
        }
        for constraint in closure.iter() {
            names = names.remove(&constraint.name);
        }
        names
    }

    fn require_satisfying(
        &self,
        constraint: &Arc<Constraint>,
    ) -> ResolveResult<Arc<UnitVersion>> {
        constraint
            .satisfying_unit_version(self)
            .ok_or_else(|| ResolveError::MissingUnitVersion {
                constraint: constraint.to_string(),
            })
    }
}

/// Append `uv` unless a choice for its package already exists.
fn push_choice(choices: &mut Vec<Arc<UnitVersion>>, uv: &Arc<UnitVersion>) {
    if !choices.iter().any(|c| c.name == uv.name) {
        choices.push(uv.clone());
    }
}

fn score(options: &ResolveOptions, state: ResolveState, seq: &mut u64) -> ScoredState {
    let cost = (options.cost)(&state.choices);
    let estimate = (options.estimate)(&state);
    let priority = (options.combine)(cost, estimate);
    let n = *seq;
    *seq += 1;
    ScoredState {
        priority,
        estimate,
        seq: n,
        state,
    }
}
