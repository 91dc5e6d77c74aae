//! Persistent list values the search states branch over.
//!
//! Both lists behave as immutable values: every operation returns a new
//! list and leaves the original usable, which is what lets sibling search
//! states share structure safely. Entries are `Arc`-shared; the flat spine
//! is copied eagerly, which beats a hash-trie at the sizes these states
//! reach.

use std::sync::Arc;

use crate::constraint::Constraint;
use crate::unit::UnitVersion;

/// Ordered set of package names still required but not yet chosen.
///
/// Order is insertion order; `peek` returns the head under that order and
/// must stay deterministic for reproducible searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyList {
    names: Vec<Arc<str>>,
}

impl DependencyList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for name in names {
            let name = name.as_ref();
            if !list.contains(name) {
                list.names.push(Arc::from(name));
            }
        }
        list
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// The first name in insertion order.
    pub fn peek(&self) -> Option<&str> {
        self.names.first().map(|n| n.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.as_ref() == name)
    }

    /// A copy with `name` appended, unless already present.
    pub fn push(&self, name: &str) -> Self {
        if self.contains(name) {
            return self.clone();
        }
        let mut names = self.names.clone();
        names.push(Arc::from(name));
        Self { names }
    }

    /// A copy without `name`.
    pub fn remove(&self, name: &str) -> Self {
        if !self.contains(name) {
            return self.clone();
        }
        Self {
            names: self
                .names
                .iter()
                .filter(|n| n.as_ref() != name)
                .cloned()
                .collect(),
        }
    }

    /// Left-side order first, then right-side names not already present.
    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for name in &other.names {
            if !out.contains(name.as_ref()) {
                out.names.push(name.clone());
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|n| n.as_ref())
    }

    /// The exact constraints, among those supplied, that pin a name in this
    /// list.
    pub fn exact_constraints_intersection(&self, constraints: &ConstraintList) -> ConstraintList {
        constraints
            .iter()
            .filter(|c| c.is_exact() && self.contains(&c.name))
            .cloned()
            .collect()
    }
}

/// Set of interned constraints currently in force, keyed by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintList {
    constraints: Vec<Arc<Constraint>>,
}

impl ConstraintList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn contains(&self, constraint: &Constraint) -> bool {
        self.constraints.iter().any(|c| c.id() == constraint.id())
    }

    /// A copy with `constraint` appended, unless already present.
    pub fn push(&self, constraint: Arc<Constraint>) -> Self {
        if self.contains(&constraint) {
            return self.clone();
        }
        let mut constraints = self.constraints.clone();
        constraints.push(constraint);
        Self { constraints }
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut out = self.clone();
        for c in &other.constraints {
            if !out.contains(c) {
                out.constraints.push(c.clone());
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Constraint>> {
        self.constraints.iter()
    }

    /// True iff some contained constraint targets `uv.name` and rejects `uv`.
    pub fn violated(&self, uv: &UnitVersion) -> bool {
        self.constraints
            .iter()
            .any(|c| c.name == uv.name && !c.is_satisfied(uv))
    }

    /// The contained exact constraints whose name appears in `deps`.
    pub fn exact_dependencies_intersection(&self, deps: &DependencyList) -> ConstraintList {
        self.constraints
            .iter()
            .filter(|c| c.is_exact() && deps.contains(&c.name))
            .cloned()
            .collect()
    }
}

impl FromIterator<Arc<Constraint>> for ConstraintList {
    fn from_iter<I: IntoIterator<Item = Arc<Constraint>>>(iter: I) -> Self {
        let mut out = Self::new();
        for c in iter {
            if !out.contains(&c) {
                out.constraints.push(c);
            }
        }
        out
    }
}
