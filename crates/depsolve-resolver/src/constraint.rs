//! Interned version constraints.

use std::fmt;
use std::sync::Arc;

use depsolve_core::requirement::{Relation, Requirement};
use depsolve_core::version::Version;

use crate::resolver::Resolver;
use crate::unit::UnitVersion;

/// One requirement on one package, interned by the [`Resolver`].
///
/// Exactly one `Constraint` exists per `(name, printed-form)` pair within a
/// resolver, so the registry-assigned `id` doubles as semantic equality.
#[derive(Debug, Clone)]
pub struct Constraint {
    id: u64,
    pub name: String,
    pub relation: Relation,
    pub version: Version,
}

impl Constraint {
    pub(crate) fn new(id: u64, req: Requirement) -> Self {
        Self {
            id,
            name: req.name,
            relation: req.relation,
            version: req.version,
        }
    }

    /// Registry-assigned identity.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_exact(&self) -> bool {
        self.relation == Relation::Exact
    }

    /// Whether `uv` satisfies this constraint.
    ///
    /// Exact constraints require the precise version. At-least constraints
    /// require the candidate to be at or above the floor while still calling
    /// itself compatible with a consumer pinned at the floor
    /// (`uv.ecv <= floor`).
    pub fn is_satisfied(&self, uv: &UnitVersion) -> bool {
        match self.relation {
            Relation::Exact => uv.version == self.version,
            Relation::AtLeast => self.version <= uv.version && uv.ecv <= self.version,
        }
    }

    /// The registered unit version this constraint selects, if any.
    ///
    /// Exact constraints are a direct interning-table lookup; at-least
    /// constraints scan the package's versions in registration order.
    pub fn satisfying_unit_version(&self, resolver: &Resolver) -> Option<Arc<UnitVersion>> {
        match self.relation {
            Relation::Exact => resolver.unit(&format!("{}@{}", self.name, self.version)).cloned(),
            Relation::AtLeast => resolver
                .versions_of(&self.name)
                .iter()
                .find(|uv| self.is_satisfied(uv))
                .cloned(),
        }
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Constraint {}

impl std::hash::Hash for Constraint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.relation {
            Relation::Exact => write!(f, "{}@={}", self.name, self.version),
            Relation::AtLeast => write!(f, "{}@{}", self.name, self.version),
        }
    }
}
