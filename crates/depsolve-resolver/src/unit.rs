//! Unit versions: immutable descriptors of one concrete release.

use std::fmt;
use std::sync::Arc;

use depsolve_core::errors::{ResolveError, ResolveResult};
use depsolve_core::version::Version;

use crate::constraint::Constraint;
use crate::lists::{ConstraintList, DependencyList};

/// One concrete release of one package.
///
/// `dependencies` holds names only; any version restriction on them flows
/// separately through `constraints`. `ecv` is the earliest version this
/// release still considers itself compatible with, which bounds how far a
/// consumer may be pinned below `version`.
///
/// The mutators are for registration time; once a unit version is handed to
/// [`Resolver::add_unit_version`](crate::resolver::Resolver::add_unit_version)
/// it is shared immutably.
#[derive(Debug, Clone)]
pub struct UnitVersion {
    pub name: String,
    pub version: Version,
    pub ecv: Version,
    pub dependencies: DependencyList,
    pub constraints: ConstraintList,
}

impl UnitVersion {
    pub fn new(name: &str, version: Version, ecv: Version) -> Self {
        Self {
            name: name.to_string(),
            version,
            ecv,
            dependencies: DependencyList::new(),
            constraints: ConstraintList::new(),
        }
    }

    /// The interning key, `name@version`.
    pub fn key(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }

    /// Declare a dependency on `name`. Fails if already declared.
    pub fn add_dependency(&mut self, name: &str) -> ResolveResult<()> {
        if self.dependencies.contains(name) {
            return Err(ResolveError::DuplicateDependency {
                name: name.to_string(),
            });
        }
        self.dependencies = self.dependencies.push(name);
        Ok(())
    }

    /// Impose a constraint on another package. Fails if the same interned
    /// constraint is already present.
    pub fn add_constraint(&mut self, constraint: Arc<Constraint>) -> ResolveResult<()> {
        if self.constraints.contains(&constraint) {
            return Err(ResolveError::DuplicateConstraint {
                constraint: constraint.to_string(),
            });
        }
        self.constraints = self.constraints.push(constraint);
        Ok(())
    }
}

impl PartialEq for UnitVersion {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}

impl Eq for UnitVersion {}

impl fmt::Display for UnitVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Resolver;
    use depsolve_core::version::parse_version;

    fn version(s: &str) -> Version {
        parse_version(s).unwrap()
    }

    #[test]
    fn key_and_display_agree() {
        let uv = UnitVersion::new("serde", version("1.0.200"), version("1.0.0"));
        assert_eq!(uv.key(), "serde@1.0.200");
        assert_eq!(uv.to_string(), "serde@1.0.200");
    }

    #[test]
    fn duplicate_dependency_rejected() {
        let mut uv = UnitVersion::new("app", version("1.0.0"), version("1.0.0"));
        uv.add_dependency("lib").unwrap();
        let err = uv.add_dependency("lib").unwrap_err();
        assert_eq!(err.to_string(), "Dependency already exists — lib");
    }

    #[test]
    fn duplicate_constraint_rejected() {
        let mut resolver = Resolver::new();
        let c = resolver.get_constraint("lib", "=1.0.0").unwrap();
        let mut uv = UnitVersion::new("app", version("1.0.0"), version("1.0.0"));
        uv.add_constraint(c.clone()).unwrap();
        // Same interned object comes back for the same pair.
        let again = resolver.get_constraint("lib", "=1.0.0").unwrap();
        let err = uv.add_constraint(again).unwrap_err();
        assert_eq!(err.to_string(), "Constraint already exists — lib@=1.0.0");
    }

    #[test]
    fn equality_is_name_and_version() {
        let a = UnitVersion::new("lib", version("1.0.0"), version("1.0.0"));
        let mut b = UnitVersion::new("lib", version("1.0.0"), version("0.9.0"));
        b.add_dependency("other").unwrap();
        assert_eq!(a, b);

        let c = UnitVersion::new("lib", version("1.0.1"), version("1.0.0"));
        assert_ne!(a, c);
    }
}
