use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all depsolve operations.
#[derive(Debug, Clone, Error, Diagnostic)]
pub enum ResolveError {
    /// A requirement or version string did not parse.
    #[error("Parse error: {message}")]
    #[diagnostic(help("Requirements are written as `name@1.2.3` or `name@=1.2.3`"))]
    Parse { message: String },

    /// A dependency name was declared twice on the same unit version.
    #[error("Dependency already exists — {name}")]
    DuplicateDependency { name: String },

    /// A constraint was attached twice to the same unit version.
    #[error("Constraint already exists — {constraint}")]
    DuplicateConstraint { constraint: String },

    /// An exact constraint refers to a version that was never registered.
    ///
    /// This aborts the resolve: the registry's view of the universe is
    /// incomplete and any answer built on it would be wrong.
    #[error("No unit version was found for the constraint — {constraint}")]
    #[diagnostic(help("Register the pinned version before resolving"))]
    MissingUnitVersion { constraint: String },

    /// No registered version of a package satisfies the active constraints.
    #[error("Cannot choose satisfying versions of package — {name}")]
    NoSatisfyingVersions { name: String },

    /// Every candidate version was invalidated by its own propagation.
    #[error("None of the versions produce a sensible result — {name}")]
    NoViableNeighbor { name: String },

    /// The search space was exhausted without reaching a terminal state.
    #[error("Couldn't resolve")]
    Unresolvable,
}

impl ResolveError {
    /// Dead-end errors are local to one search branch; everything else
    /// aborts the resolve.
    pub fn is_dead_end(&self) -> bool {
        matches!(
            self,
            ResolveError::NoSatisfyingVersions { .. } | ResolveError::NoViableNeighbor { .. }
        )
    }
}

/// Convenience alias used across the engine.
pub type ResolveResult<T> = Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_surfaced_messages() {
        let err = ResolveError::MissingUnitVersion {
            constraint: "b@=1.2.3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No unit version was found for the constraint — b@=1.2.3"
        );

        let err = ResolveError::NoSatisfyingVersions {
            name: "b".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot choose satisfying versions of package — b");
    }

    #[test]
    fn dead_end_classification() {
        assert!(ResolveError::NoSatisfyingVersions { name: "a".into() }.is_dead_end());
        assert!(ResolveError::NoViableNeighbor { name: "a".into() }.is_dead_end());
        assert!(!ResolveError::Unresolvable.is_dead_end());
        assert!(!ResolveError::MissingUnitVersion {
            constraint: "a@=1.0.0".into()
        }
        .is_dead_end());
    }
}
