//! Core data types for the depsolve engine.
//!
//! This crate defines what the resolver and its clients agree on: the
//! requirement grammar (`name@=1.2.3` pins a version, `name@1.2.3` sets a
//! floor), version parsing and ordering delegated to [`semver`], and the
//! unified error type.
//!
//! This crate is intentionally free of any resolution logic.

pub mod errors;
pub mod requirement;
pub mod version;

pub use errors::{ResolveError, ResolveResult};
pub use requirement::{Relation, Requirement, RequirementDecl};
pub use version::Version;
