//! Version parsing and ordering.
//!
//! depsolve does not define its own version arithmetic: releases carry
//! [`semver::Version`] values and all comparisons use its total order. The
//! earliest-compatible-version bound used by inexact constraints is an
//! ordinary comparison on that order.

use crate::errors::{ResolveError, ResolveResult};

pub use semver::Version;

/// Parse a dotted version string, mapping failures to the unified error type.
pub fn parse_version(input: &str) -> ResolveResult<Version> {
    Version::parse(input.trim()).map_err(|e| ResolveError::Parse {
        message: format!("invalid version `{input}`: {e}"),
    })
}

/// The greatest version in `versions`, if any.
pub fn latest_of<'a, I>(versions: I) -> Option<&'a Version>
where
    I: IntoIterator<Item = &'a Version>,
{
    versions.into_iter().max()
}
