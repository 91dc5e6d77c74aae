use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{ResolveError, ResolveResult};
use crate::version::{parse_version, Version};

/// How a requirement relates a package to a version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// Pins one precise version.
    Exact,
    /// Sets a floor, paired with the candidate's earliest-compatible bound.
    AtLeast,
}

/// A parsed requirement: one package name, one relation, one version.
///
/// Supports the combined syntax (`"name@=1.2.3"` exact, `"name@1.2.3"`
/// at-least) and the split form where name and version constraint arrive
/// separately.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub name: String,
    pub relation: Relation,
    pub version: Version,
}

impl Requirement {
    /// Parse `"name@=version"` or `"name@version"`.
    pub fn parse(input: &str) -> ResolveResult<Self> {
        let (name, constraint) = input.split_once('@').ok_or_else(|| ResolveError::Parse {
            message: format!("requirement `{input}` is missing `@`"),
        })?;
        Self::from_parts(name, constraint)
    }

    /// Build a requirement from a name and a version constraint string.
    pub fn from_parts(name: &str, constraint: &str) -> ResolveResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ResolveError::Parse {
                message: format!("requirement `{name}@{constraint}` has an empty name"),
            });
        }
        let constraint = constraint.trim();
        let (relation, version) = match constraint.strip_prefix('=') {
            Some(rest) => (Relation::Exact, rest),
            None => (Relation::AtLeast, constraint),
        };
        Ok(Self {
            name: name.to_string(),
            relation,
            version: parse_version(version)?,
        })
    }

    /// The version constraint half of the printed form (`"=1.2.3"` or `"1.2.3"`).
    pub fn constraint_str(&self) -> String {
        match self.relation {
            Relation::Exact => format!("={}", self.version),
            Relation::AtLeast => self.version.to_string(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.constraint_str())
    }
}

/// A requirement as declared in client input.
///
/// Supports both shorthand (`"name@=1.2.3"`) and detailed forms, the way a
/// manifest would spell them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequirementDecl {
    Short(String),
    Detailed(DetailedRequirement),
}

/// A requirement with explicit fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedRequirement {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub exact: bool,
}

impl RequirementDecl {
    /// Lower the declaration to a parsed [`Requirement`].
    pub fn to_requirement(&self) -> ResolveResult<Requirement> {
        match self {
            RequirementDecl::Short(s) => Requirement::parse(s),
            RequirementDecl::Detailed(d) => {
                let relation = if d.exact { "=" } else { "" };
                Requirement::from_parts(&d.name, &format!("{relation}{}", d.version))
            }
        }
    }
}
