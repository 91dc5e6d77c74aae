//! Dead-end reporting for a single search.

use std::fmt;

use depsolve_core::errors::ResolveError;

/// A report of every dead-end branch encountered during one search.
///
/// Dead ends are expected: a branch dies, the search continues. The first
/// recorded entry becomes the error message when the whole search fails.
#[derive(Debug, Default)]
pub struct SearchReport {
    dead_ends: Vec<DeadEnd>,
}

/// One abandoned branch.
#[derive(Debug, Clone)]
pub struct DeadEnd {
    /// The package whose candidates ran out.
    pub package: String,
    pub error: ResolveError,
    /// Choices of the last candidate rejected after propagation, when the
    /// branch died that way. Diagnostics only.
    pub rejected: Vec<String>,
}

impl SearchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, dead_end: DeadEnd) {
        self.dead_ends.push(dead_end);
    }

    pub fn first(&self) -> Option<&DeadEnd> {
        self.dead_ends.first()
    }

    pub fn is_empty(&self) -> bool {
        self.dead_ends.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dead_ends.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DeadEnd> {
        self.dead_ends.iter()
    }
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dead_ends.is_empty() {
            return write!(f, "No dead ends.");
        }
        writeln!(f, "Dead ends ({}):", self.dead_ends.len())?;
        for d in &self.dead_ends {
            if d.rejected.is_empty() {
                writeln!(f, "  {}", d.error)?;
            } else {
                writeln!(f, "  {} (last rejected: {})", d.error, d.rejected.join(", "))?;
            }
        }
        Ok(())
    }
}
