//! Size limits for type tags, records and queries
//!
//! Recursive structures (type parameters, nested struct fields) are bounded so
//! that hostile input cannot exhaust the stack. Query radius is bounded so a
//! single request cannot ask a responder to scan an unbounded window.

use crate::error::{Error, Result};

/// Maximum nesting depth of a type tag (vector / struct type parameters)
pub const MAX_TYPE_TAG_DEPTH: usize = 8;

/// Maximum nesting depth of struct-by-reference record fields
pub const MAX_RECORD_DEPTH: usize = 16;

/// Query limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum radius of a single range query (default: 100_000)
    pub max_radius: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_radius: 100_000,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits { max_radius: 16 }
    }

    /// Validate a query radius
    pub fn check_radius(&self, radius: u64) -> Result<()> {
        if radius > self.max_radius {
            return Err(Error::invalid_input(format!(
                "radius {} exceeds maximum {}",
                radius, self.max_radius
            )));
        }
        Ok(())
    }
}
