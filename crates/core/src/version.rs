//! Object version (sequence number)
//!
//! Every stored child object carries the version at which it was written.
//! Range queries may pin a parent version; lookups then return the highest
//! stored version at or below the pin.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number of a stored object
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ObjectVersion(u64);

impl ObjectVersion {
    /// The lowest version
    pub const MIN: Self = Self(0);

    /// The highest representable version, used when no pin is given
    pub const MAX: Self = Self(0x7fff_ffff_ffff_ffff);

    /// Create a version from its numeric value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Numeric value
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Resolve an optional pin, defaulting to [`ObjectVersion::MAX`]
    pub fn pin_or_latest(pin: Option<u64>) -> Self {
        pin.map(Self).unwrap_or(Self::MAX)
    }
}

impl From<u64> for ObjectVersion {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for ObjectVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
