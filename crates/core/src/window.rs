//! Inclusive index windows
//!
//! A range query asks for every index in `[center - radius, center + radius]`.
//! Bounds saturate at `0` and `u64::MAX`, so a window never wraps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

/// Inclusive window of indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexWindow {
    lower: u64,
    upper: u64,
}

impl IndexWindow {
    /// Window centered on `center` extending `radius` in both directions
    ///
    /// # Examples
    ///
    /// ```
    /// use childfield_core::IndexWindow;
    ///
    /// let w = IndexWindow::around(1000, 100);
    /// assert_eq!((w.lower(), w.upper()), (900, 1100));
    ///
    /// let clamped = IndexWindow::around(5, 100);
    /// assert_eq!(clamped.lower(), 0);
    /// ```
    pub fn around(center: u64, radius: u64) -> Self {
        Self {
            lower: center.saturating_sub(radius),
            upper: center.saturating_add(radius),
        }
    }

    /// Lowest index in the window
    pub fn lower(&self) -> u64 {
        self.lower
    }

    /// Highest index in the window
    pub fn upper(&self) -> u64 {
        self.upper
    }

    /// Whether `index` lies in the window
    pub fn contains(&self, index: u64) -> bool {
        (self.lower..=self.upper).contains(&index)
    }

    /// Number of indices in the window
    ///
    /// Saturates at `u64::MAX` for the full `0..=u64::MAX` window.
    pub fn len(&self) -> u64 {
        (self.upper - self.lower).saturating_add(1)
    }

    /// Always false: a window holds at least its center
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Indices in ascending order
    pub fn indices(&self) -> RangeInclusive<u64> {
        self.lower..=self.upper
    }
}

impl fmt::Display for IndexWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}
