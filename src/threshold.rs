//! Cascading-cut threshold
//!
//! A classical Fibonacci heap cuts a non-root node from its parent as soon as
//! the node loses its second child (the "marked" bit). This crate generalizes
//! that rule: a node tolerates `c - 1` lost children and is cut when its loss
//! count reaches `c`. Larger thresholds perform fewer cascading cuts at the
//! price of bushier, less balanced trees.

use std::fmt;

use crate::error::HeapError;

/// Validated cascading-cut threshold `c`, always at least 2
///
/// # Example
///
/// ```rust
/// use tunable_fibonacci_heap::CutThreshold;
///
/// let c = CutThreshold::new(3).unwrap();
/// assert_eq!(c.get(), 3);
/// assert!(CutThreshold::new(1).is_err());
/// assert_eq!(CutThreshold::default(), CutThreshold::CLASSICAL);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CutThreshold(usize);

impl CutThreshold {
    /// The textbook rule: cut on the second lost child.
    pub const CLASSICAL: CutThreshold = CutThreshold(2);

    /// Smallest accepted threshold.
    pub const MIN: usize = 2;

    /// Creates a threshold, rejecting values below [`CutThreshold::MIN`].
    pub fn new(c: usize) -> Result<Self, HeapError> {
        if c < Self::MIN {
            return Err(HeapError::ThresholdTooSmall(c));
        }
        Ok(CutThreshold(c))
    }

    /// Returns the raw threshold value.
    #[inline]
    pub const fn get(self) -> usize {
        self.0
    }
}

impl Default for CutThreshold {
    fn default() -> Self {
        Self::CLASSICAL
    }
}

impl TryFrom<usize> for CutThreshold {
    type Error = HeapError;

    fn try_from(c: usize) -> Result<Self, Self::Error> {
        CutThreshold::new(c)
    }
}

impl From<CutThreshold> for usize {
    fn from(c: CutThreshold) -> usize {
        c.0
    }
}

impl fmt::Display for CutThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c={}", self.0)
    }
}
