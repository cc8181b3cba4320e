//! Error types for heap operations

use thiserror::Error;

use crate::Key;

/// Error type for heap operations
///
/// Every variant is an invalid argument. Validation runs before any
/// structural mutation, so a returned error leaves the heap untouched.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The cascading-cut threshold passed at construction is below 2
    #[error("cut threshold must be at least 2 (got {0})")]
    ThresholdTooSmall(usize),
    /// Keys must be strictly positive
    #[error("key must be positive (got {0})")]
    NonPositiveKey(Key),
    /// A decrease must satisfy `0 < diff < key`
    #[error("decrease requires 0 < diff < key (got diff {diff} for key {key})")]
    DiffOutOfRange { diff: Key, key: Key },
    /// The handle does not refer to a live node of this heap
    #[error("handle is no longer valid (element was removed)")]
    InvalidHandle,
}
