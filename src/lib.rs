//! Fibonacci heap with a tunable cascading-cut threshold
//!
//! This crate provides a mergeable min-priority queue over positive integer keys,
//! each carrying an arbitrary payload, implemented as a Fibonacci heap whose
//! cascading-cut rule is configurable.
//!
//! # Features
//!
//! - **O(1)** insert, find_min and meld; **O(log n) amortized** delete_min, decrease_key and delete
//! - **Tunable cut threshold** `c >= 2`: an ancestor is cut once it has lost `c`
//!   children, generalizing the classical marked-bit rule (`c = 2`)
//! - **Instrumentation**: lifetime counts of links and cuts, and per-call counts
//!   returned by `delete_min`, `decrease_key` and `delete`
//! - **Safe handles**: nodes live in a slotmap arena, so a stale handle is
//!   reported instead of aliasing another element
//!
//! # Example
//!
//! ```rust
//! use tunable_fibonacci_heap::FibonacciHeap;
//!
//! let mut heap = FibonacciHeap::new();
//! let handle1 = heap.insert(5, "item1").unwrap();
//! heap.insert(3, "item2").unwrap();
//! heap.decrease_key(&handle1, 4).unwrap();
//!
//! let min = heap.find_min().unwrap();
//! assert_eq!((min.key, *min.payload), (1, "item1"));
//! ```
//!
//! # Logging
//!
//! With the `tracing` feature enabled, consolidation passes emit `trace` events
//! and every cascading cut above the first parent emits a `debug` event.

pub mod error;
pub mod fibonacci;
pub mod invariants;
mod ring;
mod storage;
pub mod threshold;

/// Heap key. Only strictly positive values are accepted.
pub type Key = i64;

pub use error::HeapError;
pub use fibonacci::{Extracted, FibonacciHandle, FibonacciHeap, HeapStats, MinEntry};
pub use invariants::InvariantViolation;
pub use threshold::CutThreshold;
