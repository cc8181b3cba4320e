//! Structural audit of a [`FibonacciHeap`]
//!
//! [`FibonacciHeap::check_invariants`] walks the whole node graph and reports
//! the first broken invariant:
//! - Heap order: `parent.key <= child.key` for every parent-child pair
//! - Minimum: the min pointer is a root holding the smallest key, and is absent iff empty
//! - Counts: `len` matches the reachable nodes and the arena, `num_trees` the root ring
//! - Rings: `next`/`prev` agree in the root ring and every child ring
//! - Ranks: every rank equals the size of the node's child ring
//! - Loss counts: roots have lost nothing; children stay below the threshold
//!
//! The walk is O(n) and meant for tests and debugging.

use thiserror::Error;

use crate::fibonacci::{FibonacciHeap, Node};
use crate::ring::Linked;
use crate::storage::{NodeArena, NodeId};
use crate::Key;

/// A violated structural invariant
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("min pointer presence disagrees with len {len}")]
    Emptiness { len: usize },
    #[error("arena holds {arena} nodes but len is {len}")]
    ArenaSize { arena: usize, len: usize },
    #[error("min key {min} is not the smallest root key (found {found})")]
    NotMinimum { min: Key, found: Key },
    #[error("node with key {key} is not positive")]
    NonPositiveKey { key: Key },
    #[error("ring through key {key} has inconsistent or unterminated links")]
    BrokenRing { key: Key },
    #[error("root with key {key} has a parent")]
    RootHasParent { key: Key },
    #[error("root with key {key} has lost count {lost}")]
    RootLost { key: Key, lost: usize },
    #[error("root ring holds {counted} trees but num_trees is {recorded}")]
    TreeCount { counted: usize, recorded: usize },
    #[error("child key {child} is below parent key {parent}")]
    HeapOrder { parent: Key, child: Key },
    #[error("child with key {key} does not point back to its parent")]
    WrongParent { key: Key },
    #[error("node with key {key} has rank {rank} but {children} children")]
    Rank { key: Key, rank: usize, children: usize },
    #[error("child with key {key} has lost {lost} children, threshold is {threshold}")]
    LostCount { key: Key, lost: usize, threshold: usize },
    #[error("{counted} nodes reachable but len is {recorded}")]
    Size { counted: usize, recorded: usize },
}

impl<T> FibonacciHeap<T> {
    /// Audits the whole structure, returning the first violation found
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let nodes = self.nodes();
        let len = self.len();

        if nodes.len() != len {
            return Err(InvariantViolation::ArenaSize {
                arena: nodes.len(),
                len,
            });
        }
        let Some(min) = self.min_id() else {
            if len != 0 || self.num_trees() != 0 {
                return Err(InvariantViolation::Emptiness { len });
            }
            return Ok(());
        };
        if len == 0 {
            return Err(InvariantViolation::Emptiness { len });
        }
        let Some(min_node) = nodes.get(min) else {
            return Err(InvariantViolation::Emptiness { len });
        };
        let min_key = min_node.key;

        let roots = walk_ring(nodes, min, len)?;
        if roots.len() != self.num_trees() {
            return Err(InvariantViolation::TreeCount {
                counted: roots.len(),
                recorded: self.num_trees(),
            });
        }

        let threshold = self.threshold().get();
        let mut counted = 0;
        let mut stack = Vec::new();
        for &root in &roots {
            let node = &nodes[root];
            if node.parent.is_some() {
                return Err(InvariantViolation::RootHasParent { key: node.key });
            }
            if node.lost != 0 {
                return Err(InvariantViolation::RootLost {
                    key: node.key,
                    lost: node.lost,
                });
            }
            if node.key < min_key {
                return Err(InvariantViolation::NotMinimum {
                    min: min_key,
                    found: node.key,
                });
            }
            stack.push(root);
        }

        while let Some(id) = stack.pop() {
            counted += 1;
            if counted > len {
                break;
            }
            let node = &nodes[id];
            if node.key <= 0 {
                return Err(InvariantViolation::NonPositiveKey { key: node.key });
            }

            let children = match node.child {
                Some(first) => walk_ring(nodes, first, len)?,
                None => Vec::new(),
            };
            if children.len() != node.rank {
                return Err(InvariantViolation::Rank {
                    key: node.key,
                    rank: node.rank,
                    children: children.len(),
                });
            }
            for child_id in children {
                let child = &nodes[child_id];
                if child.parent != Some(id) {
                    return Err(InvariantViolation::WrongParent { key: child.key });
                }
                if child.key < node.key {
                    return Err(InvariantViolation::HeapOrder {
                        parent: node.key,
                        child: child.key,
                    });
                }
                if child.lost >= threshold {
                    return Err(InvariantViolation::LostCount {
                        key: child.key,
                        lost: child.lost,
                        threshold,
                    });
                }
                stack.push(child_id);
            }
        }

        if counted != len {
            return Err(InvariantViolation::Size {
                counted,
                recorded: len,
            });
        }
        Ok(())
    }
}

/// Collects a ring, checking `prev` against `next` and giving up after
/// `limit` members so a corrupted ring cannot loop forever.
fn walk_ring<T>(
    nodes: &NodeArena<Node<T>>,
    start: NodeId,
    limit: usize,
) -> Result<Vec<NodeId>, InvariantViolation> {
    let mut members = Vec::new();
    let mut current = start;
    loop {
        let Some(node) = nodes.get(current) else {
            let key = nodes.get(start).map_or(0, |n| n.key);
            return Err(InvariantViolation::BrokenRing { key });
        };
        let next = node.ring().next();
        let next_prev = nodes.get(next).map(|n| n.ring().prev());
        if next_prev != Some(current) || members.len() >= limit {
            return Err(InvariantViolation::BrokenRing { key: node.key });
        }
        members.push(current);
        current = next;
        if current == start {
            return Ok(members);
        }
    }
}
