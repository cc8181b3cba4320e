//! Fibonacci heap with a tunable cascading-cut threshold
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert, find_min and meld
//! - O(log n) amortized delete_min, decrease_key and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list (the root ring), the children of every node
//! in another ring, and the heap keeps a pointer to the minimum root.
//!
//! # Cut threshold
//!
//! Every non-root node counts the children it has lost since it last became a
//! child. When a decrease-key cut makes that count reach the threshold `c`, the
//! node is cut as well and the check repeats one level up. `c = 2` is the
//! textbook rule; see [`CutThreshold`].
//!
//! # Instrumentation
//!
//! The heap counts every link (one root made the child of another during
//! consolidation) and every cut (a node detached from its parent) over its
//! lifetime. `delete_min` reports the links of its consolidation pass and
//! `decrease_key` the cuts of its cascade.

use smallvec::{smallvec, SmallVec};

use crate::error::HeapError;
use crate::ring::{self, Linked, RingLink};
use crate::storage::{NodeArena, NodeId};
use crate::threshold::CutThreshold;
use crate::Key;

/// Handle to an element in a Fibonacci heap
///
/// Returned by [`FibonacciHeap::insert`] and valid until the element is removed.
/// Handles stay valid when their heap is melded into another one. A stale
/// handle, or one from an unrelated heap, is detected rather than aliased.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle {
    node: NodeId,
}

pub(crate) struct Node<T> {
    pub(crate) key: Key,
    pub(crate) payload: T,
    pub(crate) parent: Option<NodeId>,
    pub(crate) child: Option<NodeId>,
    pub(crate) ring: RingLink,
    pub(crate) rank: usize,
    /// Children lost to cuts since this node last became a child
    pub(crate) lost: usize,
}

impl<T> Node<T> {
    fn new(id: NodeId, key: Key, payload: T) -> Self {
        Node {
            key,
            payload,
            parent: None,
            child: None,
            ring: RingLink::singleton(id),
            rank: 0,
            lost: 0,
        }
    }
}

impl<T> Linked for Node<T> {
    #[inline]
    fn ring(&self) -> &RingLink {
        &self.ring
    }

    #[inline]
    fn ring_mut(&mut self) -> &mut RingLink {
        &mut self.ring
    }
}

/// The current minimum, as returned by [`FibonacciHeap::find_min`]
#[derive(Debug, PartialEq, Eq)]
pub struct MinEntry<'a, T> {
    /// Handle of the minimum element
    pub handle: FibonacciHandle,
    /// Its current key
    pub key: Key,
    /// Its payload
    pub payload: &'a T,
}

/// An element taken out of the heap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted<T> {
    /// Key the element held when it was removed
    pub key: Key,
    /// The element's payload, now owned by the caller
    pub payload: T,
    /// Links performed by the consolidation that followed the removal
    pub links: usize,
}

/// Snapshot of the heap's size and lifetime counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Number of elements
    pub len: usize,
    /// Number of trees in the root ring
    pub trees: usize,
    /// Lifetime link count
    pub total_links: u64,
    /// Lifetime cut count
    pub total_cuts: u64,
}

/// Fibonacci heap over positive `i64` keys
///
/// # Example
///
/// ```rust
/// use tunable_fibonacci_heap::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::with_threshold(3).unwrap();
/// let a = heap.insert(5, "a").unwrap();
/// heap.insert(3, "b").unwrap();
///
/// heap.decrease_key(&a, 4).unwrap();
/// let min = heap.find_min().unwrap();
/// assert_eq!((min.key, *min.payload), (1, "a"));
///
/// heap.delete_min();
/// assert_eq!(heap.find_min().map(|m| m.key), Some(3));
/// ```
pub struct FibonacciHeap<T> {
    nodes: NodeArena<Node<T>>,
    min: Option<NodeId>,
    len: usize,
    trees: usize,
    total_links: u64,
    total_cuts: u64,
    threshold: CutThreshold,
}

impl<T> Default for FibonacciHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FibonacciHeap<T> {
    /// Creates an empty heap with the classical threshold `c = 2`.
    pub fn new() -> Self {
        Self::with_cut_threshold(CutThreshold::CLASSICAL)
    }

    /// Creates an empty heap with threshold `c`.
    ///
    /// # Errors
    /// Returns `HeapError::ThresholdTooSmall` if `c < 2`.
    pub fn with_threshold(c: usize) -> Result<Self, HeapError> {
        Ok(Self::with_cut_threshold(CutThreshold::new(c)?))
    }

    /// Creates an empty heap with an already validated threshold.
    pub fn with_cut_threshold(threshold: CutThreshold) -> Self {
        Self {
            nodes: NodeArena::new(),
            min: None,
            len: 0,
            trees: 0,
            total_links: 0,
            total_cuts: 0,
            threshold,
        }
    }

    /// Returns the cascading-cut threshold this heap was built with
    #[inline]
    pub fn threshold(&self) -> CutThreshold {
        self.threshold
    }

    /// Returns true if the heap holds no elements
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Returns the number of elements in the heap
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of trees in the root ring
    #[inline]
    pub fn num_trees(&self) -> usize {
        self.trees
    }

    /// Links performed over the heap's lifetime, including those of heaps melded into it
    #[inline]
    pub fn total_links(&self) -> u64 {
        self.total_links
    }

    /// Cuts performed over the heap's lifetime, including those of heaps melded into it
    #[inline]
    pub fn total_cuts(&self) -> u64 {
        self.total_cuts
    }

    /// Returns the size and lifetime counters in one snapshot
    pub fn stats(&self) -> HeapStats {
        HeapStats {
            len: self.len,
            trees: self.trees,
            total_links: self.total_links,
            total_cuts: self.total_cuts,
        }
    }

    /// Returns true if the handle refers to an element of this heap
    pub fn contains(&self, handle: &FibonacciHandle) -> bool {
        self.nodes.contains(handle.node)
    }

    /// Returns the current key of an element
    pub fn key(&self, handle: &FibonacciHandle) -> Option<Key> {
        self.nodes.get(handle.node).map(|node| node.key)
    }

    /// Returns the key and payload of an element
    pub fn get(&self, handle: &FibonacciHandle) -> Option<(Key, &T)> {
        self.nodes
            .get(handle.node)
            .map(|node| (node.key, &node.payload))
    }

    /// Returns the payload of an element for modification; the key is not exposed
    pub fn get_mut(&mut self, handle: &FibonacciHandle) -> Option<&mut T> {
        self.nodes.get_mut(handle.node).map(|node| &mut node.payload)
    }

    /// Inserts `payload` under `key`, returning a handle to the new element
    ///
    /// # Errors
    /// Returns `HeapError::NonPositiveKey` if `key <= 0`.
    ///
    /// # Time Complexity
    /// O(1), no links.
    pub fn insert(&mut self, key: Key, payload: T) -> Result<FibonacciHandle, HeapError> {
        if key <= 0 {
            return Err(HeapError::NonPositiveKey(key));
        }
        let id = self.nodes.insert_with_id(|id| Node::new(id, key, payload));
        self.add_root(id);
        self.len += 1;
        self.trees += 1;
        Ok(FibonacciHandle { node: id })
    }

    /// Returns the minimum element without removing it
    ///
    /// # Time Complexity
    /// O(1)
    pub fn find_min(&self) -> Option<MinEntry<'_, T>> {
        let id = self.min?;
        let node = &self.nodes[id];
        Some(MinEntry {
            handle: FibonacciHandle { node: id },
            key: node.key,
            payload: &node.payload,
        })
    }

    /// Removes the minimum element, returning the number of links performed
    ///
    /// Returns 0 on an empty heap. Use [`FibonacciHeap::extract_min`] to get the
    /// element back.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete_min(&mut self) -> usize {
        self.extract_min().map_or(0, |extracted| extracted.links)
    }

    /// Removes the minimum element and returns it with the link count
    pub fn extract_min(&mut self) -> Option<Extracted<T>> {
        let z = self.min?;

        // Promote children to the root ring
        if let Some(child) = self.nodes[z].child.take() {
            let children = ring::members(&self.nodes, child);
            for &c in &children {
                let node = &mut self.nodes[c];
                node.parent = None;
                node.lost = 0;
            }
            self.trees += children.len();
            self.nodes[z].rank = 0;
            ring::splice(&mut self.nodes, z, child);
        }

        self.remove_root(z);
        self.len -= 1;
        self.trees -= 1;

        let links = self.consolidate();

        let node = self.nodes.remove(z)?;
        Some(Extracted {
            key: node.key,
            payload: node.payload,
            links,
        })
    }

    /// Decreases the key of an element by `diff`, returning the number of cuts performed
    ///
    /// # Errors
    /// - `HeapError::InvalidHandle` if the element is not in this heap
    /// - `HeapError::DiffOutOfRange` unless `0 < diff < key`
    ///
    /// The heap is unchanged on error.
    ///
    /// # Time Complexity
    /// O(1) amortized for the classical threshold
    pub fn decrease_key(
        &mut self,
        handle: &FibonacciHandle,
        diff: Key,
    ) -> Result<usize, HeapError> {
        let id = handle.node;
        let key = self.key(handle).ok_or(HeapError::InvalidHandle)?;
        if diff <= 0 || diff >= key {
            return Err(HeapError::DiffOutOfRange { diff, key });
        }
        self.nodes[id].key = key - diff;
        Ok(self.restore_order(id))
    }

    /// Removes an element, returning the number of links performed
    ///
    /// Returns 0 if the handle is stale. The cuts made while moving the element
    /// to the top still count towards [`FibonacciHeap::total_cuts`] but are not
    /// part of the return value.
    pub fn delete(&mut self, handle: &FibonacciHandle) -> usize {
        self.remove(handle).map_or(0, |extracted| extracted.links)
    }

    /// Removes an element and returns it with the key it held before removal
    pub fn remove(&mut self, handle: &FibonacciHandle) -> Option<Extracted<T>> {
        let id = handle.node;
        let key = self.key(handle)?;
        let floor = self.min.map_or(1, |min| self.nodes[min].key) - 1;

        // Drive the node below every other key. This bypasses the public
        // `0 < diff < key` check: the floor may be 0.
        self.nodes[id].key = floor;
        self.restore_order(id);
        debug_assert_eq!(self.min, Some(id));

        let mut extracted = self.extract_min()?;
        extracted.key = key;
        Some(extracted)
    }

    /// Merges another heap into this one, consuming the other heap
    ///
    /// Handles issued by `other` remain valid for `self`. Lifetime counters are
    /// summed; `self` keeps its own threshold. Melding an empty heap does
    /// nothing.
    ///
    /// # Time Complexity
    /// O(1) when either heap has never absorbed another one. In general
    /// O(min(k, m)), where k and m count the heaps whose elements `self` and
    /// `other` still hold: the smaller set of arena segments is moved into
    /// the larger. Rings are spliced in O(1) and no element is touched.
    pub fn meld(&mut self, other: Self) {
        let FibonacciHeap {
            nodes,
            min: other_min,
            len,
            trees,
            total_links,
            total_cuts,
            threshold: _,
        } = other;
        let Some(b) = other_min else {
            return;
        };

        self.nodes.absorb(nodes);
        match self.min {
            None => self.min = Some(b),
            Some(a) => {
                ring::splice(&mut self.nodes, a, b);
                if self.nodes[b].key < self.nodes[a].key {
                    self.min = Some(b);
                }
            }
        }
        self.len += len;
        self.trees += trees;
        self.total_links += total_links;
        self.total_cuts += total_cuts;
    }

    // ------------------------------------------------------------------
    // Root ring
    // ------------------------------------------------------------------

    /// Puts the singleton `id` into the root ring next to the minimum,
    /// making it the minimum if it is smaller or the ring was empty.
    fn add_root(&mut self, id: NodeId) {
        match self.min {
            None => self.min = Some(id),
            Some(min) => {
                ring::insert_after(&mut self.nodes, min, id);
                if self.nodes[id].key < self.nodes[min].key {
                    self.min = Some(id);
                }
            }
        }
    }

    /// Takes `id` out of the root ring. If it was the minimum, the pointer moves
    /// to a remaining neighbor (not necessarily the new minimum).
    fn remove_root(&mut self, id: NodeId) {
        let rest = ring::unlink(&mut self.nodes, id);
        if self.min == Some(id) {
            self.min = rest;
        }
    }

    // ------------------------------------------------------------------
    // Consolidation
    // ------------------------------------------------------------------

    /// Merges roots of equal rank until every rank occurs at most once,
    /// then rebuilds the root ring and the minimum. Returns the links made.
    fn consolidate(&mut self) -> usize {
        let Some(start) = self.min else {
            return 0;
        };

        // Ranks can exceed this bound for thresholds above 2; the table grows
        let mut by_rank: SmallVec<[Option<NodeId>; 32]> = smallvec![None; rank_bound(self.len)];
        let roots = ring::members(&self.nodes, start);
        let mut links = 0;

        for root in roots {
            let mut x = root;
            let mut rank = self.nodes[x].rank;
            loop {
                if rank >= by_rank.len() {
                    by_rank.resize(rank + 1, None);
                }
                let Some(mut y) = by_rank[rank].take() else {
                    break;
                };
                if self.nodes[y].key < self.nodes[x].key {
                    std::mem::swap(&mut x, &mut y);
                }
                self.link(y, x);
                links += 1;
                rank = self.nodes[x].rank;
            }
            by_rank[rank] = Some(x);
        }

        self.min = None;
        self.trees = 0;
        for root in by_rank.into_iter().flatten() {
            ring::make_singleton(&mut self.nodes, root);
            self.add_root(root);
            self.trees += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(links, trees = self.trees, len = self.len, "consolidated root ring");

        links
    }

    /// Makes root `child` a child of root `parent`.
    fn link(&mut self, child: NodeId, parent: NodeId) {
        self.remove_root(child);
        match self.nodes[parent].child {
            Some(first) => ring::insert_after(&mut self.nodes, first, child),
            None => self.nodes[parent].child = Some(child),
        }

        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.lost = 0;
        self.nodes[parent].rank += 1;
        self.total_links += 1;
        self.trees -= 1;
    }

    // ------------------------------------------------------------------
    // Cuts
    // ------------------------------------------------------------------

    /// Restores heap order after the key of `id` went down: cuts `id` from its
    /// parent if needed, cascades up through ancestors that reached the
    /// threshold, and updates the minimum. Returns the cuts made.
    fn restore_order(&mut self, id: NodeId) -> usize {
        let mut cuts = 0;

        if let Some(parent) = self.nodes[id].parent {
            if self.nodes[id].key < self.nodes[parent].key {
                self.cut(id, parent);
                cuts += 1;

                // Iterative, so deep trees cannot exhaust the stack
                let threshold = self.threshold.get();
                let mut current = parent;
                while let Some(grandparent) = self.nodes[current].parent {
                    if self.nodes[current].lost < threshold {
                        break;
                    }
                    self.cut(current, grandparent);
                    cuts += 1;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(cuts, threshold, "cascading cut");
                    current = grandparent;
                }
            }
        }

        if let Some(min) = self.min {
            if self.nodes[id].key < self.nodes[min].key {
                self.min = Some(id);
            }
        }
        cuts
    }

    /// Detaches `id` from `parent` and moves it to the root ring.
    fn cut(&mut self, id: NodeId, parent: NodeId) {
        let rest = ring::unlink(&mut self.nodes, id);
        let p = &mut self.nodes[parent];
        if p.child == Some(id) {
            p.child = rest;
        }
        p.rank -= 1;
        if p.parent.is_some() {
            p.lost += 1;
        }

        let node = &mut self.nodes[id];
        node.parent = None;
        node.lost = 0;
        self.add_root(id);
        self.trees += 1;
        self.total_cuts += 1;
    }

    // ------------------------------------------------------------------
    // Structure access for the invariant audit
    // ------------------------------------------------------------------

    pub(crate) fn nodes(&self) -> &NodeArena<Node<T>> {
        &self.nodes
    }

    pub(crate) fn min_id(&self) -> Option<NodeId> {
        self.min
    }
}

/// Initial rank table size: `floor(log2(max(n, 1))) + 5`
fn rank_bound(n: usize) -> usize {
    n.max(1).ilog2() as usize + 5
}

impl<T: std::fmt::Debug> std::fmt::Debug for FibonacciHeap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("trees", &self.trees)
            .field("min", &self.find_min().map(|m| (m.key, m.payload)))
            .field("total_links", &self.total_links)
            .field("total_cuts", &self.total_cuts)
            .field("threshold", &self.threshold)
            .finish()
    }
}
