//! Arena storage for heap nodes
//!
//! Nodes are kept in [`slotmap`] arenas and addressed by [`NodeId`] instead of
//! raw pointers. Ring and parent links are plain ids, so the cyclic node graph
//! needs no reference counting and no `unsafe`.
//!
//! # Segments
//!
//! A [`NodeArena`] is a set of *segments*, each a `SlotMap` tagged with a
//! process-unique [`SegmentId`]. New nodes always go into the arena's home
//! segment. [`NodeArena::absorb`] merges the smaller set of segments into the
//! larger one without touching any node, and leaves every id issued by the
//! absorbed arena valid.
//!
//! Slotmap keys are generational, so an id whose node has been removed, or an
//! id minted by an unrelated arena, resolves to `None` rather than aliasing a
//! different node.

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Slot key inside one segment
    pub struct SlotKey;
}

/// Process-unique tag of one arena segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SegmentId(u64);

impl SegmentId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(0);
        SegmentId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Stable address of a node: its segment plus its slot in that segment
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    segment: SegmentId,
    slot: SlotKey,
}

/// Segmented slotmap arena
#[derive(Debug)]
pub struct NodeArena<N> {
    home: SegmentId,
    segments: FxHashMap<SegmentId, SlotMap<SlotKey, N>>,
    len: usize,
}

impl<N> NodeArena<N> {
    /// Creates an empty arena with a fresh home segment.
    pub fn new() -> Self {
        let home = SegmentId::fresh();
        let mut segments = FxHashMap::default();
        segments.insert(home, SlotMap::with_key());
        Self {
            home,
            segments,
            len: 0,
        }
    }

    /// Number of live nodes across all segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of segments currently held, the home segment included.
    #[cfg(test)]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Inserts a node built from its own id.
    ///
    /// Ring nodes start as singletons pointing at themselves, so the
    /// constructor needs to know the id before the node exists.
    pub fn insert_with_id(&mut self, build: impl FnOnce(NodeId) -> N) -> NodeId {
        let segment = self.home;
        let slots = self.segments.entry(segment).or_default();
        let slot = slots.insert_with_key(|slot| build(NodeId { segment, slot }));
        self.len += 1;
        NodeId { segment, slot }
    }

    /// Removes a node, releasing its segment if it was an absorbed segment
    /// that is now empty.
    pub fn remove(&mut self, id: NodeId) -> Option<N> {
        let slots = self.segments.get_mut(&id.segment)?;
        let node = slots.remove(id.slot)?;
        if slots.is_empty() && id.segment != self.home {
            self.segments.remove(&id.segment);
        }
        self.len -= 1;
        Some(node)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.segments.get(&id.segment)?.get(id.slot)
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.segments.get_mut(&id.segment)?.get_mut(id.slot)
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Takes ownership of every non-empty segment of `other`.
    ///
    /// The smaller segment map is moved into the larger one, so the cost is
    /// O(min(segments of self, segments of other)).
    pub fn absorb(&mut self, mut other: NodeArena<N>) {
        self.len += other.len;
        if other.segments.len() > self.segments.len() {
            std::mem::swap(&mut self.segments, &mut other.segments);
        }
        let home = self.home;
        self.segments.extend(
            other
                .segments
                .into_iter()
                .filter(|(id, slots)| *id == home || !slots.is_empty()),
        );
    }
}

impl<N> Index<NodeId> for NodeArena<N> {
    type Output = N;

    fn index(&self, id: NodeId) -> &N {
        match self.get(id) {
            Some(node) => node,
            None => panic!("dangling node id {id:?}"),
        }
    }
}

impl<N> IndexMut<NodeId> for NodeArena<N> {
    fn index_mut(&mut self, id: NodeId) -> &mut N {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("dangling node id {id:?}"),
        }
    }
}
