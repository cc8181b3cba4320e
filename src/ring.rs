//! Circular doubly-linked rings over arena ids
//!
//! The same primitives serve the root ring and every child ring. A node embeds
//! a [`RingLink`] and exposes it through [`Linked`], in the spirit of an
//! intrusive list, but the links are [`NodeId`]s resolved through the arena.
//!
//! In a ring:
//! - A single node points to itself (both `next` and `prev`)
//! - There is no head; any member can serve as the entry point
//! - Splicing two rings together is O(1)

use smallvec::SmallVec;

use crate::storage::{NodeArena, NodeId};

/// Neighbor links of a node inside whichever ring currently holds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingLink {
    next: NodeId,
    prev: NodeId,
}

impl RingLink {
    /// Links of a ring containing only `id`.
    #[inline]
    pub fn singleton(id: NodeId) -> Self {
        RingLink { next: id, prev: id }
    }

    #[inline]
    pub fn next(&self) -> NodeId {
        self.next
    }

    #[inline]
    pub fn prev(&self) -> NodeId {
        self.prev
    }
}

/// Nodes that embed a [`RingLink`].
pub trait Linked {
    fn ring(&self) -> &RingLink;
    fn ring_mut(&mut self) -> &mut RingLink;
}

/// Ring members gathered before a pass that rewires them.
pub type Members = SmallVec<[NodeId; 16]>;

#[inline]
pub fn next<N: Linked>(arena: &NodeArena<N>, id: NodeId) -> NodeId {
    arena[id].ring().next
}

/// Turns `id` into a ring of one, forgetting its old neighbors.
#[inline]
pub fn make_singleton<N: Linked>(arena: &mut NodeArena<N>, id: NodeId) {
    *arena[id].ring_mut() = RingLink::singleton(id);
}

/// Inserts the singleton `new` right after `at`.
pub fn insert_after<N: Linked>(arena: &mut NodeArena<N>, at: NodeId, new: NodeId) {
    debug_assert!(is_singleton(arena, new), "inserted node is already in a ring");
    let after = arena[at].ring().next;
    *arena[new].ring_mut() = RingLink {
        next: after,
        prev: at,
    };
    arena[after].ring_mut().prev = new;
    arena[at].ring_mut().next = new;
}

/// Detaches `id` from its ring, repairing the neighbors.
///
/// Returns a member that is still in the ring, or `None` if `id` was alone.
/// Afterwards `id` is a singleton.
pub fn unlink<N: Linked>(arena: &mut NodeArena<N>, id: NodeId) -> Option<NodeId> {
    let RingLink { next, prev } = *arena[id].ring();
    if next == id {
        return None;
    }
    arena[prev].ring_mut().next = next;
    arena[next].ring_mut().prev = prev;
    make_singleton(arena, id);
    Some(next)
}

/// Joins the ring holding `a` with the (distinct) ring holding `b` by
/// exchanging two pairs of neighbor links.
pub fn splice<N: Linked>(arena: &mut NodeArena<N>, a: NodeId, b: NodeId) {
    let a_next = arena[a].ring().next;
    let b_next = arena[b].ring().next;
    arena[a].ring_mut().next = b_next;
    arena[b_next].ring_mut().prev = a;
    arena[b].ring_mut().next = a_next;
    arena[a_next].ring_mut().prev = b;
}

#[inline]
pub fn is_singleton<N: Linked>(arena: &NodeArena<N>, id: NodeId) -> bool {
    arena[id].ring().next == id
}

/// Walks the ring once starting at `start`.
pub fn members<N: Linked>(arena: &NodeArena<N>, start: NodeId) -> Members {
    let mut out = Members::new();
    let mut current = start;
    loop {
        out.push(current);
        current = next(arena, current);
        if current == start {
            break;
        }
    }
    out
}
