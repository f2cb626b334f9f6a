//! Trellis arena for path reconstruction.
//!
//! Each node records one `(time, state)` decision as a state id plus the index
//! of its predecessor node. Paths are singly linked *backwards* from their most
//! recent node, so two paths that agree on a prefix share the same nodes.
//! Nodes are immutable once pushed and are only released all at once by
//! [`TrellisArena::reset`].

use crate::storage::{request_storage, Growth};

/// Index of a node inside a [`TrellisArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One element of a backward-linked path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrellisNode {
    pub state: usize,
    pub predecessor: Option<NodeId>,
}

/// Growable pool owning every trellis node of a decode.
#[derive(Debug, Default)]
pub struct TrellisArena {
    nodes: Vec<TrellisNode>,
}

impl TrellisArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut arena = Self::new();
        arena.reserve(capacity);
        arena
    }

    /// Drop every node but keep the allocation.
    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    /// Make room for at least `total` nodes in all.
    ///
    /// Existing nodes are preserved.
    pub fn reserve(&mut self, total: usize) {
        request_storage(&mut self.nodes, total, Growth::Preserve, "trellis arena");
    }

    /// Append a node extending the path ending at `predecessor`.
    #[inline]
    pub fn push(&mut self, state: usize, predecessor: Option<NodeId>) -> NodeId {
        debug_assert!(predecessor.map_or(true, |p| p.0 < self.nodes.len()));
        let len = self.nodes.len();
        request_storage(&mut self.nodes, len + 1, Growth::Preserve, "trellis arena");
        self.nodes.push(TrellisNode { state, predecessor });
        NodeId(len)
    }

    /// Id of the `index`-th node pushed since the last reset.
    pub fn id_at(&self, index: usize) -> Option<NodeId> {
        (index < self.nodes.len()).then_some(NodeId(index))
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &TrellisNode {
        &self.nodes[id.0]
    }

    /// Number of live nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes the arena can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    /// Iterate the states of a path from its newest node back to its first.
    pub fn walk(&self, tail: NodeId) -> PathIter<'_> {
        PathIter {
            arena: self,
            cursor: Some(tail),
        }
    }

    /// Number of nodes on the path ending at `tail`.
    pub fn chain_len(&self, tail: NodeId) -> usize {
        self.walk(tail).count()
    }
}

/// Backward iterator over the states of one path.
pub struct PathIter<'a> {
    arena: &'a TrellisArena,
    cursor: Option<NodeId>,
}

impl Iterator for PathIter<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        let node = self.arena.get(self.cursor?);
        self.cursor = node.predecessor;
        Some(node.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_share_prefixes() {
        let mut arena = TrellisArena::new();
        let root = arena.push(2, None);
        let a = arena.push(0, Some(root));
        let b = arena.push(1, Some(root));
        let a2 = arena.push(1, Some(a));

        assert_eq!(arena.len(), 4);
        assert_eq!(arena.walk(a2).collect::<Vec<_>>(), vec![1, 0, 2]);
        assert_eq!(arena.walk(b).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(arena.get(a).predecessor, arena.get(b).predecessor);
        assert_eq!(arena.chain_len(a2), 3);
        assert_eq!(arena.chain_len(root), 1);
    }

    #[test]
    fn reset_keeps_capacity() {
        let mut arena = TrellisArena::with_capacity(32);
        let cap = arena.capacity();
        assert!(cap >= 32);
        let mut prev = None;
        for s in 0..10 {
            prev = Some(arena.push(s, prev));
        }
        arena.reset();
        assert!(arena.is_empty());
        assert_eq!(arena.capacity(), cap);
    }

    #[test]
    fn grows_past_reservation_without_losing_nodes() {
        let mut arena = TrellisArena::with_capacity(2);
        let mut prev = None;
        for s in 0..100 {
            prev = Some(arena.push(s % 3, prev));
        }
        let tail = prev.unwrap();
        assert_eq!(arena.chain_len(tail), 100);
        let states: Vec<_> = arena.walk(tail).collect();
        assert_eq!(states[0], 99 % 3);
        assert_eq!(states[99], 0);
    }
}
