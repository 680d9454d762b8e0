//! Slot arena that owns every node of one tree.
//!
//! Nodes refer to each other by [`NodeId`] instead of pointers. Parent,
//! child and leaf-chain links are all plain ids, so freeing a node can never
//! leave a dangling reference behind: a stale id hits an empty slot and
//! panics instead of reading reused memory.

use crate::common::NodeId;

use super::node::{InternalNode, LeafNode, Node};

/// Owns the nodes of a tree.
///
/// # Layout
/// ```text
/// slots:     [Some(n0)] [None] [Some(n2)] [Some(n3)] [None]
/// free_list: [4, 1]              (LIFO: slot 1 is reused next)
/// ```
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<K> {
    /// Node storage. `None` marks a vacated slot.
    slots: Vec<Option<Node<K>>>,

    /// Stack of vacated slot ids (LIFO for cache locality).
    free_list: Vec<NodeId>,

    /// Number of occupied slots.
    live: usize,
}

impl<K> NodeArena<K> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            live: 0,
        }
    }

    /// Number of live nodes.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.live
    }

    /// Store `node`, reusing a vacated slot when one is available.
    pub(crate) fn allocate(&mut self, node: Node<K>) -> NodeId {
        self.live += 1;
        match self.free_list.pop() {
            Some(id) => {
                self.slots[id.0] = Some(node);
                id
            }
            None => {
                self.slots.push(Some(node));
                NodeId::new(self.slots.len() - 1)
            }
        }
    }

    /// Remove a node and hand it back to the caller.
    ///
    /// # Panics
    /// Panics if `id` is not live.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<K> {
        match self.slots.get_mut(id.0).and_then(Option::take) {
            Some(node) => {
                self.live -= 1;
                self.free_list.push(id);
                node
            }
            None => panic!("double free of {id}"),
        }
    }

    /// Drop every node.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.live = 0;
    }

    #[inline]
    pub(crate) fn is_live(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    /// # Panics
    /// Panics if `id` is not live.
    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<K> {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("{id} is not a live node"),
        }
    }

    /// # Panics
    /// Panics if `id` is not live.
    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("{id} is not a live node"),
        }
    }

    #[inline]
    pub(crate) fn leaf(&self, id: NodeId) -> &LeafNode<K> {
        match self.get(id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("{id} is not a leaf"),
        }
    }

    #[inline]
    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<K> {
        match self.get_mut(id) {
            Node::Leaf(leaf) => leaf,
            Node::Internal(_) => panic!("{id} is not a leaf"),
        }
    }

    #[inline]
    pub(crate) fn internal(&self, id: NodeId) -> &InternalNode<K> {
        match self.get(id) {
            Node::Internal(node) => node,
            Node::Leaf(_) => panic!("{id} is not an internal node"),
        }
    }

    #[inline]
    pub(crate) fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode<K> {
        match self.get_mut(id) {
            Node::Internal(node) => node,
            Node::Leaf(_) => panic!("{id} is not an internal node"),
        }
    }

    /// Mutable access to two distinct nodes at once, returned in argument order.
    ///
    /// # Panics
    /// Panics if `a == b` or either id is not live.
    pub(crate) fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut Node<K>, &mut Node<K>) {
        assert_ne!(a, b, "pair_mut needs two distinct nodes");

        let (low, high) = if a.0 < b.0 { (a, b) } else { (b, a) };
        let (head, tail) = self.slots.split_at_mut(high.0);
        let (low_node, high_node) = match (head.get_mut(low.0), tail.first_mut()) {
            (Some(Some(l)), Some(Some(h))) => (l, h),
            _ => panic!("{a} and {b} must both be live nodes"),
        };

        if a.0 < b.0 {
            (low_node, high_node)
        } else {
            (high_node, low_node)
        }
    }
}

impl<K> Default for NodeArena<K> {
    fn default() -> Self {
        Self::new()
    }
}
