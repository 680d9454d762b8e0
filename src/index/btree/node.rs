//! Tree nodes.
//!
//! A [`Node`] is either an [`InternalNode`] that routes searches or a
//! [`LeafNode`] that holds the key/locator pairs. Both carry a non-owning
//! `parent` link so splits and merges can walk back up without searching
//! from the root.

use crate::common::{NodeId, RecordLocator};

/// One node of a B+ tree.
#[derive(Debug, Clone)]
pub(crate) enum Node<K> {
    Internal(InternalNode<K>),
    Leaf(LeafNode<K>),
}

impl<K> Node<K> {
    /// Keys in ascending order.
    #[inline]
    pub(crate) fn keys(&self) -> &[K] {
        match self {
            Node::Internal(node) => &node.keys,
            Node::Leaf(node) => &node.keys,
        }
    }

    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.keys().len()
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Internal(node) => node.parent,
            Node::Leaf(node) => node.parent,
        }
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        match self {
            Node::Internal(node) => node.parent = parent,
            Node::Leaf(node) => node.parent = parent,
        }
    }
}

/// Routing node.
///
/// `children[i]` holds keys `< keys[i]`; `children[i + 1]` holds keys `>= keys[i]`.
/// There is always exactly one more child than there are keys.
#[derive(Debug, Clone)]
pub(crate) struct InternalNode<K> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) keys: Vec<K>,
    pub(crate) children: Vec<NodeId>,
}

impl<K: Ord> InternalNode<K> {
    /// Root created when the old root splits.
    pub(crate) fn new_root(separator: K, left: NodeId, right: NodeId) -> Self {
        Self {
            parent: None,
            keys: vec![separator],
            children: vec![left, right],
        }
    }

    /// Index of the child whose subtree may contain `key`.
    ///
    /// Picks the smallest `i` with `key <= keys[i]`, except that an exact
    /// match routes right, since a separator is the first key of its right
    /// subtree. That is the number of keys `<= key`.
    #[inline]
    pub(crate) fn child_index(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k <= key)
    }

    /// Insert `separator` with `right` as the child directly after it.
    ///
    /// The new key lands at the position that keeps `keys` sorted, which is
    /// also the slot of the child it was split from.
    pub(crate) fn insert_separator(&mut self, separator: K, right: NodeId) {
        let slot = self.child_index(&separator);
        self.keys.insert(slot, separator);
        self.children.insert(slot + 1, right);
    }

    /// Split an overflowing node around `at`.
    ///
    /// `self` keeps `keys[..at]` and `children[..=at]`. Returns the promoted
    /// key plus the keys and children for the new right sibling.
    pub(crate) fn split_off(&mut self, at: usize) -> (K, Vec<K>, Vec<NodeId>) {
        let mut right_keys = self.keys.split_off(at);
        let separator = right_keys.remove(0);
        let right_children = self.children.split_off(at + 1);
        (separator, right_keys, right_children)
    }

    /// Rotate the last entry of `left` through the parent into `self`.
    ///
    /// `separator` is the parent key between the two nodes. Returns the key
    /// that replaces it and the child that moved across.
    pub(crate) fn borrow_last_from(
        &mut self,
        left: &mut InternalNode<K>,
        separator: K,
    ) -> Option<(K, NodeId)> {
        let key = left.keys.pop()?;
        let child = left.children.pop()?;
        self.keys.insert(0, separator);
        self.children.insert(0, child);
        Some((key, child))
    }

    /// Rotate the first entry of `right` through the parent into `self`.
    pub(crate) fn borrow_first_from(
        &mut self,
        right: &mut InternalNode<K>,
        separator: K,
    ) -> Option<(K, NodeId)> {
        if right.keys.is_empty() {
            return None;
        }
        let key = right.keys.remove(0);
        let child = right.children.remove(0);
        self.keys.push(separator);
        self.children.push(child);
        Some((key, child))
    }

    /// Append `right` to `self`, pulling the parent separator down between them.
    pub(crate) fn absorb(&mut self, separator: K, right: InternalNode<K>) {
        self.keys.push(separator);
        self.keys.extend(right.keys);
        self.children.extend(right.children);
    }
}

/// Data node.
///
/// `locators[i]` belongs to `keys[i]`. `prev`/`next` chain every leaf of the
/// tree in key order; they are plain ids and own nothing.
#[derive(Debug, Clone)]
pub(crate) struct LeafNode<K> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) keys: Vec<K>,
    pub(crate) locators: Vec<RecordLocator>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

impl<K: Ord + Clone> LeafNode<K> {
    /// Leaf holding a single entry, used as the first root.
    pub(crate) fn singleton(key: K, locator: RecordLocator) -> Self {
        Self {
            parent: None,
            keys: vec![key],
            locators: vec![locator],
            prev: None,
            next: None,
        }
    }

    /// Position of `key`, or where it would be inserted.
    #[inline]
    pub(crate) fn search(&self, key: &K) -> std::result::Result<usize, usize> {
        self.keys.binary_search(key)
    }

    #[inline]
    pub(crate) fn get(&self, key: &K) -> Option<RecordLocator> {
        self.search(key).ok().map(|i| self.locators[i])
    }

    /// Index of the first key `>= key`; `keys.len()` if there is none.
    #[inline]
    pub(crate) fn lower_bound(&self, key: &K) -> usize {
        self.keys.partition_point(|k| k < key)
    }

    pub(crate) fn insert_at(&mut self, pos: usize, key: K, locator: RecordLocator) {
        self.keys.insert(pos, key);
        self.locators.insert(pos, locator);
    }

    pub(crate) fn remove_at(&mut self, pos: usize) -> (K, RecordLocator) {
        (self.keys.remove(pos), self.locators.remove(pos))
    }

    /// Move `keys[at..]` into a new leaf that follows `self` in the chain.
    ///
    /// The returned leaf already points back at `self_id` and forward at the
    /// old successor. Once it has an id the caller must point `self.next` and
    /// the successor's `prev` at it.
    pub(crate) fn split_off(&mut self, at: usize, self_id: NodeId) -> LeafNode<K> {
        LeafNode {
            parent: self.parent,
            keys: self.keys.split_off(at),
            locators: self.locators.split_off(at),
            prev: Some(self_id),
            next: self.next,
        }
    }

    /// Move the last entry of `left` to the front of `self`.
    ///
    /// Returns the new separator between the two leaves.
    pub(crate) fn borrow_last_from(&mut self, left: &mut LeafNode<K>) -> Option<K> {
        let key = left.keys.pop()?;
        let locator = left.locators.pop()?;
        self.insert_at(0, key, locator);
        self.keys.first().cloned()
    }

    /// Move the first entry of `right` to the end of `self`.
    ///
    /// Returns the new separator between the two leaves.
    pub(crate) fn borrow_first_from(&mut self, right: &mut LeafNode<K>) -> Option<K> {
        if right.keys.is_empty() {
            return None;
        }
        let (key, locator) = right.remove_at(0);
        self.keys.push(key);
        self.locators.push(locator);
        right.keys.first().cloned()
    }

    /// Append every entry of `right` and take over its successor link.
    pub(crate) fn absorb(&mut self, right: LeafNode<K>) {
        self.keys.extend(right.keys);
        self.locators.extend(right.locators);
        self.next = right.next;
    }
}
