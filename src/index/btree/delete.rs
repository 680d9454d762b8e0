//! Deletion and underflow repair.
//!
//! Removing a key can leave a non-root node below its minimum occupancy.
//! The node first tries to borrow one entry from an adjacent sibling under
//! the same parent. If neither sibling can spare one, the node and a sibling
//! merge, the parent loses a key, and the parent is repaired the same way.
//! An internal root left with no keys is replaced by its only child.

use std::fmt;

use tracing::{debug, trace};

use crate::common::{NodeId, RecordLocator};

use super::node::Node;
use super::stats::TreeStats;
use super::tree::BPlusTree;

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    // ========================================================================
    // Public API: Remove
    // ========================================================================

    /// Remove `key` and return its locator.
    ///
    /// Removing an absent key (or anything from an empty tree) is a no-op
    /// that returns `None`.
    pub fn remove(&mut self, key: &K) -> Option<RecordLocator> {
        let leaf_id = self.find_leaf(key)?;
        let leaf = self.arena.leaf_mut(leaf_id);
        let pos = leaf.search(key).ok()?;
        let (_, locator) = leaf.remove_at(pos);

        trace!(?key, %locator, "remove");
        self.len -= 1;
        TreeStats::bump(&self.stats.removes);

        self.rebalance(leaf_id);
        Some(locator)
    }

    // ========================================================================
    // Internal: Underflow repair
    // ========================================================================

    /// Restore occupancy of `node_id` after it lost an entry.
    fn rebalance(&mut self, node_id: NodeId) {
        let node = self.arena.get(node_id);
        let Some(parent_id) = node.parent() else {
            self.collapse_root(node_id);
            return;
        };
        if node.key_count() >= self.config.min_keys(node.is_leaf()) {
            return;
        }

        let slot = self.child_slot(parent_id, node_id);
        let siblings = &self.arena.internal(parent_id).children;
        let left = slot.checked_sub(1).map(|i| siblings[i]);
        let right = siblings.get(slot + 1).copied();

        if let Some(left_id) = left {
            if self.has_surplus(left_id) && self.borrow_from_left(parent_id, slot, left_id, node_id) {
                return;
            }
        }
        if let Some(right_id) = right {
            if self.has_surplus(right_id) && self.borrow_from_right(parent_id, slot, node_id, right_id) {
                return;
            }
        }

        match (left, right) {
            (Some(_), _) => self.merge(parent_id, slot - 1),
            (None, Some(_)) => self.merge(parent_id, slot),
            (None, None) => panic!("{node_id} is a non-root node without siblings"),
        }
    }

    /// Whether `id` can give up an entry and stay at or above its minimum.
    fn has_surplus(&self, id: NodeId) -> bool {
        let node = self.arena.get(id);
        node.key_count() > self.config.min_keys(node.is_leaf())
    }

    /// Move the last entry of `left_id` into `node_id`, which sits at `slot`.
    fn borrow_from_left(&mut self, parent_id: NodeId, slot: usize, left_id: NodeId, node_id: NodeId) -> bool {
        let separator = self.arena.internal(parent_id).keys[slot - 1].clone();

        let (new_separator, moved_child) = match self.arena.pair_mut(left_id, node_id) {
            (Node::Leaf(left), Node::Leaf(node)) => (node.borrow_last_from(left), None),
            (Node::Internal(left), Node::Internal(node)) => match node.borrow_last_from(left, separator) {
                Some((key, child)) => (Some(key), Some(child)),
                None => (None, None),
            },
            _ => panic!("siblings {left_id} and {node_id} are on different levels"),
        };
        let Some(new_separator) = new_separator else {
            return false;
        };

        if let Some(child) = moved_child {
            self.arena.get_mut(child).set_parent(Some(node_id));
        }
        self.arena.internal_mut(parent_id).keys[slot - 1] = new_separator;

        TreeStats::bump(&self.stats.redistributions);
        debug!(from = %left_id, to = %node_id, "borrowed from left sibling");
        true
    }

    /// Move the first entry of `right_id` into `node_id`, which sits at `slot`.
    fn borrow_from_right(&mut self, parent_id: NodeId, slot: usize, node_id: NodeId, right_id: NodeId) -> bool {
        let separator = self.arena.internal(parent_id).keys[slot].clone();

        let (new_separator, moved_child) = match self.arena.pair_mut(node_id, right_id) {
            (Node::Leaf(node), Node::Leaf(right)) => (node.borrow_first_from(right), None),
            (Node::Internal(node), Node::Internal(right)) => match node.borrow_first_from(right, separator) {
                Some((key, child)) => (Some(key), Some(child)),
                None => (None, None),
            },
            _ => panic!("siblings {node_id} and {right_id} are on different levels"),
        };
        let Some(new_separator) = new_separator else {
            return false;
        };

        if let Some(child) = moved_child {
            self.arena.get_mut(child).set_parent(Some(node_id));
        }
        self.arena.internal_mut(parent_id).keys[slot] = new_separator;

        TreeStats::bump(&self.stats.redistributions);
        debug!(from = %right_id, to = %node_id, "borrowed from right sibling");
        true
    }

    /// Fold `children[sep + 1]` into `children[sep]` and drop `keys[sep]`.
    ///
    /// The right node's slot is freed only after every link to it is gone:
    /// its successor in the leaf chain points back at the survivor, and its
    /// children name the survivor as parent.
    fn merge(&mut self, parent_id: NodeId, sep: usize) {
        let parent = self.arena.internal_mut(parent_id);
        let left_id = parent.children[sep];
        let right_id = parent.children.remove(sep + 1);
        let separator = parent.keys.remove(sep);

        let right = self.arena.free(right_id);
        let relink = match (self.arena.get_mut(left_id), right) {
            (Node::Leaf(left), Node::Leaf(right)) => {
                let next = right.next;
                left.absorb(right);
                Relink::Successor(next)
            }
            (Node::Internal(left), Node::Internal(right)) => {
                let children = right.children.clone();
                left.absorb(separator, right);
                Relink::Children(children)
            }
            _ => panic!("siblings {left_id} and {right_id} are on different levels"),
        };

        match relink {
            Relink::Successor(Some(next)) => self.arena.leaf_mut(next).prev = Some(left_id),
            Relink::Successor(None) => {}
            Relink::Children(children) => {
                for child in children {
                    self.arena.get_mut(child).set_parent(Some(left_id));
                }
            }
        }

        TreeStats::bump(&self.stats.merges);
        debug!(into = %left_id, freed = %right_id, "merged siblings");

        self.rebalance(parent_id);
    }

    /// Shrink the tree when the root has run out of keys.
    ///
    /// An internal root is replaced by its only child; an empty root leaf
    /// means the tree is empty.
    fn collapse_root(&mut self, root_id: NodeId) {
        let replacement = match self.arena.get(root_id) {
            Node::Internal(root) if root.keys.is_empty() => root.children.first().copied(),
            Node::Leaf(root) if root.keys.is_empty() => None,
            _ => return,
        };

        match replacement {
            Some(child) => {
                self.arena.free(root_id);
                self.arena.get_mut(child).set_parent(None);
                self.root = Some(child);

                TreeStats::bump(&self.stats.root_collapses);
                debug!(old = %root_id, new = %child, height = self.height(), "collapsed root");
            }
            None => {
                self.arena.clear();
                self.root = None;
                debug!("tree is empty");
            }
        }
    }
}

/// Links that must be redirected to the surviving node of a merge.
enum Relink {
    /// Leaf merge: the absorbed leaf's successor in the chain.
    Successor(Option<NodeId>),
    /// Internal merge: the absorbed node's children.
    Children(Vec<NodeId>),
}
