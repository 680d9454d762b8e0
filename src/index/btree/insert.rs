//! Insertion and split propagation.
//!
//! A key always lands in a leaf. A leaf that reaches `order` keys splits in
//! two and pushes a copy of the right half's first key into its parent. A
//! parent that overflows in turn splits and moves its middle key up, and so
//! on until a parent has room or the root itself splits.

use std::fmt;

use tracing::{debug, trace};

use crate::common::{Error, NodeId, RecordLocator, Result};

use super::node::{InternalNode, LeafNode, Node};
use super::stats::TreeStats;
use super::tree::BPlusTree;

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    // ========================================================================
    // Public API: Insert
    // ========================================================================

    /// Insert a key with its locator.
    ///
    /// Returns `false` and leaves the tree untouched if `key` is already
    /// present; the stored locator is never overwritten.
    pub fn insert(&mut self, key: K, locator: RecordLocator) -> bool {
        trace!(?key, %locator, "insert");

        let Some(leaf_id) = self.find_leaf(&key) else {
            let root = self.arena.allocate(Node::Leaf(LeafNode::singleton(key, locator)));
            self.root = Some(root);
            self.len = 1;
            TreeStats::bump(&self.stats.inserts);
            return true;
        };

        let leaf = self.arena.leaf_mut(leaf_id);
        let pos = match leaf.search(&key) {
            Ok(_) => {
                TreeStats::bump(&self.stats.duplicate_rejections);
                return false;
            }
            Err(pos) => pos,
        };
        leaf.insert_at(pos, key, locator);
        let overflow = leaf.keys.len() > self.config.max_keys();

        self.len += 1;
        TreeStats::bump(&self.stats.inserts);

        if overflow {
            self.split_leaf(leaf_id);
        }
        true
    }

    /// Like [`insert`](Self::insert), but reports a duplicate as an error.
    ///
    /// # Errors
    /// - `Error::DuplicateKey` if `key` is already present
    pub fn try_insert(&mut self, key: K, locator: RecordLocator) -> Result<()> {
        if self.insert(key, locator) {
            Ok(())
        } else {
            Err(Error::DuplicateKey)
        }
    }

    // ========================================================================
    // Internal: Splits
    // ========================================================================

    /// Split a leaf holding `order` entries.
    ///
    /// The first `ceil(order / 2)` entries stay; the rest move to a new leaf
    /// spliced into the chain right after this one.
    fn split_leaf(&mut self, leaf_id: NodeId) {
        let at = self.config.leaf_split_point();
        let right = self.arena.leaf_mut(leaf_id).split_off(at, leaf_id);
        let old_next = right.next;
        let separator = right.keys[0].clone();

        let right_id = self.arena.allocate(Node::Leaf(right));
        self.arena.leaf_mut(leaf_id).next = Some(right_id);
        if let Some(next) = old_next {
            self.arena.leaf_mut(next).prev = Some(right_id);
        }

        TreeStats::bump(&self.stats.leaf_splits);
        debug!(left = %leaf_id, right = %right_id, ?separator, "split leaf");

        self.insert_in_parent(leaf_id, separator, right_id);
    }

    /// Split an internal node holding `order` keys.
    ///
    /// The middle key moves up rather than being copied: neither half keeps it.
    fn split_internal(&mut self, node_id: NodeId) {
        let at = self.config.internal_split_point();
        let node = self.arena.internal_mut(node_id);
        let (separator, keys, children) = node.split_off(at);
        let parent = node.parent;

        let moved = children.clone();
        let right_id = self.arena.allocate(Node::Internal(InternalNode {
            parent,
            keys,
            children,
        }));
        for child in moved {
            self.arena.get_mut(child).set_parent(Some(right_id));
        }

        TreeStats::bump(&self.stats.internal_splits);
        debug!(left = %node_id, right = %right_id, ?separator, "split internal node");

        self.insert_in_parent(node_id, separator, right_id);
    }

    /// Hook a freshly split-off `right` sibling into the parent of `left`.
    fn insert_in_parent(&mut self, left: NodeId, separator: K, right: NodeId) {
        let Some(parent_id) = self.arena.get(left).parent() else {
            let root = self
                .arena
                .allocate(Node::Internal(InternalNode::new_root(separator, left, right)));
            self.arena.get_mut(left).set_parent(Some(root));
            self.arena.get_mut(right).set_parent(Some(root));
            self.root = Some(root);

            TreeStats::bump(&self.stats.root_splits);
            debug!(%root, height = self.height(), "grew new root");
            return;
        };

        self.arena.get_mut(right).set_parent(Some(parent_id));
        let parent = self.arena.internal_mut(parent_id);
        parent.insert_separator(separator, right);
        debug_assert_eq!(
            parent.children.iter().position(|&c| c == right),
            parent.children.iter().position(|&c| c == left).map(|slot| slot + 1),
            "new sibling must sit right after the node it split from"
        );

        if parent.keys.len() > self.config.max_keys() {
            self.split_internal(parent_id);
        }
    }
}
