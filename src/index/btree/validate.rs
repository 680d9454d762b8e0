//! Structural invariant checks.
//!
//! None of this runs on the hot path. Tests call
//! [`BPlusTree::check_invariants`] after mutations to prove the split and
//! merge code keeps the tree well formed.

use std::fmt;

use crate::common::{Error, NodeId, Result};

use super::node::Node;
use super::tree::BPlusTree;

/// Build an `Error::InvariantViolation` from a format string.
macro_rules! violation {
    ($($arg:tt)*) => {
        Err(Error::InvariantViolation(format!($($arg)*)))
    };
}

/// What the structural walk learned about the leaves, left to right.
struct Walk {
    leaves: Vec<NodeId>,
    leaf_depth: Option<usize>,
}

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    /// Verify every structural invariant of the tree.
    ///
    /// # Checks
    /// - keys strictly increase within every node
    /// - non-root nodes hold between their minimum and `order - 1` keys
    /// - internal nodes have one more child than keys; an internal root has a key
    /// - every child's parent link names the node that holds it
    /// - every key lies within the bounds set by its ancestors' separators
    /// - all leaves sit at the same depth
    /// - the leaf chain visits exactly the leaves, left to right, with
    ///   matching `prev` links, and yields `len()` strictly increasing keys
    ///
    /// # Errors
    /// - `Error::InvariantViolation` describing the first broken invariant
    pub fn check_invariants(&self) -> Result<()> {
        let Some(root) = self.root else {
            if self.len != 0 || self.arena.len() != 0 {
                return violation!(
                    "empty tree reports {} keys and {} nodes",
                    self.len,
                    self.arena.len()
                );
            }
            return Ok(());
        };

        if self.arena.get(root).parent().is_some() {
            return violation!("root {root} has a parent");
        }

        let mut walk = Walk {
            leaves: Vec::new(),
            leaf_depth: None,
        };
        let visited = self.check_subtree(root, None, None, 0, &mut walk)?;
        if visited != self.arena.len() {
            return violation!(
                "{} nodes reachable from the root but {} live in the arena",
                visited,
                self.arena.len()
            );
        }

        self.check_leaf_chain(&walk.leaves)
    }

    /// Check the subtree at `id` and return how many nodes it contains.
    ///
    /// Keys must satisfy `lower <= key < upper`.
    fn check_subtree(
        &self,
        id: NodeId,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        walk: &mut Walk,
    ) -> Result<usize> {
        if !self.arena.is_live(id) {
            return violation!("link to freed {id}");
        }
        let node = self.arena.get(id);
        let keys = node.keys();
        let is_root = Some(id) == self.root;

        if let Some(pair) = keys.windows(2).find(|pair| pair[0] >= pair[1]) {
            return violation!("{id} keys out of order: {:?} >= {:?}", pair[0], pair[1]);
        }
        if keys.len() > self.config.max_keys() {
            return violation!("{id} overflows with {} keys", keys.len());
        }
        let min = self.config.min_keys(node.is_leaf());
        if !is_root && keys.len() < min {
            return violation!("{id} underflows with {} keys (min {min})", keys.len());
        }
        if let Some(first) = keys.first() {
            if lower.is_some_and(|lower| first < lower) {
                return violation!("{id} key {first:?} below separator {lower:?}");
            }
        }
        if let Some(last) = keys.last() {
            if upper.is_some_and(|upper| last >= upper) {
                return violation!("{id} key {last:?} not below separator {upper:?}");
            }
        }

        match node {
            Node::Leaf(leaf) => {
                if leaf.locators.len() != leaf.keys.len() {
                    return violation!(
                        "{id} has {} keys but {} locators",
                        leaf.keys.len(),
                        leaf.locators.len()
                    );
                }
                if is_root && leaf.keys.is_empty() {
                    return violation!("empty root leaf {id} left in place");
                }
                match walk.leaf_depth {
                    Some(expected) if expected != depth => {
                        return violation!("{id} at depth {depth}, other leaves at {expected}");
                    }
                    _ => walk.leaf_depth = Some(depth),
                }
                walk.leaves.push(id);
                Ok(1)
            }
            Node::Internal(internal) => {
                if internal.keys.is_empty() {
                    return violation!("internal {id} has no keys");
                }
                if internal.children.len() != internal.keys.len() + 1 {
                    return violation!(
                        "{id} has {} keys but {} children",
                        internal.keys.len(),
                        internal.children.len()
                    );
                }

                let mut count = 1;
                for (i, &child) in internal.children.iter().enumerate() {
                    if !self.arena.is_live(child) {
                        return violation!("{id} links to freed child {child}");
                    }
                    if self.arena.get(child).parent() != Some(id) {
                        return violation!(
                            "{child} is a child of {id} but names {:?} as parent",
                            self.arena.get(child).parent()
                        );
                    }
                    let child_lower = if i == 0 { lower } else { Some(&internal.keys[i - 1]) };
                    let child_upper = internal.keys.get(i).or(upper);
                    count += self.check_subtree(child, child_lower, child_upper, depth + 1, walk)?;
                }
                Ok(count)
            }
        }
    }

    /// Follow `next` from the leftmost leaf and compare against the tree walk.
    fn check_leaf_chain(&self, leaves: &[NodeId]) -> Result<()> {
        let mut expected = leaves.iter();
        let mut cursor = self.leftmost_leaf();
        let mut prev: Option<NodeId> = None;
        let mut last_key: Option<&K> = None;
        let mut keys_seen = 0;

        while let Some(id) = cursor {
            if !self.arena.is_live(id) {
                return violation!("leaf chain links to freed {id}");
            }
            if expected.next() != Some(&id) {
                return violation!("leaf chain reaches {id} out of tree order");
            }
            let leaf = match self.arena.get(id) {
                Node::Leaf(leaf) => leaf,
                Node::Internal(_) => return violation!("leaf chain reaches internal {id}"),
            };
            if leaf.prev != prev {
                return violation!("{id} prev is {:?}, expected {:?}", leaf.prev, prev);
            }
            for key in &leaf.keys {
                if last_key.is_some_and(|last| last >= key) {
                    return violation!("leaf chain not strictly increasing at {key:?}");
                }
                last_key = Some(key);
            }
            keys_seen += leaf.keys.len();
            prev = cursor;
            cursor = leaf.next;
        }

        if let Some(missed) = expected.next() {
            return violation!("leaf chain ends before reaching {missed}");
        }
        if keys_seen != self.len {
            return violation!("leaf chain holds {keys_seen} keys, tree reports {}", self.len);
        }
        Ok(())
    }
}
