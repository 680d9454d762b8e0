//! The [`BPlusTree`] type: construction, descent and point lookups.
//!
//! Mutations live next door in `insert.rs` and `delete.rs`; scans in `iter.rs`.

use std::fmt;

use crate::common::{NodeId, RecordLocator, Result, TreeConfig};

use super::arena::NodeArena;
use super::node::Node;
use super::stats::TreeStats;

/// An in-memory B+ tree mapping unique keys to record locators.
///
/// # Architecture
/// ```text
///                      ┌───────────────┐
///                      │ root Internal │
///                      │   [20 | 40]   │
///                      └───────────────┘
///                     /        |        \
///        ┌─────────────┐ ┌─────────────┐ ┌─────────────┐
///        │ Leaf 10 15  │⇄│ Leaf 20 30  │⇄│ Leaf 40 50  │
///        └─────────────┘ └─────────────┘ └─────────────┘
/// ```
/// Every node lives in a [`NodeArena`] slot and is addressed by [`NodeId`].
/// Internal nodes own their children through the arena; the leaf chain
/// (`⇄`) and each node's parent link are plain ids used for traversal.
///
/// # Thread Safety
/// None inside the tree. Reads take `&self`, writes take `&mut self`; wrap
/// the tree in [`SharedBPlusTree`](crate::SharedBPlusTree) to share it
/// between threads.
///
/// # Usage
/// ```
/// use leafchain::{BPlusTree, RecordLocator};
///
/// let mut tree = BPlusTree::new(4).unwrap();
/// assert!(tree.insert(7, RecordLocator::new(1, 0)));
/// assert!(!tree.insert(7, RecordLocator::new(2, 0)));
///
/// assert_eq!(tree.get_value(&7), Some(RecordLocator::new(1, 0)));
/// assert_eq!(tree.range_scan(&0, &10).count(), 1);
/// ```
#[derive(Clone)]
pub struct BPlusTree<K> {
    /// Owns every node.
    pub(crate) arena: NodeArena<K>,

    /// `None` when the tree is empty.
    pub(crate) root: Option<NodeId>,

    /// Fanout and occupancy bounds (immutable after construction).
    pub(crate) config: TreeConfig,

    /// Number of keys stored.
    pub(crate) len: usize,

    /// Operation counters.
    pub(crate) stats: TreeStats,
}

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    /// Create an empty tree with the given fanout.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < MIN_ORDER`
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::with_config(TreeConfig::new(order)?))
    }

    /// Create an empty tree from an already validated config.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            arena: NodeArena::new(),
            root: None,
            config,
            len: 0,
            stats: TreeStats::new(),
        }
    }

    // ========================================================================
    // Public API: Shape
    // ========================================================================

    /// Returns true if the tree holds no keys.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of keys stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Fanout of this tree.
    #[inline]
    pub fn order(&self) -> usize {
        self.config.order()
    }

    #[inline]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Operation counters.
    #[inline]
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Number of node levels; 0 for an empty tree, 1 when the root is a leaf.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            height += 1;
            cursor = match self.arena.get(id) {
                Node::Internal(node) => node.children.first().copied(),
                Node::Leaf(_) => None,
            };
        }
        height
    }

    /// Number of live nodes, internal and leaf.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    // ========================================================================
    // Public API: Lookup
    // ========================================================================

    /// Return the locator stored for `key`, if any.
    pub fn get_value(&self, key: &K) -> Option<RecordLocator> {
        TreeStats::bump(&self.stats.lookups);
        let leaf = self.find_leaf(key)?;
        self.arena.leaf(leaf).get(key)
    }

    /// Returns true if `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get_value(key).is_some()
    }

    /// Smallest key in the tree.
    pub fn first_key(&self) -> Option<&K> {
        let leaf = self.leftmost_leaf()?;
        self.arena.leaf(leaf).keys.first()
    }

    /// Largest key in the tree.
    pub fn last_key(&self) -> Option<&K> {
        let mut id = self.root?;
        loop {
            match self.arena.get(id) {
                Node::Internal(node) => id = *node.children.last()?,
                Node::Leaf(leaf) => return leaf.keys.last(),
            }
        }
    }

    // ========================================================================
    // Internal: Descent
    // ========================================================================

    /// Walk from the root to the leaf whose key range covers `key`.
    ///
    /// Every operation routes through here, so there is exactly one
    /// definition of which child a key belongs to.
    pub(crate) fn find_leaf(&self, key: &K) -> Option<NodeId> {
        let mut id = self.root?;
        loop {
            match self.arena.get(id) {
                Node::Internal(node) => id = node.children[node.child_index(key)],
                Node::Leaf(_) => return Some(id),
            }
        }
    }

    /// The first leaf of the chain.
    pub(crate) fn leftmost_leaf(&self) -> Option<NodeId> {
        let mut id = self.root?;
        loop {
            match self.arena.get(id) {
                Node::Internal(node) => id = *node.children.first()?,
                Node::Leaf(_) => return Some(id),
            }
        }
    }

    /// Slot of `child` in its parent's children array.
    ///
    /// # Panics
    /// Panics if the parent link and the children array disagree.
    pub(crate) fn child_slot(&self, parent: NodeId, child: NodeId) -> usize {
        match self
            .arena
            .internal(parent)
            .children
            .iter()
            .position(|&c| c == child)
        {
            Some(slot) => slot,
            None => panic!("{child} names {parent} as parent but is not among its children"),
        }
    }
}

impl<K: Ord + Clone + fmt::Debug> Default for BPlusTree<K> {
    fn default() -> Self {
        Self::with_config(TreeConfig::default())
    }
}

impl<K: fmt::Debug> fmt::Debug for BPlusTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BPlusTree")
            .field("order", &self.config.order())
            .field("len", &self.len)
            .field("root", &self.root)
            .field("nodes", &self.arena.len())
            .finish()
    }
}
