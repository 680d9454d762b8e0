//! A tree behind a reader/writer lock.
//!
//! The tree itself does no locking. [`SharedBPlusTree`] serializes access the
//! way callers are expected to: any number of concurrent readers, or exactly
//! one writer.

use std::fmt;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::common::{RecordLocator, Result, TreeConfig};

use super::tree::BPlusTree;

/// A [`BPlusTree`] that can be shared between threads.
///
/// # Thread Safety
/// - Lookups and scans take the read lock
/// - `insert` and `remove` take the write lock
/// - Statistics are atomic, so counting lookups needs no write lock
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use leafchain::{RecordLocator, SharedBPlusTree};
///
/// let tree = Arc::new(SharedBPlusTree::new(4).unwrap());
/// tree.insert(1u64, RecordLocator::new(1, 1));
/// assert_eq!(tree.get_value(&1), Some(RecordLocator::new(1, 1)));
/// ```
pub struct SharedBPlusTree<K> {
    inner: RwLock<BPlusTree<K>>,
}

impl<K: Ord + Clone + fmt::Debug> SharedBPlusTree<K> {
    /// Create an empty shared tree with the given fanout.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < MIN_ORDER`
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::from(BPlusTree::new(order)?))
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self::from(BPlusTree::with_config(config))
    }

    pub fn get_value(&self, key: &K) -> Option<RecordLocator> {
        self.inner.read().get_value(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    /// Returns `false` if `key` was already present.
    pub fn insert(&self, key: K, locator: RecordLocator) -> bool {
        self.inner.write().insert(key, locator)
    }

    pub fn remove(&self, key: &K) -> Option<RecordLocator> {
        self.inner.write().remove(key)
    }

    /// Collect the locators in `[start, end)` while holding the read lock.
    pub fn range_scan(&self, start: &K, end: &K) -> Vec<RecordLocator> {
        self.inner.read().range_scan(start, end).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Hold the read lock for a longer sequence of reads.
    pub fn read(&self) -> RwLockReadGuard<'_, BPlusTree<K>> {
        self.inner.read()
    }

    /// Hold the write lock for a batch of mutations.
    pub fn write(&self) -> RwLockWriteGuard<'_, BPlusTree<K>> {
        self.inner.write()
    }

    pub fn into_inner(self) -> BPlusTree<K> {
        self.inner.into_inner()
    }
}

impl<K> From<BPlusTree<K>> for SharedBPlusTree<K> {
    fn from(tree: BPlusTree<K>) -> Self {
        Self {
            inner: RwLock::new(tree),
        }
    }
}

impl<K: Ord + Clone + fmt::Debug> Default for SharedBPlusTree<K> {
    fn default() -> Self {
        Self::from(BPlusTree::default())
    }
}

impl<K: fmt::Debug> fmt::Debug for SharedBPlusTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBPlusTree")
            .field("inner", &*self.inner.read())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(i: u32) -> RecordLocator {
        RecordLocator::new(i, i)
    }

    #[test]
    fn test_shared_basic_ops() {
        let tree = SharedBPlusTree::new(4).unwrap();
        assert!(tree.is_empty());

        for k in 0u32..20 {
            assert!(tree.insert(k, loc(k)));
        }
        assert!(!tree.insert(3, loc(99)));

        assert_eq!(tree.len(), 20);
        assert_eq!(tree.get_value(&3), Some(loc(3)));
        assert!(tree.contains_key(&19));
        assert_eq!(tree.range_scan(&5, &8), vec![loc(5), loc(6), loc(7)]);

        assert_eq!(tree.remove(&3), Some(loc(3)));
        assert!(!tree.contains_key(&3));
    }

    #[test]
    fn test_batch_under_write_guard() {
        let tree = SharedBPlusTree::default();
        {
            let mut guard = tree.write();
            for k in 0u32..10 {
                guard.insert(k, loc(k));
            }
            guard.remove(&0);
        }

        let guard = tree.read();
        assert_eq!(guard.len(), 9);
        guard.check_invariants().unwrap();
    }

    #[test]
    fn test_into_inner_round_trip() {
        let mut tree = BPlusTree::new(5).unwrap();
        tree.insert(1u32, loc(1));

        let shared = SharedBPlusTree::from(tree);
        shared.insert(2, loc(2));

        let tree = shared.into_inner();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.order(), 5);
    }
}
