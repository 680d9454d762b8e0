//! Ordered scans over the leaf chain.
//!
//! A scan descends once to its starting leaf and then follows `next` links,
//! never going back through the internal nodes. Both iterators borrow the
//! tree, so it cannot change underneath them; a fresh call re-descends.

use std::fmt;
use std::iter::FusedIterator;

use crate::common::{NodeId, RecordLocator};

use super::tree::BPlusTree;

/// In-order iterator over `(key, locator)` pairs, optionally stopping
/// before an exclusive upper bound.
pub struct Iter<'a, K> {
    tree: &'a BPlusTree<K>,
    /// Current leaf; `None` once the scan is finished.
    leaf: Option<NodeId>,
    /// Next entry to yield within `leaf`.
    index: usize,
    end: Option<&'a K>,
}

impl<'a, K: Ord> Iterator for Iter<'a, K> {
    type Item = (&'a K, &'a RecordLocator);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            let leaf = tree.arena.leaf(self.leaf?);
            if self.index < leaf.keys.len() {
                let key = &leaf.keys[self.index];
                if self.end.is_some_and(|end| key >= end) {
                    self.leaf = None;
                    return None;
                }
                let locator = &leaf.locators[self.index];
                self.index += 1;
                return Some((key, locator));
            }
            // Leaf exhausted: hop to the next one.
            self.leaf = leaf.next;
            self.index = 0;
        }
    }
}

impl<K: Ord> FusedIterator for Iter<'_, K> {}

/// Locators for the keys in `[start, end)`, in ascending key order.
///
/// Returned by [`BPlusTree::range_scan`].
pub struct RangeScan<'a, K> {
    inner: Iter<'a, K>,
}

impl<K: Ord> Iterator for RangeScan<'_, K> {
    type Item = RecordLocator;

    #[inline]
    fn next(&mut self) -> Option<RecordLocator> {
        self.inner.next().map(|(_, locator)| *locator)
    }
}

impl<K: Ord> FusedIterator for RangeScan<'_, K> {}

impl<K: Ord + Clone + fmt::Debug> BPlusTree<K> {
    // ========================================================================
    // Public API: Scans
    // ========================================================================

    /// Locators of every key in the half-open range `[start, end)`.
    ///
    /// The scan is lazy; an empty or inverted range yields nothing.
    ///
    /// # Example
    /// ```
    /// use leafchain::{BPlusTree, RecordLocator};
    ///
    /// let mut tree = BPlusTree::new(4).unwrap();
    /// for i in 0..10u32 {
    ///     tree.insert(i, RecordLocator::new(i, 0));
    /// }
    ///
    /// let pages: Vec<u32> = tree.range_scan(&3, &6).map(|loc| loc.page_id.0).collect();
    /// assert_eq!(pages, vec![3, 4, 5]);
    /// ```
    pub fn range_scan<'a>(&'a self, start: &K, end: &'a K) -> RangeScan<'a, K> {
        let leaf = self.find_leaf(start);
        let index = leaf.map_or(0, |id| self.arena.leaf(id).lower_bound(start));
        RangeScan {
            inner: Iter {
                tree: self,
                leaf,
                index,
                end: Some(end),
            },
        }
    }

    /// Every `(key, locator)` pair in ascending key order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tree: self,
            leaf: self.leftmost_leaf(),
            index: 0,
            end: None,
        }
    }
}

impl<'a, K: Ord + Clone + fmt::Debug> IntoIterator for &'a BPlusTree<K> {
    type Item = (&'a K, &'a RecordLocator);
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(i: u32) -> RecordLocator {
        RecordLocator::new(i, i)
    }

    fn tree_with(order: usize, keys: impl IntoIterator<Item = u32>) -> BPlusTree<u32> {
        let mut tree = BPlusTree::new(order).unwrap();
        for k in keys {
            assert!(tree.insert(k, loc(k)));
        }
        tree
    }

    #[test]
    fn test_scan_empty_tree() {
        let tree: BPlusTree<u32> = BPlusTree::default();
        assert_eq!(tree.range_scan(&0, &100).count(), 0);
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn test_scan_is_half_open() {
        let tree = tree_with(4, 0..30);

        let got: Vec<_> = tree.range_scan(&5, &9).collect();
        assert_eq!(got, vec![loc(5), loc(6), loc(7), loc(8)]);
    }

    #[test]
    fn test_scan_spans_leaves() {
        let tree = tree_with(3, 0..100);
        assert!(tree.height() > 2);

        let got: Vec<_> = tree.range_scan(&10, &90).collect();
        assert_eq!(got, (10..90).map(loc).collect::<Vec<_>>());
    }

    #[test]
    fn test_scan_start_between_keys() {
        let tree = tree_with(4, (0..50).map(|k| k * 2));

        // 7 is absent; the scan begins at the first key >= 7.
        let got: Vec<_> = tree.range_scan(&7, &14).collect();
        assert_eq!(got, vec![loc(8), loc(10), loc(12)]);
    }

    #[test]
    fn test_scan_start_past_end_of_leaf() {
        // Order 4: [0 2] | [4 6] | ... ; start 3 lands past the end of [0 2].
        let tree = tree_with(4, (0..10).map(|k| k * 2));

        let leaf = tree.find_leaf(&3).unwrap();
        assert_eq!(tree.arena.leaf(leaf).lower_bound(&3), tree.arena.leaf(leaf).keys.len());

        let got: Vec<_> = tree.range_scan(&3, &7).collect();
        assert_eq!(got, vec![loc(4), loc(6)]);
    }

    #[test]
    fn test_scan_edge_ranges() {
        let tree = tree_with(4, 0..20);

        assert_eq!(tree.range_scan(&5, &5).count(), 0);
        assert_eq!(tree.range_scan(&9, &3).count(), 0);
        assert_eq!(tree.range_scan(&100, &200).count(), 0);
        assert_eq!(tree.range_scan(&0, &u32::MAX).count(), 20);
    }

    #[test]
    fn test_scan_is_fused_and_restartable() {
        let tree = tree_with(4, 0..10);

        let mut scan = tree.range_scan(&8, &20);
        assert_eq!(scan.next(), Some(loc(8)));
        assert_eq!(scan.next(), Some(loc(9)));
        assert_eq!(scan.next(), None);
        assert_eq!(scan.next(), None);

        assert_eq!(tree.range_scan(&8, &20).count(), 2);
    }

    #[test]
    fn test_iter_yields_pairs_in_order() {
        let tree = tree_with(5, [9, 3, 7, 1, 5, 8, 2]);

        let pairs: Vec<_> = tree.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<_> = [1, 2, 3, 5, 7, 8, 9].into_iter().map(|k| (k, loc(k))).collect();
        assert_eq!(pairs, expected);

        let keys: Vec<u32> = (&tree).into_iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, vec![1, 2, 3, 5, 7, 8, 9]);
    }
}
