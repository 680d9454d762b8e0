//! End-to-end tests for the B+ tree index.
//!
//! These drive the public API only and check the tree against itself with
//! `check_invariants` after every phase.

use leafchain::{BPlusTree, Error, PageId, RecordLocator, SharedBPlusTree};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

fn loc(key: u32) -> RecordLocator {
    RecordLocator::new(key, key)
}

fn filled(order: usize, keys: impl IntoIterator<Item = u32>) -> BPlusTree<u32> {
    let mut tree = BPlusTree::new(order).unwrap();
    for k in keys {
        assert!(tree.insert(k, loc(k)), "duplicate {k}");
    }
    tree
}

/// Bulk insert, point lookup, strided removal and a range scan at order 4.
#[test]
fn test_order_four_workload() {
    let mut tree = filled(4, 100..500);
    tree.check_invariants().unwrap();
    assert_eq!(tree.len(), 400);
    assert_eq!(tree.get_value(&150), Some(loc(150)));

    // Remove every key divisible by 4
    for k in (100..500).step_by(4) {
        assert_eq!(tree.remove(&k), Some(loc(k)));
    }
    tree.check_invariants().unwrap();
    assert_eq!(tree.len(), 300);

    assert_eq!(tree.get_value(&100), None);
    assert_eq!(tree.get_value(&204), None);
    assert_eq!(tree.get_value(&205), Some(loc(205)));

    let hits: Vec<RecordLocator> = tree.range_scan(&100, &112).collect();
    let expected: Vec<RecordLocator> = [101, 102, 103, 105, 106, 107, 109, 110, 111]
        .into_iter()
        .map(loc)
        .collect();
    assert_eq!(hits, expected);
}

/// Every operation on an empty tree is well defined.
#[test]
fn test_empty_tree_operations() {
    let mut tree: BPlusTree<u32> = BPlusTree::new(4).unwrap();

    assert!(tree.is_empty());
    assert_eq!(tree.get_value(&42), None);
    assert_eq!(tree.remove(&42), None);
    assert_eq!(tree.range_scan(&0, &u32::MAX).count(), 0);
    assert_eq!(tree.iter().count(), 0);
    assert_eq!(tree.to_string(), "<empty>\n");
    tree.check_invariants().unwrap();
}

#[test]
fn test_invalid_orders_rejected() {
    for order in 0..3 {
        assert_eq!(
            BPlusTree::<u32>::new(order).unwrap_err(),
            Error::InvalidOrder { order, min: 3 }
        );
    }
    assert!(BPlusTree::<u32>::new(3).is_ok());
}

#[test]
fn test_duplicate_insert_keeps_first_locator() {
    let mut tree = filled(4, 0..50);

    assert!(!tree.insert(25, RecordLocator::new(999, 999)));
    assert_eq!(tree.try_insert(25, loc(0)), Err(Error::DuplicateKey));

    assert_eq!(tree.len(), 50);
    assert_eq!(tree.get_value(&25), Some(loc(25)));
    tree.check_invariants().unwrap();
}

#[test]
fn test_remove_is_idempotent() {
    let mut tree = filled(5, 0..100);

    assert_eq!(tree.remove(&40), Some(loc(40)));
    assert_eq!(tree.remove(&40), None);
    assert_eq!(tree.remove(&1000), None);

    assert_eq!(tree.len(), 99);
    tree.check_invariants().unwrap();
}

/// Insert and drain in several patterns for every small order.
#[test]
fn test_orders_sweep() {
    for order in 3..=10 {
        let keys: Vec<u32> = (0..300).map(|k| (k * 113) % 300).collect();
        let mut tree = filled(order, keys.iter().copied());
        tree.check_invariants().unwrap();

        let all: Vec<u32> = tree.iter().map(|(k, _)| *k).collect();
        assert_eq!(all, (0..300).collect::<Vec<_>>(), "order {order}");

        // Odd keys first, then evens, from the high end down.
        for k in (0..300).rev().filter(|k| k % 2 == 1) {
            assert_eq!(tree.remove(&k), Some(loc(k)), "order {order}");
        }
        tree.check_invariants().unwrap();
        assert_eq!(tree.range_scan(&0, &300).count(), 150);

        for k in (0..300).rev().filter(|k| k % 2 == 0) {
            assert_eq!(tree.remove(&k), Some(loc(k)), "order {order}");
        }
        assert!(tree.is_empty(), "order {order}");
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.node_count(), 0);
        tree.check_invariants().unwrap();
    }
}

/// A tree drained to nothing can be refilled.
#[test]
fn test_drain_then_refill() {
    let mut tree = filled(4, 0..64);
    for k in 0..64 {
        tree.remove(&k);
    }
    assert!(tree.is_empty());

    for k in (0..64).rev() {
        assert!(tree.insert(k, loc(k + 1)));
    }
    tree.check_invariants().unwrap();
    assert_eq!(tree.get_value(&10), Some(loc(11)));
}

/// Interleaved mutations checked against an ordered map.
#[test]
fn test_matches_btreemap_model() {
    let mut tree = BPlusTree::new(4).unwrap();
    let mut model = BTreeMap::new();

    // Deterministic pseudo-random stream
    let mut state = 0x2545_f491_u64;
    for step in 0..4_000u32 {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let key = (state % 512) as u32;

        if state % 3 == 0 {
            assert_eq!(tree.remove(&key), model.remove(&key), "step {step}");
        } else {
            let locator = RecordLocator::new(key, step);
            let fresh = !model.contains_key(&key);
            if fresh {
                model.insert(key, locator);
            }
            assert_eq!(tree.insert(key, locator), fresh, "step {step}");
        }
    }

    tree.check_invariants().unwrap();
    assert_eq!(tree.len(), model.len());
    let pairs: Vec<(u32, RecordLocator)> = tree.iter().map(|(k, v)| (*k, *v)).collect();
    let expected: Vec<(u32, RecordLocator)> = model.into_iter().collect();
    assert_eq!(pairs, expected);
}

#[test]
fn test_string_keys() {
    let mut tree = BPlusTree::new(3).unwrap();
    for (i, word) in ["pear", "apple", "fig", "kiwi", "banana", "cherry"].iter().enumerate() {
        assert!(tree.insert(word.to_string(), RecordLocator::new(1, i as u32)));
    }

    let start = "b".to_string();
    let end = "g".to_string();
    let hits: Vec<u32> = tree.range_scan(&start, &end).map(|loc| loc.record_id).collect();
    // banana, cherry, fig
    assert_eq!(hits, vec![4, 5, 2]);
    tree.check_invariants().unwrap();
}

#[test]
fn test_stats_track_structure() {
    let mut tree = filled(4, 0..100);
    let grown = tree.stats().snapshot();
    assert_eq!(grown.inserts, 100);
    assert!(grown.leaf_splits > 0);
    assert!(grown.root_splits >= 2);

    for k in 0..100 {
        tree.remove(&k);
    }
    let drained = tree.stats().snapshot();
    assert_eq!(drained.removes, 100);
    assert!(drained.merges > 0);
    assert!(drained.root_collapses >= 2);

    tree.stats().reset();
    assert_eq!(tree.stats().snapshot().structural_changes(), 0);
}

#[test]
fn test_locator_fields() {
    let tree = filled(4, [7]);
    let found = tree.get_value(&7).unwrap();
    assert_eq!(found.page_id, PageId(7));
    assert_eq!(found.record_id, 7);
    assert_eq!(found.to_string(), "(7, 7)");
}

/// Readers and writers share one tree through the lock.
#[test]
fn test_shared_tree_concurrent_access() {
    let tree = Arc::new(SharedBPlusTree::new(4).unwrap());

    // Each writer owns a disjoint key range
    let writers: Vec<_> = (0..4u32)
        .map(|w| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                for k in (w * 250)..((w + 1) * 250) {
                    assert!(tree.insert(k, loc(k)));
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..2)
        .map(|_| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                for k in 0..1000 {
                    if let Some(found) = tree.get_value(&k) {
                        assert_eq!(found, loc(k));
                    }
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    assert_eq!(tree.len(), 1000);
    tree.read().check_invariants().unwrap();

    // Concurrent removal of the odd keys
    let removers: Vec<_> = (0..4u32)
        .map(|w| {
            let tree = Arc::clone(&tree);
            thread::spawn(move || {
                for k in ((w * 250)..((w + 1) * 250)).filter(|k| k % 2 == 1) {
                    assert_eq!(tree.remove(&k), Some(loc(k)));
                }
            })
        })
        .collect();
    for handle in removers {
        handle.join().unwrap();
    }

    assert_eq!(tree.len(), 500);
    assert_eq!(tree.range_scan(&0, &10), vec![loc(0), loc(2), loc(4), loc(6), loc(8)]);
    tree.read().check_invariants().unwrap();
}
