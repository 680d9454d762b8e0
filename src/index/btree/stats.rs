//! Tree operation statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by every tree.
///
/// All fields are atomic so that read paths, which only hold `&self`
/// (possibly under a shared lock), can still count.
///
/// # Memory Ordering
/// We use `Ordering::Relaxed` for all operations because:
/// - We only need atomicity (no partial updates)
/// - We don't need synchronization between different counters
/// - Statistics are "eventually consistent" - exact ordering doesn't matter
///
/// # Example
/// ```
/// use leafchain::TreeStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = TreeStats::new();
/// stats.leaf_splits.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.leaf_splits.load(Ordering::Relaxed), 1);
/// ```
#[derive(Debug)]
pub struct TreeStats {
    /// Point lookups (`get_value`, `contains_key`).
    pub lookups: AtomicU64,

    /// Successful inserts.
    pub inserts: AtomicU64,

    /// Inserts rejected because the key was already present.
    pub duplicate_rejections: AtomicU64,

    /// Removes that found and deleted their key.
    pub removes: AtomicU64,

    /// Leaves split on overflow.
    pub leaf_splits: AtomicU64,

    /// Internal nodes split on overflow.
    pub internal_splits: AtomicU64,

    /// Root splits (the tree grew one level).
    pub root_splits: AtomicU64,

    /// Underflows fixed by borrowing from a sibling.
    pub redistributions: AtomicU64,

    /// Underflows fixed by merging two siblings.
    pub merges: AtomicU64,

    /// Root collapses (the tree shrank one level).
    pub root_collapses: AtomicU64,
}

impl TreeStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            lookups: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            duplicate_rejections: AtomicU64::new(0),
            removes: AtomicU64::new(0),
            leaf_splits: AtomicU64::new(0),
            internal_splits: AtomicU64::new(0),
            root_splits: AtomicU64::new(0),
            redistributions: AtomicU64::new(0),
            merges: AtomicU64::new(0),
            root_collapses: AtomicU64::new(0),
        }
    }

    #[inline]
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    ///
    /// This returns a non-atomic copy for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            lookups: self.lookups.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            duplicate_rejections: self.duplicate_rejections.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            leaf_splits: self.leaf_splits.load(Ordering::Relaxed),
            internal_splits: self.internal_splits.load(Ordering::Relaxed),
            root_splits: self.root_splits.load(Ordering::Relaxed),
            redistributions: self.redistributions.load(Ordering::Relaxed),
            merges: self.merges.load(Ordering::Relaxed),
            root_collapses: self.root_collapses.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.lookups.store(0, Ordering::Relaxed);
        self.inserts.store(0, Ordering::Relaxed);
        self.duplicate_rejections.store(0, Ordering::Relaxed);
        self.removes.store(0, Ordering::Relaxed);
        self.leaf_splits.store(0, Ordering::Relaxed);
        self.internal_splits.store(0, Ordering::Relaxed);
        self.root_splits.store(0, Ordering::Relaxed);
        self.redistributions.store(0, Ordering::Relaxed);
        self.merges.store(0, Ordering::Relaxed);
        self.root_collapses.store(0, Ordering::Relaxed);
    }
}

impl Default for TreeStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TreeStats {
    fn clone(&self) -> Self {
        let s = self.snapshot();
        Self {
            lookups: AtomicU64::new(s.lookups),
            inserts: AtomicU64::new(s.inserts),
            duplicate_rejections: AtomicU64::new(s.duplicate_rejections),
            removes: AtomicU64::new(s.removes),
            leaf_splits: AtomicU64::new(s.leaf_splits),
            internal_splits: AtomicU64::new(s.internal_splits),
            root_splits: AtomicU64::new(s.root_splits),
            redistributions: AtomicU64::new(s.redistributions),
            merges: AtomicU64::new(s.merges),
            root_collapses: AtomicU64::new(s.root_collapses),
        }
    }
}

/// A point-in-time snapshot of tree statistics.
///
/// Unlike `TreeStats`, this is not atomic and can be safely
/// printed, compared, etc.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub lookups: u64,
    pub inserts: u64,
    pub duplicate_rejections: u64,
    pub removes: u64,
    pub leaf_splits: u64,
    pub internal_splits: u64,
    pub root_splits: u64,
    pub redistributions: u64,
    pub merges: u64,
    pub root_collapses: u64,
}

impl StatsSnapshot {
    /// Total structural repairs performed on behalf of inserts and removes.
    pub fn structural_changes(&self) -> u64 {
        self.leaf_splits
            + self.internal_splits
            + self.redistributions
            + self.merges
            + self.root_collapses
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ inserts: {}, removes: {}, lookups: {}, splits: {}/{}, merges: {}, redistributions: {} }}",
            self.inserts,
            self.removes,
            self.lookups,
            self.leaf_splits,
            self.internal_splits,
            self.merges,
            self.redistributions
        )
    }
}
