//! Index structures.
//!
//! - [`btree`] - In-memory B+ tree mapping keys to record locators

pub mod btree;

pub use btree::{BPlusTree, Iter, RangeScan, SharedBPlusTree, StatsSnapshot, TreeStats};
