//! B+ tree index.
//!
//! # Components
//! - [`BPlusTree`] - The tree: lookups, inserts, removes, scans
//! - [`SharedBPlusTree`] - The tree behind a reader/writer lock
//! - [`RangeScan`] / [`Iter`] - Lazy in-order scans over the leaf chain
//! - [`TreeStats`] - Operation and structural counters
//!
//! Nodes are kept in an arena (`arena.rs`) and modelled as a closed enum
//! of internal and leaf nodes (`node.rs`). Insertion with split propagation
//! lives in `insert.rs`, deletion with redistribution and merging in
//! `delete.rs`.

mod arena;
mod delete;
mod display;
mod insert;
mod iter;
mod node;
mod shared;
mod stats;
mod tree;
mod validate;

pub use iter::{Iter, RangeScan};
pub use shared::SharedBPlusTree;
pub use stats::{StatsSnapshot, TreeStats};
pub use tree::BPlusTree;
