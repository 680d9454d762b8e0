//! leafchain - An in-memory B+ tree index mapping unique keys to record locators.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           leafchain                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │         SharedBPlusTree (parking_lot RwLock)             │   │
//! │  │        many readers  ←─OR─→  one writer                  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                BPlusTree (index/btree/)                  │   │
//! │  │   get_value │ insert + split │ remove + merge │ scans    │   │
//! │  │   ┌─────────────────────────────────────────────────┐   │   │
//! │  │   │  NodeArena: Internal | Leaf nodes by NodeId      │   │   │
//! │  │   │  leaf chain: Leaf ⇄ Leaf ⇄ Leaf ⇄ ...            │   │   │
//! │  │   └─────────────────────────────────────────────────┘   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │                   Common (common/)                       │   │
//! │  │   TreeConfig + Error + NodeId + PageId + RecordLocator   │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (config, errors, identifiers)
//! - [`index`] - The B+ tree and its scans
//!
//! # Quick Start
//! ```
//! use leafchain::{BPlusTree, RecordLocator};
//!
//! let mut tree = BPlusTree::new(4).unwrap();
//! for i in 100..500u32 {
//!     tree.insert(i, RecordLocator::new(i, i));
//! }
//!
//! assert_eq!(tree.get_value(&150), Some(RecordLocator::new(150, 150)));
//! tree.remove(&150);
//! assert_eq!(tree.get_value(&150), None);
//!
//! let hits: Vec<RecordLocator> = tree.range_scan(&100, &112).collect();
//! assert_eq!(hits.len(), 12);
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_ORDER, MIN_ORDER};
pub use common::{Error, NodeId, PageId, RecordLocator, Result, TreeConfig};

pub use index::{BPlusTree, Iter, RangeScan, SharedBPlusTree, StatsSnapshot, TreeStats};
