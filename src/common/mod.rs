//! Common types and utilities shared across leafchain.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and [`TreeConfig`]
//! - Error types
//! - Identifiers (NodeId, PageId) and the [`RecordLocator`] value

pub mod config;
pub mod error;
mod node_id;
mod page_id;
mod record_locator;

pub use config::TreeConfig;
pub use error::{Error, Result};
pub use node_id::NodeId;
pub use page_id::PageId;
pub use record_locator::RecordLocator;
