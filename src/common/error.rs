//! Error types for leafchain.

use thiserror::Error;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors the index can report.
///
/// The taxonomy is purely logical: the tree does no I/O, so nothing here is
/// transient and no call is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The tree was configured with a fanout too small to split.
    #[error("invalid tree order {order}: must be at least {min}")]
    InvalidOrder { order: usize, min: usize },

    /// Insert on a key that is already present. The tree is left unmodified.
    #[error("duplicate key")]
    DuplicateKey,

    /// A structural check failed.
    ///
    /// Only [`crate::BPlusTree::check_invariants`] produces this; seeing it
    /// means the tree algorithm has a bug.
    #[error("structural invariant violated: {0}")]
    InvariantViolation(String),
}
