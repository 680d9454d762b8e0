//! Configuration for leafchain trees.

use crate::common::{Error, Result};

/// Fanout used when none is given (the textbook N = 4 tree).
pub const DEFAULT_ORDER: usize = 4;

/// Smallest fanout that can still split a full node into two legal halves.
pub const MIN_ORDER: usize = 3;

/// Validated tree shape, shared by every node of one tree.
///
/// The order `N` is the maximum number of children of an internal node, so
/// every node holds at most `N - 1` keys.
///
/// # Occupancy
/// ```text
///            min keys (non-root)   max keys
/// internal   ceil(N/2) - 1         N - 1
/// leaf       floor(N/2)            N - 1
/// ```
/// The root is exempt from the minimum. An internal root keeps at least one key.
///
/// # Example
/// ```
/// use leafchain::TreeConfig;
///
/// let config = TreeConfig::new(5).unwrap();
/// assert_eq!(config.max_keys(), 4);
/// assert_eq!(config.min_internal_keys(), 2);
/// assert!(TreeConfig::new(2).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeConfig {
    order: usize,
}

impl TreeConfig {
    /// Create a config with the given fanout.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < MIN_ORDER`
    pub fn new(order: usize) -> Result<Self> {
        if order < MIN_ORDER {
            return Err(Error::InvalidOrder {
                order,
                min: MIN_ORDER,
            });
        }
        Ok(Self { order })
    }

    /// Maximum number of children of an internal node.
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Maximum number of keys in any node.
    #[inline]
    pub fn max_keys(&self) -> usize {
        self.order - 1
    }

    /// Minimum number of keys in a non-root internal node.
    #[inline]
    pub fn min_internal_keys(&self) -> usize {
        self.order.div_ceil(2) - 1
    }

    /// Minimum number of keys in a non-root leaf.
    #[inline]
    pub fn min_leaf_keys(&self) -> usize {
        self.order / 2
    }

    /// Minimum for a non-root node of the given kind.
    #[inline]
    pub fn min_keys(&self, is_leaf: bool) -> usize {
        if is_leaf {
            self.min_leaf_keys()
        } else {
            self.min_internal_keys()
        }
    }

    /// Number of entries an overflowing leaf keeps when it splits.
    #[inline]
    pub fn leaf_split_point(&self) -> usize {
        self.order.div_ceil(2)
    }

    /// Index of the key promoted out of an overflowing internal node.
    ///
    /// Keys before it stay, keys after it move to the new sibling.
    #[inline]
    pub fn internal_split_point(&self) -> usize {
        self.order / 2
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_ORDER,
        }
    }
}
