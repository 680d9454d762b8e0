//! Record locator type.

use std::fmt;

use crate::common::PageId;

/// Where a record lives: a page plus a record slot on that page.
///
/// The tree stores a locator against each key and hands it back unchanged.
/// It never interprets either half.
///
/// # Example
/// ```
/// use leafchain::{PageId, RecordLocator};
///
/// let loc = RecordLocator::new(7, 3);
/// assert_eq!(loc.page_id, PageId::new(7));
/// assert_eq!(loc.record_id, 3);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordLocator {
    /// Page holding the record.
    pub page_id: PageId,
    /// Record slot within the page.
    pub record_id: u32,
}

impl RecordLocator {
    /// Create a locator from raw page and record numbers.
    #[inline]
    pub fn new(page_id: u32, record_id: u32) -> Self {
        Self {
            page_id: PageId::new(page_id),
            record_id,
        }
    }
}

impl fmt::Display for RecordLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.page_id.0, self.record_id)
    }
}
