//! One decoded page of a paginated collection

use super::entry::Entry;

/// A page of entries plus the server's pagination counters
///
/// `limit` is the page size that was requested, not necessarily `items.len()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    /// Decoded entries, unknown and malformed records already removed
    pub items: Vec<Entry>,
    /// Requested page size
    pub limit: u64,
    /// Total number of records in the collection
    pub total: u64,
    /// Offset of the first record of this page
    pub skip: u64,
}

impl Page {
    /// A page with no items and zeroed counters
    ///
    /// Used in place of a cached page that failed to decode.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether another page follows this one
    ///
    /// Counters that overflow when added mean there is nothing left to fetch.
    pub fn has_more(&self) -> bool {
        self.skip
            .checked_add(self.limit)
            .is_some_and(|end| self.total > 0 && end < self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(limit: u64, skip: u64, total: u64) -> Page {
        Page {
            items: Vec::new(),
            limit,
            total,
            skip,
        }
    }

    #[test]
    fn has_more_only_before_the_last_page() {
        assert!(page(2, 0, 3).has_more());
        assert!(!page(2, 2, 3).has_more());
        assert!(!page(100, 0, 100).has_more());
        assert!(page(100, 0, 101).has_more());
    }

    #[test]
    fn empty_collection_has_no_more_pages() {
        assert!(!page(100, 0, 0).has_more());
        assert!(!Page::empty().has_more());
    }

    #[test]
    fn overflowing_counters_have_no_more_pages() {
        assert!(!page(u64::MAX, u64::MAX, 5).has_more());
        assert!(!page(u64::MAX, 1, u64::MAX).has_more());
    }
}
