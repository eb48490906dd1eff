//! Pagination cursor

use serde::{Deserialize, Serialize};

use crate::config::PaginationConfig;

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u64 = 100;

/// A `{limit, skip}` pair identifying one page of a collection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pagination {
    /// Items requested
    pub limit: u64,
    /// Offset of the first item
    pub skip: u64,
}

impl Pagination {
    /// Cursor for the page starting at `skip`
    pub fn new(limit: u64, skip: u64) -> Self {
        Self { limit, skip }
    }

    /// Cursor of the following page
    pub fn next(self) -> Self {
        Self {
            limit: self.limit,
            skip: self.skip.saturating_add(self.limit),
        }
    }

    /// Whether this cursor addresses the first page
    pub fn is_first(&self) -> bool {
        self.skip == 0
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            skip: 0,
        }
    }
}

impl From<&PaginationConfig> for Pagination {
    fn from(config: &PaginationConfig) -> Self {
        Self::new(u64::from(config.page_size), 0)
    }
}
