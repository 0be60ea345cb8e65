//! Pagination value objects shared by query operations.

use serde::{Deserialize, Serialize};

/// A page request with a 1-based page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    page: u32,
    size: u32,
}

impl PageRequest {
    /// Create a page request. Page numbers below 1 are clamped to 1 and a
    /// zero size is clamped to 1.
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self {
            page: if page == 0 { 1 } else { page },
            size: if size == 0 { 1 } else { size },
        }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Items per page.
    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    /// Number of items to skip.
    #[must_use]
    pub const fn offset(self) -> usize {
        ((self.page - 1) as usize) * (self.size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, 20)
    }
}

/// A page of results with the total count across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total items across all pages.
    pub total: u64,
    /// 1-based page number this page was cut from.
    pub page: u32,
    /// Requested page size.
    pub size: u32,
}

impl<T> Page<T> {
    /// Build a page from a full, pre-sorted result set.
    #[must_use]
    pub fn from_full_set(all: Vec<T>, request: PageRequest) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(request.offset())
            .take(request.size() as usize)
            .collect();

        Self {
            items,
            total,
            page: request.page(),
            size: request.size(),
        }
    }

    /// An empty page for the given request.
    #[must_use]
    pub const fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: request.page(),
            size: request.size(),
        }
    }
}
