//! Page requests and paged results.
//!
//! # Invariants
//! - `PageRequest::page_size` is always within `1..=MAX_PAGE_SIZE`.
//! - `Page::items().len() <= page_size`, also for deserialized pages.

use super::sort::Sort;
use super::{QueryError, QueryResult};
use serde::{Deserialize, Serialize};

/// Upper bound for one page.
pub const MAX_PAGE_SIZE: u32 = 1000;

/// Zero-based page window plus optional sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page_index: u32,
    page_size: u32,
    sort: Sort,
}

impl PageRequest {
    /// Creates an unsorted page request.
    ///
    /// # Errors
    /// - `InvalidPageSize` when `page_size` is zero or above [`MAX_PAGE_SIZE`].
    pub fn of(page_index: u32, page_size: u32) -> QueryResult<Self> {
        Self::sorted(page_index, page_size, Sort::unsorted())
    }

    /// Creates a page request with an explicit sort.
    pub fn sorted(page_index: u32, page_size: u32, sort: Sort) -> QueryResult<Self> {
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(QueryError::InvalidPageSize(page_size));
        }
        Ok(Self {
            page_index,
            page_size,
            sort,
        })
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> &Sort {
        &self.sort
    }

    /// Replaces the sort, keeping the page window.
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Row offset for this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page_index) * u64::from(self.page_size)
    }

    pub fn next(&self) -> Self {
        Self {
            page_index: self.page_index.saturating_add(1),
            page_size: self.page_size,
            sort: self.sort.clone(),
        }
    }
}

/// A slice of a larger result set with navigation metadata.
///
/// Fields are read-only; deserialization re-checks the page invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "PageParts<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct Page<T> {
    items: Vec<T>,
    total_count: u64,
    page_index: u32,
    page_size: u32,
}

#[derive(Deserialize)]
struct PageParts<T> {
    items: Vec<T>,
    total_count: u64,
    page_index: u32,
    page_size: u32,
}

impl<T> TryFrom<PageParts<T>> for Page<T> {
    type Error = QueryError;

    fn try_from(parts: PageParts<T>) -> QueryResult<Self> {
        if parts.page_size == 0 || parts.page_size > MAX_PAGE_SIZE {
            return Err(QueryError::InvalidPageSize(parts.page_size));
        }
        if parts.items.len() > parts.page_size as usize {
            return Err(QueryError::PageOverflow {
                items: parts.items.len(),
                page_size: parts.page_size,
            });
        }
        Ok(Self {
            items: parts.items,
            total_count: parts.total_count,
            page_index: parts.page_index,
            page_size: parts.page_size,
        })
    }
}

impl<T> Page<T> {
    /// Wraps one fetched slice. Items beyond `request.page_size()` are dropped.
    pub fn new(mut items: Vec<T>, total_count: u64, request: &PageRequest) -> Self {
        items.truncate(request.page_size as usize);
        Self {
            items,
            total_count,
            page_index: request.page_index,
            page_size: request.page_size,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn page_index(&self) -> u32 {
        self.page_index
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn total_pages(&self) -> u64 {
        match self.page_size {
            0 => 0,
            size => self.total_count.div_ceil(u64::from(size)),
        }
    }

    pub fn has_next(&self) -> bool {
        (u64::from(self.page_index) + 1) * u64::from(self.page_size) < self.total_count
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn is_first(&self) -> bool {
        !self.has_previous()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts items while keeping page metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}
