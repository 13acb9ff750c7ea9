//! Typed query construction for memo reads and bulk writes.
//!
//! # Responsibility
//! - Validate sort and paging input before any SQL is produced.
//! - Translate id filters, sort orders and page windows into parameterized
//!   SQLite statements.
//!
//! # Invariants
//! - Column names come from closed enums; caller strings never reach SQL text.
//! - Every filter value is a bound parameter.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod builder;
pub mod page;
pub mod sort;

pub use builder::{BuiltQuery, MemoQuery, MnoFilter};
pub use page::{Page, PageRequest, MAX_PAGE_SIZE};
pub use sort::{Sort, SortDirection, SortField, SortOrder};

pub type QueryResult<T> = Result<T, QueryError>;

/// Query-build validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    UnknownSortField(String),
    UnknownSortDirection(String),
    /// Page size must be in `1..=MAX_PAGE_SIZE`.
    InvalidPageSize(u32),
    /// A page carries more items than its page size.
    PageOverflow { items: usize, page_size: u32 },
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownSortField(name) => {
                write!(f, "unknown sort field `{name}`; expected mno|memo_text")
            }
            Self::UnknownSortDirection(value) => {
                write!(f, "unknown sort direction `{value}`; expected asc|desc")
            }
            Self::InvalidPageSize(size) => {
                write!(f, "page size {size} is outside 1..={MAX_PAGE_SIZE}")
            }
            Self::PageOverflow { items, page_size } => {
                write!(f, "page holds {items} items but page size is {page_size}")
            }
        }
    }
}

impl Error for QueryError {}
