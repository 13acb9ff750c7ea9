//! Core persistence access for memos.
//! Typed range queries, ordered paging, partial updates and bulk deletes
//! over a single SQLite `memo` table.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::memo::{Memo, MemoId, MemoSummary, MemoValidationError, MEMO_TEXT_MAX_CHARS};
pub use query::{
    MemoQuery, MnoFilter, Page, PageRequest, QueryError, Sort, SortDirection, SortField,
    SortOrder, MAX_PAGE_SIZE,
};
pub use repo::memo_repo::{MemoRepository, RepoError, RepoResult, SqliteMemoRepository};
pub use service::memo_service::MemoService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
