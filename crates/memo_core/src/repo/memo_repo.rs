//! Memo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/find/update/delete and paged range reads over `memo`.
//! - Execute statements produced by [`crate::query::MemoQuery`].
//!
//! # Invariants
//! - Bulk deletes run as one set-based statement.
//! - Paged reads run count and fetch inside one transaction so both observe
//!   the same snapshot, reusing the caller's transaction when one is open.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::memo::{validate_memo_text, Memo, MemoId, MemoSummary, MemoValidationError};
use crate::query::{
    BuiltQuery, MemoQuery, MnoFilter, Page, PageRequest, QueryError, Sort, SortField,
};
use log::debug;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for memo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(MemoValidationError),
    Query(QueryError),
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Query(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Query(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MemoValidationError> for RepoError {
    fn from(value: MemoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<QueryError> for RepoError {
    fn from(value: QueryError) -> Self {
        Self::Query(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for memo persistence.
pub trait MemoRepository {
    /// Persists a new memo and returns it with its storage-assigned id.
    fn insert(&self, memo_text: &str) -> RepoResult<Memo>;
    /// Inserts or replaces the memo stored under `memo.mno`.
    fn save(&self, memo: &Memo) -> RepoResult<Memo>;
    fn find_by_id(&self, mno: MemoId) -> RepoResult<Option<Memo>>;
    fn exists_by_id(&self, mno: MemoId) -> RepoResult<bool>;
    fn count(&self) -> RepoResult<u64>;
    /// Replaces only `memo_text`. Returns affected rows (0 or 1).
    fn update_text(&self, mno: MemoId, memo_text: &str) -> RepoResult<usize>;
    /// Same as [`Self::update_text`] keyed by the memo's own id.
    fn update_memo(&self, memo: &Memo) -> RepoResult<usize>;
    fn delete_by_id(&self, mno: MemoId) -> RepoResult<usize>;
    /// Deletes every memo with `mno < threshold` in one statement.
    fn delete_where_id_less_than(&self, threshold: MemoId) -> RepoResult<usize>;
    /// Reads `from <= mno <= to`, sorted by `sort` then the page's own sort.
    fn list_range(
        &self,
        from: MemoId,
        to: MemoId,
        sort: &Sort,
        page: &PageRequest,
    ) -> RepoResult<Page<Memo>>;
    /// Reads `from <= mno <= to` ordered by `mno` descending, unpaged.
    fn list_between_desc(&self, from: MemoId, to: MemoId) -> RepoResult<Vec<Memo>>;
    /// Full scan ordered by `mno` descending.
    ///
    /// Unbounded: callers own any limit on result size.
    fn list_all_desc(&self) -> RepoResult<Vec<Memo>>;
    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Memo>>;
    /// Reads `mno > lower_bound`, paged.
    fn list_greater_than(&self, lower_bound: MemoId, page: &PageRequest)
        -> RepoResult<Page<Memo>>;
    /// Summary projection of [`Self::list_greater_than`].
    fn list_summaries_greater_than(
        &self,
        lower_bound: MemoId,
        page: &PageRequest,
    ) -> RepoResult<Page<MemoSummary>>;
}

/// SQLite-backed memo repository.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not been applied.
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when the `memo`
    ///   table does not have the expected shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn fetch_page<T>(
        &self,
        query: &MemoQuery,
        page: &PageRequest,
        build_select: fn(&MemoQuery, Option<&PageRequest>) -> BuiltQuery,
        parse_row: fn(&Row<'_>) -> RepoResult<T>,
    ) -> RepoResult<Page<T>> {
        // An enclosing caller transaction already pins the snapshot.
        let tx = if self.conn.is_autocommit() {
            Some(self.conn.unchecked_transaction()?)
        } else {
            None
        };

        let count = query.build_count();
        let total: i64 = self
            .conn
            .query_row(&count.sql, params_from_iter(count.params), |row| row.get(0))?;
        let total_count = u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {total}")))?;

        let items = fetch_rows(self.conn, build_select(query, Some(page)), parse_row)?;
        if let Some(tx) = tx {
            tx.commit()?;
        }

        debug!(
            "event=memo_page module=repo status=ok page={} size={} items={} total={}",
            page.page_index(),
            page.page_size(),
            items.len(),
            total_count
        );
        Ok(Page::new(items, total_count, page))
    }
}

impl MemoRepository for SqliteMemoRepository<'_> {
    fn insert(&self, memo_text: &str) -> RepoResult<Memo> {
        validate_memo_text(memo_text)?;

        self.conn
            .execute("INSERT INTO memo (memo_text) VALUES (?1);", [memo_text])?;

        Ok(Memo {
            mno: self.conn.last_insert_rowid(),
            memo_text: memo_text.to_string(),
        })
    }

    fn save(&self, memo: &Memo) -> RepoResult<Memo> {
        memo.validate()?;

        self.conn.execute(
            "INSERT INTO memo (mno, memo_text) VALUES (?1, ?2)
             ON CONFLICT (mno) DO UPDATE SET memo_text = excluded.memo_text;",
            params![memo.mno, memo.memo_text.as_str()],
        )?;

        Ok(memo.clone())
    }

    fn find_by_id(&self, mno: MemoId) -> RepoResult<Option<Memo>> {
        let row = self
            .conn
            .query_row(
                "SELECT mno, memo_text FROM memo WHERE mno = ?1;",
                [mno],
                |row| Ok((row.get::<_, MemoId>("mno")?, row.get::<_, String>("memo_text")?)),
            )
            .optional()?;

        row.map(|(mno, memo_text)| checked_memo(mno, memo_text))
            .transpose()
    }

    fn exists_by_id(&self, mno: MemoId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM memo WHERE mno = ?1);",
            [mno],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn count(&self) -> RepoResult<u64> {
        let count = MemoQuery::all().build_count();
        let total: i64 = self
            .conn
            .query_row(&count.sql, params_from_iter(count.params), |row| row.get(0))?;
        u64::try_from(total)
            .map_err(|_| RepoError::InvalidData(format!("negative row count {total}")))
    }

    fn update_text(&self, mno: MemoId, memo_text: &str) -> RepoResult<usize> {
        validate_memo_text(memo_text)?;

        let changed = self.conn.execute(
            "UPDATE memo SET memo_text = ?2 WHERE mno = ?1;",
            params![mno, memo_text],
        )?;
        Ok(changed)
    }

    fn update_memo(&self, memo: &Memo) -> RepoResult<usize> {
        self.update_text(memo.mno, &memo.memo_text)
    }

    fn delete_by_id(&self, mno: MemoId) -> RepoResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM memo WHERE mno = ?1;", [mno])?;
        Ok(changed)
    }

    fn delete_where_id_less_than(&self, threshold: MemoId) -> RepoResult<usize> {
        let delete = MemoQuery::filtered(MnoFilter::LessThan(threshold)).build_delete();
        let changed = self
            .conn
            .execute(&delete.sql, params_from_iter(delete.params))?;

        debug!(
            "event=memo_bulk_delete module=repo status=ok threshold={threshold} affected={changed}"
        );
        Ok(changed)
    }

    fn list_range(
        &self,
        from: MemoId,
        to: MemoId,
        sort: &Sort,
        page: &PageRequest,
    ) -> RepoResult<Page<Memo>> {
        let query =
            MemoQuery::filtered(MnoFilter::Between { from, to }).sorted_by(sort.clone());
        self.fetch_page(&query, page, MemoQuery::build_select, parse_memo_row)
    }

    fn list_between_desc(&self, from: MemoId, to: MemoId) -> RepoResult<Vec<Memo>> {
        let query = MemoQuery::filtered(MnoFilter::Between { from, to })
            .sorted_by(Sort::desc(SortField::Mno));
        fetch_rows(self.conn, query.build_select(None), parse_memo_row)
    }

    fn list_all_desc(&self) -> RepoResult<Vec<Memo>> {
        let query = MemoQuery::all().sorted_by(Sort::desc(SortField::Mno));
        fetch_rows(self.conn, query.build_select(None), parse_memo_row)
    }

    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Memo>> {
        self.fetch_page(
            &MemoQuery::all(),
            page,
            MemoQuery::build_select,
            parse_memo_row,
        )
    }

    fn list_greater_than(
        &self,
        lower_bound: MemoId,
        page: &PageRequest,
    ) -> RepoResult<Page<Memo>> {
        let query = MemoQuery::filtered(MnoFilter::GreaterThan(lower_bound));
        self.fetch_page(&query, page, MemoQuery::build_select, parse_memo_row)
    }

    fn list_summaries_greater_than(
        &self,
        lower_bound: MemoId,
        page: &PageRequest,
    ) -> RepoResult<Page<MemoSummary>> {
        let query = MemoQuery::filtered(MnoFilter::GreaterThan(lower_bound));
        self.fetch_page(
            &query,
            page,
            MemoQuery::build_summary_select,
            parse_summary_row,
        )
    }
}

fn fetch_rows<T>(
    conn: &Connection,
    built: BuiltQuery,
    parse_row: fn(&Row<'_>) -> RepoResult<T>,
) -> RepoResult<Vec<T>> {
    let mut stmt = conn.prepare(&built.sql)?;
    let mut rows = stmt.query(params_from_iter(built.params))?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(parse_row(row)?);
    }
    Ok(items)
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    checked_memo(row.get("mno")?, row.get("memo_text")?)
}

fn parse_summary_row(row: &Row<'_>) -> RepoResult<MemoSummary> {
    let memo = checked_memo(row.get(0)?, row.get(1)?)?;
    Ok(MemoSummary {
        mno: memo.mno,
        memo_text: memo.memo_text,
        current_date: row.get(2)?,
    })
}

fn checked_memo(mno: MemoId, memo_text: String) -> RepoResult<Memo> {
    let memo = Memo { mno, memo_text };
    memo.validate()
        .map_err(|err| RepoError::InvalidData(format!("memo {mno}: {err}")))?;
    Ok(memo)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version < expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "memo")? {
        return Err(RepoError::MissingRequiredTable("memo"));
    }

    for column in ["mno", "memo_text"] {
        if !table_has_column(conn, "memo", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "memo",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
