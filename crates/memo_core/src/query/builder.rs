//! SQL statement builder for the `memo` table.

use super::page::PageRequest;
use super::sort::Sort;
use rusqlite::types::Value;

const MEMO_COLUMNS: &str = "mno, memo_text";
const SUMMARY_COLUMNS: &str = "mno, memo_text, date('now') AS today";

/// Id predicate applied to `mno`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MnoFilter {
    /// `from <= mno <= to`. Reversed bounds match nothing.
    Between { from: i64, to: i64 },
    /// `mno > value`.
    GreaterThan(i64),
    /// `mno < value`.
    LessThan(i64),
}

impl MnoFilter {
    fn push_where(&self, sql: &mut String, params: &mut Vec<Value>) {
        match *self {
            Self::Between { from, to } => {
                sql.push_str(" WHERE mno BETWEEN ? AND ?");
                params.push(Value::Integer(from));
                params.push(Value::Integer(to));
            }
            Self::GreaterThan(value) => {
                sql.push_str(" WHERE mno > ?");
                params.push(Value::Integer(value));
            }
            Self::LessThan(value) => {
                sql.push_str(" WHERE mno < ?");
                params.push(Value::Integer(value));
            }
        }
    }
}

/// SQL text plus positional bind values.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Filter and sort criteria for memo statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoQuery {
    pub filter: Option<MnoFilter>,
    pub sort: Sort,
}

impl MemoQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filtered(filter: MnoFilter) -> Self {
        Self {
            filter: Some(filter),
            sort: Sort::unsorted(),
        }
    }

    pub fn sorted_by(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Builds a `SELECT` for full memo rows.
    ///
    /// The page request's sort is appended after this query's own sort.
    pub fn build_select(&self, page: Option<&PageRequest>) -> BuiltQuery {
        self.select_with_columns(MEMO_COLUMNS, page)
    }

    /// Builds a `SELECT` for [`crate::MemoSummary`] rows.
    pub fn build_summary_select(&self, page: Option<&PageRequest>) -> BuiltQuery {
        self.select_with_columns(SUMMARY_COLUMNS, page)
    }

    /// Builds the `COUNT(*)` companion of [`Self::build_select`].
    pub fn build_count(&self) -> BuiltQuery {
        let mut sql = String::from("SELECT COUNT(*) FROM memo");
        let mut params = Vec::new();
        if let Some(filter) = self.filter {
            filter.push_where(&mut sql, &mut params);
        }
        sql.push(';');
        BuiltQuery { sql, params }
    }

    /// Builds one set-based `DELETE` covering every row the filter matches.
    pub fn build_delete(&self) -> BuiltQuery {
        let mut sql = String::from("DELETE FROM memo");
        let mut params = Vec::new();
        if let Some(filter) = self.filter {
            filter.push_where(&mut sql, &mut params);
        }
        sql.push(';');
        BuiltQuery { sql, params }
    }

    fn select_with_columns(&self, columns: &str, page: Option<&PageRequest>) -> BuiltQuery {
        let mut sql = format!("SELECT {columns} FROM memo");
        let mut params = Vec::new();
        if let Some(filter) = self.filter {
            filter.push_where(&mut sql, &mut params);
        }

        let sort = match page {
            Some(request) => self.sort.clone().and(request.sort().clone()),
            None => self.sort.clone(),
        };
        sql.push_str(&sort.to_order_by());

        if let Some(request) = page {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(Value::Integer(i64::from(request.page_size())));
            // Offset is at most u32::MAX * MAX_PAGE_SIZE, well inside i64.
            params.push(Value::Integer(request.offset() as i64));
        }
        sql.push(';');
        BuiltQuery { sql, params }
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoQuery, MnoFilter};
    use crate::query::{PageRequest, Sort, SortField};
    use rusqlite::types::Value;

    #[test]
    fn between_select_binds_range_and_page_window() {
        let page = PageRequest::sorted(2, 10, Sort::desc(SortField::Mno)).unwrap();
        let built = MemoQuery::filtered(MnoFilter::Between { from: 10, to: 50 })
            .build_select(Some(&page));

        assert_eq!(
            built.sql,
            "SELECT mno, memo_text FROM memo WHERE mno BETWEEN ? AND ? \
             ORDER BY mno DESC LIMIT ? OFFSET ?;"
        );
        assert_eq!(
            built.params,
            vec![
                Value::Integer(10),
                Value::Integer(50),
                Value::Integer(10),
                Value::Integer(20),
            ]
        );
    }

    #[test]
    fn query_sort_takes_precedence_over_page_sort() {
        let page = PageRequest::sorted(0, 5, Sort::asc(SortField::Mno)).unwrap();
        let built = MemoQuery::all()
            .sorted_by(Sort::desc(SortField::MemoText))
            .build_select(Some(&page));
        assert!(built.sql.contains("ORDER BY memo_text DESC, mno ASC"));
    }

    #[test]
    fn count_and_delete_share_filter_without_paging() {
        let query = MemoQuery::filtered(MnoFilter::LessThan(250));

        let count = query.build_count();
        assert_eq!(count.sql, "SELECT COUNT(*) FROM memo WHERE mno < ?;");
        assert_eq!(count.params, vec![Value::Integer(250)]);

        let delete = query.build_delete();
        assert_eq!(delete.sql, "DELETE FROM memo WHERE mno < ?;");
        assert_eq!(delete.params, vec![Value::Integer(250)]);
    }

    #[test]
    fn summary_select_projects_current_date() {
        let built = MemoQuery::filtered(MnoFilter::GreaterThan(0)).build_summary_select(None);
        assert_eq!(
            built.sql,
            "SELECT mno, memo_text, date('now') AS today FROM memo \
             WHERE mno > ? ORDER BY mno ASC;"
        );
    }
}
