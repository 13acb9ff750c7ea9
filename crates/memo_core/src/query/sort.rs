//! Sort orders over memo columns.

use super::{QueryError, QueryResult};
use serde::{Deserialize, Serialize};

/// Sortable memo column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Mno,
    MemoText,
}

impl SortField {
    /// Parses a field name, accepting column and property spellings.
    pub fn parse(name: &str) -> QueryResult<Self> {
        match name.trim() {
            "mno" | "id" => Ok(Self::Mno),
            "memo_text" | "memoText" | "text" => Ok(Self::MemoText),
            other => Err(QueryError::UnknownSortField(other.to_string())),
        }
    }

    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Mno => "mno",
            Self::MemoText => "memo_text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses `asc`/`desc` (or the long forms), ignoring case.
    pub fn parse(value: &str) -> QueryResult<Self> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(QueryError::UnknownSortDirection(trimmed.to_string())),
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: SortField,
    pub direction: SortDirection,
}

/// Ordered list of sort orders. Empty means storage order by `mno`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<SortOrder>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(field: SortField, direction: SortDirection) -> Self {
        Self {
            orders: vec![SortOrder { field, direction }],
        }
    }

    pub fn asc(field: SortField) -> Self {
        Self::by(field, SortDirection::Asc)
    }

    pub fn desc(field: SortField) -> Self {
        Self::by(field, SortDirection::Desc)
    }

    /// Appends `other`'s orders. A field already present keeps its first
    /// direction.
    pub fn and(mut self, other: Sort) -> Self {
        for order in other.orders {
            if !self.orders.iter().any(|known| known.field == order.field) {
                self.orders.push(order);
            }
        }
        self
    }

    /// Parses `field[,dir]` segments separated by `;`, e.g.
    /// `mno,desc;memoText,asc`. Direction defaults to ascending.
    pub fn parse(expr: &str) -> QueryResult<Self> {
        let mut sort = Self::unsorted();
        for segment in expr.split(';') {
            if segment.trim().is_empty() {
                continue;
            }
            let mut parts = segment.splitn(2, ',');
            let field = SortField::parse(parts.next().unwrap_or_default())?;
            let direction = match parts.next() {
                Some(value) => SortDirection::parse(value)?,
                None => SortDirection::Asc,
            };
            sort = sort.and(Self::by(field, direction));
        }
        Ok(sort)
    }

    pub fn orders(&self) -> &[SortOrder] {
        &self.orders
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    /// Renders an `ORDER BY` clause, appending `mno ASC` as tiebreaker when
    /// `mno` is not already ordered.
    pub(crate) fn to_order_by(&self) -> String {
        let mut terms: Vec<String> = self
            .orders
            .iter()
            .map(|order| format!("{} {}", order.field.column(), order.direction.keyword()))
            .collect();
        if !self.orders.iter().any(|order| order.field == SortField::Mno) {
            terms.push("mno ASC".to_string());
        }
        format!(" ORDER BY {}", terms.join(", "))
    }
}
