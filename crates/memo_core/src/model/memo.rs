//! Memo record and text validation.
//!
//! # Responsibility
//! - Define the single-table memo shape shared by repository and service.
//! - Validate memo text before it reaches SQL.
//!
//! # Invariants
//! - `mno` is positive once assigned by storage.
//! - `memo_text` is non-blank and at most [`MEMO_TEXT_MAX_CHARS`] characters.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned memo identifier.
pub type MemoId = i64;

/// Maximum memo text length in characters (mirrors the `memo_text` column).
pub const MEMO_TEXT_MAX_CHARS: usize = 200;

/// Validation failures for memo fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoValidationError {
    /// Memo text is empty or whitespace only.
    BlankText,
    /// Memo text exceeds the column length.
    TextTooLong { chars: usize, max: usize },
    /// Identifier is zero or negative.
    NonPositiveId(MemoId),
}

impl Display for MemoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankText => write!(f, "memo_text must not be blank"),
            Self::TextTooLong { chars, max } => {
                write!(f, "memo_text has {chars} chars, max is {max}")
            }
            Self::NonPositiveId(id) => write!(f, "mno must be positive, got {id}"),
        }
    }
}

impl Error for MemoValidationError {}

/// One row of the `memo` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memo {
    pub mno: MemoId,
    pub memo_text: String,
}

impl Memo {
    /// Builds a memo with a known id, validating both fields.
    ///
    /// Used by upsert paths where the caller already owns the identifier.
    pub fn with_id(mno: MemoId, memo_text: impl Into<String>) -> Result<Self, MemoValidationError> {
        let memo = Self {
            mno,
            memo_text: memo_text.into(),
        };
        memo.validate()?;
        Ok(memo)
    }

    /// Checks id and text invariants.
    pub fn validate(&self) -> Result<(), MemoValidationError> {
        if self.mno <= 0 {
            return Err(MemoValidationError::NonPositiveId(self.mno));
        }
        validate_memo_text(&self.memo_text)
    }
}

/// Read projection returned by summary listings.
///
/// `current_date` is the backend's `date('now')` at query time (`YYYY-MM-DD`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoSummary {
    pub mno: MemoId,
    pub memo_text: String,
    pub current_date: String,
}

/// Validates memo text against column constraints.
pub fn validate_memo_text(text: &str) -> Result<(), MemoValidationError> {
    if text.trim().is_empty() {
        return Err(MemoValidationError::BlankText);
    }
    let chars = text.chars().count();
    if chars > MEMO_TEXT_MAX_CHARS {
        return Err(MemoValidationError::TextTooLong {
            chars,
            max: MEMO_TEXT_MAX_CHARS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_memo_text, Memo, MemoValidationError, MEMO_TEXT_MAX_CHARS};

    #[test]
    fn text_length_counts_chars_not_bytes() {
        let text = "메".repeat(MEMO_TEXT_MAX_CHARS);
        assert!(validate_memo_text(&text).is_ok());

        let too_long = "a".repeat(MEMO_TEXT_MAX_CHARS + 1);
        assert_eq!(
            validate_memo_text(&too_long),
            Err(MemoValidationError::TextTooLong {
                chars: MEMO_TEXT_MAX_CHARS + 1,
                max: MEMO_TEXT_MAX_CHARS,
            })
        );
    }

    #[test]
    fn with_id_rejects_non_positive_id_and_blank_text() {
        assert_eq!(
            Memo::with_id(0, "x").unwrap_err(),
            MemoValidationError::NonPositiveId(0)
        );
        assert_eq!(
            Memo::with_id(1, "   ").unwrap_err(),
            MemoValidationError::BlankText
        );
    }
}
