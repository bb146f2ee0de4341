//! Fatal conditions raised while reading records or building a thread tree.
//! Orphaned comments are not errors; they are carried on the build result.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThreadError {
    /// A row is missing a required field or carries a value that cannot be parsed.
    /// `row` is 1-based over data rows (header excluded).
    #[error("malformed record at row {row}: `{field}` {reason}")]
    MalformedRecord {
        row: usize,
        field: String,
        reason: String,
    },

    #[error("no comment records in input")]
    EmptyInput,

    /// A record id already present in the tree (the root id included).
    #[error("duplicate comment id `{id}`")]
    DuplicateId { id: String },
}

impl ThreadError {
    pub fn missing(row: usize, field: &str) -> Self {
        ThreadError::MalformedRecord {
            row,
            field: field.to_string(),
            reason: "is missing".to_string(),
        }
    }

    pub fn invalid(row: usize, field: &str, reason: impl Into<String>) -> Self {
        ThreadError::MalformedRecord {
            row,
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}
