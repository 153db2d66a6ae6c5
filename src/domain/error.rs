// ============================================================
// Layer 3 — Errors and Diagnostics
// ============================================================
// Two kinds of "something went wrong":
//
//   RestrictError — fatal. Detected before an operation touches
//                   any row (missing column, bad range, schema
//                   mismatch) or raised by I/O. The operation is
//                   aborted and its input is left as it was.
//
//   Diagnostic    — non-fatal. The operation still returns a
//                   result, but the caller is told about it:
//                   empty input, users excluded from a split,
//                   tied most-recent baskets, or a history/future
//                   user-set mismatch.

use std::fmt;

use polars::prelude::PolarsError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RestrictError>;

#[derive(Debug, Error)]
pub enum RestrictError {
    #[error("column '{column}' not found (available: {})", .available.join(", "))]
    MissingColumn { column: String, available: Vec<String> },

    #[error("schema mismatch: [{}] vs [{}]", .left.join(", "), .right.join(", "))]
    SchemaMismatch { left: Vec<String>, right: Vec<String> },

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },

    #[error("invalid {what} range: min {min} is greater than max {max}")]
    InvalidRange { what: &'static str, min: usize, max: usize },

    #[error("invalid restriction {name} = {value}: expected {min}..={max}")]
    InvalidRestriction { name: &'static str, value: usize, min: usize, max: usize },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A condition worth reporting that does not stop an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The operation was invoked on zero records and returned its input unchanged.
    EmptyDataset { operation: &'static str },

    /// Users with fewer than two baskets were left out of a split.
    ExcludedUsers { users: usize, records: usize },

    /// Too few users were eligible for a split; both outputs are empty.
    InsufficientUsers { eligible: usize, required: usize },

    /// Several raw basket ids of one user share the maximum order key.
    /// All of them went to future.
    TiedMaxBasket { user: String, baskets: Vec<String> },

    /// History and future disagree on which users they contain.
    UserSetMismatch { only_in_history: Vec<String>, only_in_future: Vec<String> },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::EmptyDataset { operation } => {
                write!(f, "{operation}: dataset is empty, nothing to do")
            }
            Diagnostic::ExcludedUsers { users, records } => {
                write!(f, "excluded {users} users ({records} records) with fewer than 2 baskets")
            }
            Diagnostic::InsufficientUsers { eligible, required } => {
                write!(f, "only {eligible} users have 2+ baskets, at least {required} required")
            }
            Diagnostic::TiedMaxBasket { user, baskets } => {
                write!(
                    f,
                    "user {user} has {} baskets tied for most recent ({}); all sent to future",
                    baskets.len(),
                    baskets.join(", ")
                )
            }
            Diagnostic::UserSetMismatch { only_in_history, only_in_future } => {
                write!(
                    f,
                    "history/future user sets differ: only in history [{}], only in future [{}]",
                    only_in_history.join(", "),
                    only_in_future.join(", ")
                )
            }
        }
    }
}

impl Diagnostic {
    /// True for diagnostics that signal a broken split rather than
    /// an expected reduction of the data.
    pub fn is_defect(&self) -> bool {
        matches!(self, Diagnostic::UserSetMismatch { .. } | Diagnostic::TiedMaxBasket { .. })
    }
}
