//! Error types for edmview.
//!
//! Uses `thiserror` for ergonomic error definition. Every failure is a
//! deterministic function of the input tables and is reported as-is.

use thiserror::Error;

use crate::entity::{EntityKind, RowId};
use crate::link::LinkTable;

/// Result alias used throughout edmview.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for edmview operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}{}", .kind, context_suffix(.context.as_deref()))]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// What was being resolved when the error occurred.
    pub context: Option<String>,
}

fn context_suffix(context: Option<&str>) -> String {
    context.map(|c| format!(" (while resolving {c})")).unwrap_or_default()
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Attaches a description of what was being resolved.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Creates a not-found error for a row id outside its table.
    #[must_use]
    pub fn not_found<I: RowId>(id: I, len: usize) -> Self {
        Self::new(ErrorKind::NotFound {
            kind: I::KIND,
            index: id.raw(),
            len,
        })
    }

    /// Creates a malformed-range error.
    #[must_use]
    pub fn range(table: LinkTable, begin: u32, end: u32, len: usize) -> Self {
        Self::new(ErrorKind::Range {
            table,
            begin,
            end,
            len,
        })
    }

    /// Creates an orphaned-entity error.
    #[must_use]
    pub fn orphaned<I: RowId>(id: I) -> Self {
        Self::new(ErrorKind::OrphanedEntity {
            kind: I::KIND,
            index: id.raw(),
        })
    }

    /// Creates a misaligned-column error.
    #[must_use]
    pub fn misaligned(
        table: &'static str,
        column: &'static str,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::new(ErrorKind::MisalignedColumn {
            table,
            column,
            expected,
            actual,
        })
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig(message.into()))
    }

    /// Returns true for [`ErrorKind::NotFound`].
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, ErrorKind::NotFound { .. })
    }

    /// Returns true for [`ErrorKind::Range`].
    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self.kind, ErrorKind::Range { .. })
    }

    /// Returns true for [`ErrorKind::OrphanedEntity`].
    #[must_use]
    pub fn is_orphaned(&self) -> bool {
        matches!(self.kind, ErrorKind::OrphanedEntity { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// A row id or graph node outside `[0, row_count)`.
    #[error("{kind} {index} not found (table has {len} rows)")]
    NotFound {
        /// The kind of entity addressed.
        kind: EntityKind,
        /// The raw row id.
        index: u32,
        /// Number of rows in the addressed table.
        len: usize,
    },

    /// A `(begin, end)` range with `begin > end` or `end` past the table.
    #[error("malformed {table} range [{begin}, {end}) for link table of length {len}")]
    Range {
        /// The link table being sliced.
        table: LinkTable,
        /// Range start.
        begin: u32,
        /// Range end.
        end: u32,
        /// Length of the link table.
        len: usize,
    },

    /// An entity whose owner cannot be resolved from the link tables.
    #[error("{kind} {index} has no owning entity")]
    OrphanedEntity {
        /// The kind of the orphaned entity.
        kind: EntityKind,
        /// Its raw row id.
        index: u32,
    },

    /// A column whose length disagrees with the table's row count.
    #[error("column {table}.{column} has {actual} rows, expected {expected}")]
    MisalignedColumn {
        /// The table holding the column.
        table: &'static str,
        /// The offending column.
        column: &'static str,
        /// Rows expected.
        expected: usize,
        /// Rows found.
        actual: usize,
    },

    /// Configuration that cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
