//! Error types for the runtime
//!
//! Both failure classes of a lookup are returned as values:
//! - a row that cannot be found under any candidate id ([`LookupError::NotFound`])
//! - a cell that cannot be parsed as its column's type ([`FieldParseError`])
//!
//! Callers that prefer the soft contract use
//! [`MaterializationCache::get_or_default`](crate::MaterializationCache::get_or_default).

/// A raw cell could not be parsed as its column's semantic type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("column '{column}': cannot parse '{raw}' as {expected}: {reason}")]
pub struct FieldParseError {
    /// Column name as authored in the source
    pub column: String,
    /// Raw cell text
    pub raw: String,
    /// Semantic type tag the column declares
    pub expected: &'static str,
    /// Parser diagnostic
    pub reason: String,
}

impl FieldParseError {
    /// Create field parse error
    pub fn new(
        column: impl Into<String>,
        raw: impl Into<String>,
        expected: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            raw: raw.into(),
            expected,
            reason: reason.into(),
        }
    }
}

/// Errors from typed row lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No active document holds the row under any candidate id column
    #[error("row '{row_id}' not found in table '{table}' of any active document")]
    NotFound {
        /// Table searched
        table: String,
        /// Requested row id
        row_id: String,
    },

    /// The row type is neither registered nor named after a loaded table
    #[error("no table bound to row type {type_name}")]
    UnboundType {
        /// Rust type name of the requested row type
        type_name: &'static str,
    },

    /// The row exists but one of its cells failed to parse
    #[error("failed to materialize row: {0}")]
    Parse(#[from] FieldParseError),
}

impl LookupError {
    /// Create not-found error
    pub fn not_found(table: impl Into<String>, row_id: impl Into<String>) -> Self {
        Self::NotFound {
            table: table.into(),
            row_id: row_id.into(),
        }
    }

    /// Check if the row was simply missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for lookups
pub type Result<T> = std::result::Result<T, LookupError>;
