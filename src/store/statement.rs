//! Typed, parameterized SQL statement descriptors.

use rusqlite::types::Value;

/// One parameterized statement in a visitor's batch.
///
/// Parameters are bound by the driver rather than spliced into the SQL
/// text, so entity fields can never corrupt the statement.
#[derive(Debug, Clone)]
pub struct SqlStatement {
    sql: String,
    params: Vec<Value>,
}

impl SqlStatement {
    /// Creates a statement with no bound parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a statement with positional parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Returns the SQL text.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Returns the positional parameters.
    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// True for a whitespace-only statement. Blank statements are
    /// skipped by the manager, matching split-batch behavior where
    /// trailing separators produce empty entries.
    pub fn is_blank(&self) -> bool {
        self.sql.trim().is_empty()
    }
}
