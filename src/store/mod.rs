//! Visitor-driven SQLite persistence for notes.

mod manager;
mod oper;
mod schema;
mod statement;
mod visitor;

pub use manager::DbManager;
pub use oper::NoteOper;
pub use schema::{create_schema, get_schema_version};
pub use statement::SqlStatement;
pub use visitor::{
    DbVisitor, DeleteNoteVisitor, InsertNoteVisitor, NoteSummary, QueryNoteVisitor,
    QueryNotesVisitor, UpdateNoteVisitor,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A mutating operation was handed a visitor with nothing to execute.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The visitor could not build statements from the current entity state.
    #[error("failed to prepare statements: {0}")]
    PrepareFailed(String),

    /// One or more statements errored during execution.
    ///
    /// Execution continues through the remaining statements and applied
    /// statements are not rolled back, so partial application is possible.
    #[error("{failed} of {total} statements failed (first error: {first_error})")]
    StatementFailed {
        failed: usize,
        total: usize,
        first_error: String,
    },

    /// Result rows could not be mapped back into the target entity.
    #[error("failed to materialize results: {0}")]
    MaterializeFailed(String),

    /// The database connection could not be opened.
    #[error("database initialization failed: {0}")]
    InitFailed(#[source] rusqlite::Error),

    /// The requested note was not found.
    #[error("note not found: {id}")]
    NotFound { id: String },

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;
