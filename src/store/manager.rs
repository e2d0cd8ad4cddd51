//! Database manager: a mutex-guarded SQLite connection driving visitors.

use crate::store::{DbVisitor, StoreError, StoreResult, create_schema};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{error, info};

/// Owns the SQLite connection and executes visitor statement batches.
///
/// One manager is constructed at startup and injected into the operations
/// that need it. Each of the four operations asks the visitor for its
/// statement batch, executes every non-blank statement inside the lock -
/// recording failures but continuing through the rest, with no rollback -
/// and then lets the visitor materialize result rows.
///
/// The lock guards the shared connection against reentrant access from
/// nested save triggers; all callers are expected on one thread.
pub struct DbManager {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl DbManager {
    /// Application identifier used in database filenames.
    pub const APP_ID: &'static str = "vnote";
    /// Database format version tag embedded in the filename.
    pub const DB_VERSION: &'static str = "2.0";

    // ===========================================
    // Connection Setup
    // ===========================================

    /// Opens an in-memory database with the note schema.
    ///
    /// This is useful for testing and scratch sessions that don't need
    /// persistence.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory().map_err(StoreError::InitFailed)?;
        create_schema(&conn).map_err(StoreError::InitFailed)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Opens or creates the database file at the given path.
    ///
    /// Creates parent directories if they don't exist. Initializes the
    /// schema if this is a new database.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path).map_err(StoreError::InitFailed)?;
        create_schema(&conn).map_err(StoreError::InitFailed)?;
        info!("database opened: {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens the database inside the given data directory.
    ///
    /// The file is named `<app-id><version>.db`. An unversioned legacy
    /// file `<app-id>.db` found in the same directory is migrated by
    /// renaming it to the versioned name.
    pub fn open_in_dir(data_dir: &Path) -> StoreResult<Self> {
        let versioned = data_dir.join(format!("{}{}.db", Self::APP_ID, Self::DB_VERSION));
        let legacy = data_dir.join(format!("{}.db", Self::APP_ID));

        if !versioned.exists() && legacy.exists() {
            fs::create_dir_all(data_dir).map_err(|e| StoreError::Io {
                path: data_dir.to_path_buf(),
                source: e,
            })?;
            fs::rename(&legacy, &versioned).map_err(|e| StoreError::Io {
                path: legacy.clone(),
                source: e,
            })?;
            info!(
                "migrated legacy database {} -> {}",
                legacy.display(),
                versioned.display()
            );
        }

        Self::open(&versioned)
    }

    /// Returns the database file path, or `None` for in-memory databases.
    pub fn db_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ===========================================
    // Visitor Operations
    // ===========================================

    /// Executes an insert visitor's batch and materializes the new rows.
    pub fn insert_data(&self, visitor: &mut dyn DbVisitor) -> StoreResult<()> {
        self.run(visitor, true, true)
    }

    /// Executes an update visitor's batch.
    pub fn update_data(&self, visitor: &mut dyn DbVisitor) -> StoreResult<()> {
        self.run(visitor, false, true)
    }

    /// Runs a query visitor: any pre-statements, then materialization.
    pub fn query_data(&self, visitor: &mut dyn DbVisitor) -> StoreResult<()> {
        self.run(visitor, true, false)
    }

    /// Executes a delete visitor's batch.
    pub fn delete_data(&self, visitor: &mut dyn DbVisitor) -> StoreResult<()> {
        self.run(visitor, false, true)
    }

    fn run(
        &self,
        visitor: &mut dyn DbVisitor,
        materialize: bool,
        require_statements: bool,
    ) -> StoreResult<()> {
        let statements = visitor.prepare_statements()?;

        let total = statements.iter().filter(|s| !s.is_blank()).count();
        if require_statements && total == 0 {
            return Err(StoreError::InvalidArgument(
                "visitor prepared an empty statement batch".to_string(),
            ));
        }

        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);

        let mut failed = 0usize;
        let mut first_error: Option<String> = None;
        for stmt in &statements {
            if stmt.is_blank() {
                continue;
            }
            if let Err(e) = conn.execute(
                stmt.sql(),
                rusqlite::params_from_iter(stmt.params().iter()),
            ) {
                error!(sql = stmt.sql(), driver_error = %e, "statement failed");
                failed += 1;
                if first_error.is_none() {
                    first_error = Some(e.to_string());
                }
            }
        }

        // Materialization runs under the same lock so reads see the batch.
        let materialized = if materialize {
            visitor.materialize(&conn)
        } else {
            Ok(())
        };
        drop(conn);

        if failed > 0 {
            return Err(StoreError::StatementFailed {
                failed,
                total,
                first_error: first_error.unwrap_or_default(),
            });
        }

        materialized
    }
}
