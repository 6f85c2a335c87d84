//! Diet plan database
//!
//! A pooled SQLite file under the data directory. The server opens it once at
//! startup and every store tool borrows a connection through `with_conn`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

/// Connections kept open for concurrent tool calls
const POOL_SIZE: u32 = 10;
/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures from the diet plan store
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Could not create data directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("No database connection available: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Payload serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type DbResult<T> = Result<T, DbError>;

/// Shared handle to the diet plan database; clones share one pool
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl Database {
    /// Open the database file at `path`, creating it and its directory if missing
    ///
    /// Connections run in WAL mode so `list_diet_plans` can read while a save
    /// is in progress.
    pub fn new<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }

        let manager = SqliteConnectionManager::file(path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
            .with_init(|conn| {
                conn.busy_timeout(BUSY_TIMEOUT)?;
                conn.execute_batch(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;",
                )
            });

        let pool = Pool::builder().max_size(POOL_SIZE).build(manager)?;
        tracing::debug!(path = %path.display(), pool_size = POOL_SIZE, "Opened diet plan database");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Throwaway store for tests; one connection so every call sees the same data
    #[cfg(test)]
    pub fn in_memory() -> DbResult<Self> {
        let pool = Pool::builder()
            .max_size(1)
            .build(SqliteConnectionManager::memory())?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub fn get_conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Run `f` on a pooled connection, returning the connection afterwards
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> DbResult<T>,
    {
        let conn = self.get_conn()?;
        f(&conn)
    }
}
