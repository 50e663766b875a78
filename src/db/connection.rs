//! SQLite connection pool for the SKM database
//!
//! All access goes through a small r2d2 pool. Every connection gets the
//! same PRAGMA setup, so foreign keys (RESTRICT on kitchen deletes, CASCADE
//! on recipe deletes) are enforced no matter which pooled connection a tool
//! call lands on.

use std::path::Path;
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use thiserror::Error;

/// Upper bound on pooled connections. MCP tool calls arrive one at a time,
/// so this is headroom, not throughput tuning.
const MAX_POOL_SIZE: u32 = 10;

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// `path` may be a filesystem path or a `file:` URI; URIs are how the
    /// tests hand every pooled connection the same in-memory database.
    pub fn new<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let manager = SqliteConnectionManager::file(path)
            .with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            )
            .with_init(|conn| {
                conn.execute_batch(
                    "PRAGMA foreign_keys = ON;
                     PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;
                     PRAGMA busy_timeout = 5000;
                     PRAGMA temp_store = MEMORY;",
                )?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(MAX_POOL_SIZE)
            .build(manager)?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Create a pool over a named shared in-memory database
    ///
    /// Plain `:memory:` gives each pooled connection its own empty database;
    /// a shared-cache URI makes them all see the same one. The name must be
    /// unique per database, so concurrent tests do not bleed into each other.
    pub fn in_memory_shared(name: &str) -> DbResult<Self> {
        Self::new(format!("file:{}?mode=memory&cache=shared", name))
    }

    /// Get a connection from the pool
    pub fn get_conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Execute a closure with a database connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> DbResult<T>,
    {
        let conn = self.get_conn()?;
        f(&conn)
    }

    /// Execute a closure with a mutable database connection (for transactions)
    pub fn with_conn_mut<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut rusqlite::Connection) -> DbResult<T>,
    {
        let mut conn = self.get_conn()?;
        f(&mut conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pooled_connections_share_in_memory_database() {
        let db = Database::in_memory_shared("skm_conn_pool_check").unwrap();

        let a = db.get_conn().unwrap();
        a.execute_batch("CREATE TABLE marker (id INTEGER PRIMARY KEY)").unwrap();
        a.execute("INSERT INTO marker (id) VALUES (1)", []).unwrap();

        // A second pooled connection must see the same database
        let b = db.get_conn().unwrap();
        let count: i64 = b
            .query_row("SELECT COUNT(*) FROM marker", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_foreign_keys_enforced_on_every_connection() {
        let db = Database::in_memory_shared("skm_conn_fk_check").unwrap();
        let conn = db.get_conn().unwrap();

        let fk: i64 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }
}
