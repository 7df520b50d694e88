//! SQLite store holding the persistent index tables.
//!
//! Uses r2d2 connection pooling so readers do not block each other. Every
//! index operation runs inside a transaction scoped by `write` or `read`.

use crate::codec::CodecError;
use crate::config::ConfigError;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Transaction;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("Corrupt stored value: {0}")]
    Codec(#[from] CodecError),
    #[error("Invalid table name: {0:?}")]
    InvalidTableName(String),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Table names are spliced into SQL, so only plain identifiers are allowed.
pub(crate) fn validate_table_name(name: &str) -> DatabaseResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(DatabaseError::InvalidTableName(name.to_string()))
    }
}

pub(crate) fn table_exists(txn: &Transaction<'_>, name: &str) -> DatabaseResult<bool> {
    let count: i64 = txn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Thread-safe handle to the index database.
pub struct IndexDatabase {
    pool: Pool<SqliteConnectionManager>,
}

impl IndexDatabase {
    /// Open or create a database at the given path with connection pooling
    pub fn open<P: AsRef<Path>>(path: P) -> DatabaseResult<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| {
                conn.execute_batch("
                    PRAGMA journal_mode=WAL;
                    PRAGMA synchronous=NORMAL;
                    PRAGMA cache_size=-32000;
                ")?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(8)
            .build(manager)?;

        Ok(Self { pool })
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let manager = SqliteConnectionManager::memory();

        // In-memory needs single connection to maintain state
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)?;

        Ok(Self { pool })
    }

    fn get_conn(&self) -> DatabaseResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Run `f` in a write transaction. Commits when `f` succeeds, rolls back
    /// when it fails.
    pub fn write<T, F>(&self, f: F) -> DatabaseResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> DatabaseResult<T>,
    {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    /// Run `f` in a transaction that is always rolled back.
    pub fn read<T, F>(&self, f: F) -> DatabaseResult<T>
    where
        F: FnOnce(&Transaction<'_>) -> DatabaseResult<T>,
    {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;
        f(&tx)
    }
}
