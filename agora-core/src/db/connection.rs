use anyhow::{Context, Result};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;

use super::schema::SCHEMA;
use crate::config::Settings;

/// SQLite in-memory database identifier
const MEMORY_DB_PATH: &str = ":memory:";

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConnection = PooledConnection<SqliteConnectionManager>;

/// Database wrapper with connection pooling support
#[derive(Clone)]
pub struct Database {
    pub pool: DbPool,
}

impl Database {
    /// Create a new database connection pool
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let is_memory = Self::is_memory_path(&path);
        let manager = Self::create_connection_manager(path)?;

        // Every pooled connection to ":memory:" would otherwise open its own
        // private database, so memory pools are capped at one connection.
        let builder = if is_memory {
            Pool::builder().max_size(1)
        } else {
            Pool::builder()
        };

        let pool = builder
            .build(manager)
            .context("Failed to create database connection pool")?;
        Ok(Self { pool })
    }

    /// Create a database from loaded settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.database.path)
    }

    /// Create appropriate connection manager based on path
    ///
    /// # Arguments
    /// * `path` - Database file path or ":memory:" for in-memory database
    fn create_connection_manager<P: AsRef<Path>>(path: P) -> Result<SqliteConnectionManager> {
        let manager = if Self::is_memory_path(&path) {
            SqliteConnectionManager::memory()
        } else {
            SqliteConnectionManager::file(path)
        };

        // Foreign key enforcement is per-connection in SQLite
        Ok(manager.with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;")))
    }

    fn is_memory_path<P: AsRef<Path>>(path: &P) -> bool {
        let path_str = path.as_ref().to_string_lossy();
        path_str.trim().eq_ignore_ascii_case(MEMORY_DB_PATH)
    }

    /// Create an in-memory database pool (useful for testing)
    pub fn in_memory() -> Result<Self> {
        Self::new(MEMORY_DB_PATH)
    }

    /// Initialize the database schema
    pub fn initialize(&self) -> Result<()> {
        let conn = self.connection()?;
        conn.execute_batch(SCHEMA)
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn connection(&self) -> Result<DbConnection> {
        self.pool
            .get()
            .context("Failed to get database connection from pool")
    }
}
