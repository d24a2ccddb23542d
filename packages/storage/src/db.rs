// ABOUTME: SQLite connection pool setup and migrations
// ABOUTME: Pragmas are set through connect options so every pooled connection gets them

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::StorageError;

/// Database connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite file path; `None` selects a private in-memory database
    pub path: Option<PathBuf>,
    pub max_connections: u32,
    pub busy_timeout: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: Some(partwise_core::database_file()),
            max_connections: 10,
            busy_timeout: Duration::from_secs(30),
        }
    }
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            ..Self::default()
        }
    }
}

/// Open a pool for `config` and bring the schema up to date
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, StorageError> {
    let pool = match &config.path {
        Some(path) => {
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            debug!("Connecting to database: {}", path.display());

            let options = SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .foreign_keys(true)
                .busy_timeout(config.busy_timeout);

            SqlitePoolOptions::new()
                .max_connections(config.max_connections)
                .acquire_timeout(config.busy_timeout)
                .connect_with(options)
                .await?
        }
        None => connect_in_memory_pool().await?,
    };

    info!("Database connection established");

    run_migrations(&pool).await?;

    Ok(pool)
}

/// In-memory database with migrations applied, used by tests and `:memory:`
pub async fn connect_in_memory() -> Result<SqlitePool, StorageError> {
    let pool = connect_in_memory_pool().await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

async fn connect_in_memory_pool() -> Result<SqlitePool, StorageError> {
    debug!("Connecting to in-memory database");

    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    // Each in-memory connection is its own database, so the pool holds
    // exactly one connection and never recycles it.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Open a transaction that holds SQLite's write lock from the start. A
/// deferred `BEGIN` that reads first fails with `SQLITE_BUSY` when it later
/// upgrades behind another writer; `BEGIN IMMEDIATE` waits out the busy
/// timeout instead.
pub async fn begin_write(
    pool: &SqlitePool,
) -> Result<Transaction<'static, Sqlite>, StorageError> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    debug!("Database migrations completed");
    Ok(())
}
