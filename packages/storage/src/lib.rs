// ABOUTME: Data layer for Partwise episodes and their ordered parts
// ABOUTME: SQLite pool setup, embedded migrations, and episode/part storage

use thiserror::Error;

pub mod db;
pub mod episodes;
pub mod parts;
pub mod types;

// Re-export main types
pub use db::{begin_write, connect, connect_in_memory, run_migrations, DatabaseConfig};
pub use episodes::EpisodeStorage;
pub use parts::{PartStorage, PositionRange};
pub use types::{
    Episode, EpisodeCreateInput, EpisodeUpdateInput, EpisodeWithParts, Part, PartCreateInput,
};

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Duplicate title: {0}")]
    DuplicateTitle(String),
}

impl StorageError {
    /// Translate a write failure, turning a unique-constraint violation on
    /// `title` into `DuplicateTitle`
    pub(crate) fn from_write(error: sqlx::Error, title: &str) -> Self {
        let is_unique_violation = error
            .as_database_error()
            .map(|db_error| db_error.is_unique_violation())
            .unwrap_or(false);

        if is_unique_violation {
            StorageError::DuplicateTitle(title.to_string())
        } else {
            StorageError::Sqlx(error)
        }
    }
}
