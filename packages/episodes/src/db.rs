// ABOUTME: Database connection management and service initialization
// ABOUTME: Provides shared access to the SQLite pool, storage layers, and services

use partwise_storage::{DatabaseConfig, EpisodeStorage, PartStorage, StorageError};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

use crate::locks::EpisodeLocks;
use crate::service::{EpisodeService, PartService};

/// Shared database state for API handlers
#[derive(Clone)]
pub struct DbState {
    pub pool: SqlitePool,
    pub episode_storage: Arc<EpisodeStorage>,
    pub part_storage: Arc<PartStorage>,
    pub episode_service: Arc<EpisodeService>,
    pub part_service: Arc<PartService>,
}

impl DbState {
    /// Create new database state from a SQLite pool
    pub fn new(pool: SqlitePool) -> Self {
        let episode_storage = Arc::new(EpisodeStorage::new(pool.clone()));
        let part_storage = Arc::new(PartStorage::new(pool.clone()));

        // Both services serialize on the same per-episode locks
        let locks = EpisodeLocks::new();

        let episode_service = Arc::new(EpisodeService::new(
            pool.clone(),
            episode_storage.clone(),
            locks.clone(),
        ));
        let part_service = Arc::new(PartService::new(
            pool.clone(),
            episode_storage.clone(),
            part_storage.clone(),
            locks,
        ));

        Self {
            pool,
            episode_storage,
            part_storage,
            episode_service,
            part_service,
        }
    }

    /// Connect with `config`, run migrations, and build the state
    pub async fn init(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let pool = partwise_storage::connect(config).await?;
        info!("Database state initialized");
        Ok(Self::new(pool))
    }

    /// Fresh in-memory database, used by tests
    pub async fn in_memory() -> Result<Self, StorageError> {
        let pool = partwise_storage::connect_in_memory().await?;
        Ok(Self::new(pool))
    }
}
