// ABOUTME: Episode storage layer using SQLite
// ABOUTME: CRUD for episodes; deleting an episode removes its parts in the same transaction

use chrono::Utc;
use sqlx::{Row, SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

use crate::parts::row_to_part;
use crate::types::{Episode, EpisodeCreateInput, EpisodeUpdateInput, EpisodeWithParts, Part};
use crate::StorageError;

pub struct EpisodeStorage {
    pool: SqlitePool,
}

impl EpisodeStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all episodes, oldest first
    pub async fn list_episodes(&self) -> Result<Vec<Episode>, StorageError> {
        debug!("Fetching episodes");

        let rows = sqlx::query("SELECT * FROM episodes ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_episode).collect()
    }

    /// List all episodes, each with its parts ordered by position
    pub async fn list_episodes_with_parts(&self) -> Result<Vec<EpisodeWithParts>, StorageError> {
        let episodes = self.list_episodes().await?;

        let rows = sqlx::query("SELECT * FROM parts ORDER BY episode_id, position, id")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let mut parts_by_episode: HashMap<i64, Vec<Part>> = HashMap::new();
        for row in &rows {
            let part = row_to_part(row)?;
            parts_by_episode.entry(part.episode_id).or_default().push(part);
        }

        Ok(episodes
            .into_iter()
            .map(|episode| {
                let parts = parts_by_episode.remove(&episode.id).unwrap_or_default();
                EpisodeWithParts { episode, parts }
            })
            .collect())
    }

    /// Get a single episode by ID
    pub async fn get_episode(&self, episode_id: i64) -> Result<Episode, StorageError> {
        debug!("Fetching episode: {}", episode_id);

        let row = sqlx::query("SELECT * FROM episodes WHERE id = ?")
            .bind(episode_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(r) => row_to_episode(&r),
            None => Err(StorageError::NotFound(format!("Episode {}", episode_id))),
        }
    }

    /// Get an episode together with its parts
    pub async fn get_episode_with_parts(
        &self,
        episode_id: i64,
    ) -> Result<EpisodeWithParts, StorageError> {
        let episode = self.get_episode(episode_id).await?;

        let rows = sqlx::query("SELECT * FROM parts WHERE episode_id = ? ORDER BY position, id")
            .bind(episode_id)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let parts = rows.iter().map(row_to_part).collect::<Result<Vec<_>, _>>()?;

        Ok(EpisodeWithParts { episode, parts })
    }

    /// Look an episode up inside the caller's transaction
    pub async fn find_episode(
        &self,
        conn: &mut SqliteConnection,
        episode_id: i64,
    ) -> Result<Option<Episode>, StorageError> {
        let row = sqlx::query("SELECT * FROM episodes WHERE id = ?")
            .bind(episode_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_episode).transpose()
    }

    /// Get an episode by title
    pub async fn get_episode_by_title(&self, title: &str) -> Result<Option<Episode>, StorageError> {
        debug!("Fetching episode by title: {}", title);

        let row = sqlx::query("SELECT * FROM episodes WHERE title = ?")
            .bind(title)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_episode).transpose()
    }

    /// Whether `title` is used by an episode other than `except`
    pub async fn title_taken(&self, title: &str, except: Option<i64>) -> Result<bool, StorageError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM episodes WHERE title = ? AND id IS NOT ?")
                .bind(title)
                .bind(except)
                .fetch_one(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        Ok(count > 0)
    }

    pub async fn count_episodes(&self) -> Result<i64, StorageError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM episodes")
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)
    }

    /// Create a new episode
    pub async fn create_episode(&self, input: EpisodeCreateInput) -> Result<Episode, StorageError> {
        let now = Utc::now();

        debug!("Creating episode: {}", input.title);

        let result = sqlx::query(
            r#"
            INSERT INTO episodes (title, description, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, &input.title))?;

        self.get_episode(result.last_insert_rowid()).await
    }

    /// Replace an episode's title and description
    pub async fn update_episode(
        &self,
        episode_id: i64,
        input: EpisodeUpdateInput,
    ) -> Result<Episode, StorageError> {
        debug!("Updating episode: {}", episode_id);

        let result = sqlx::query(
            "UPDATE episodes SET title = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(Utc::now())
        .bind(episode_id)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::from_write(e, &input.title))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Episode {}", episode_id)));
        }

        self.get_episode(episode_id).await
    }

    /// Delete an episode and all of its parts inside the caller's transaction
    pub async fn delete_episode(
        &self,
        conn: &mut SqliteConnection,
        episode_id: i64,
    ) -> Result<(), StorageError> {
        debug!("Deleting episode: {}", episode_id);

        let parts = sqlx::query("DELETE FROM parts WHERE episode_id = ?")
            .bind(episode_id)
            .execute(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        let result = sqlx::query("DELETE FROM episodes WHERE id = ?")
            .bind(episode_id)
            .execute(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Episode {}", episode_id)));
        }

        debug!(
            "Deleted episode {} with {} parts",
            episode_id,
            parts.rows_affected()
        );

        Ok(())
    }
}

/// Convert a database row to an Episode
fn row_to_episode(row: &sqlx::sqlite::SqliteRow) -> Result<Episode, StorageError> {
    Ok(Episode {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
