// ABOUTME: Part storage layer using SQLite
// ABOUTME: Episode-scoped reads plus the write primitives the part service runs in a transaction

use chrono::Utc;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::types::{Part, PartCreateInput};
use crate::StorageError;

/// Positions `[start, end)` of one episode; `end: None` is unbounded.
/// `exclude` keeps one part out of the range regardless of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRange {
    pub start: i64,
    pub end: Option<i64>,
    pub exclude: Option<i64>,
}

pub struct PartStorage {
    pool: SqlitePool,
}

impl PartStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List an episode's parts ordered by position
    pub async fn list_parts(&self, episode_id: i64) -> Result<Vec<Part>, StorageError> {
        let (parts, _) = self.list_parts_paginated(episode_id, None, None).await?;
        Ok(parts)
    }

    /// List an episode's parts with pagination, returning the page and the total count
    pub async fn list_parts_paginated(
        &self,
        episode_id: i64,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<(Vec<Part>, i64), StorageError> {
        debug!(
            "Fetching parts for episode: {} (limit: {:?}, offset: {:?})",
            episode_id, limit, offset
        );

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parts WHERE episode_id = ?")
            .bind(episode_id)
            .fetch_one(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        // SQLite needs a LIMIT before OFFSET; -1 means no limit
        let rows = sqlx::query(
            "SELECT * FROM parts WHERE episode_id = ? ORDER BY position, id LIMIT ? OFFSET ?",
        )
        .bind(episode_id)
        .bind(limit.unwrap_or(-1))
        .bind(offset.unwrap_or(0))
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let parts = rows.iter().map(row_to_part).collect::<Result<Vec<_>, _>>()?;

        Ok((parts, count))
    }

    /// Look a part up inside the caller's transaction
    pub async fn find_part(
        &self,
        conn: &mut SqliteConnection,
        part_id: i64,
    ) -> Result<Option<Part>, StorageError> {
        let row = sqlx::query("SELECT * FROM parts WHERE id = ?")
            .bind(part_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_part).transpose()
    }

    /// All parts of an episode ordered by position, read inside the caller's transaction
    pub async fn load_siblings(
        &self,
        conn: &mut SqliteConnection,
        episode_id: i64,
    ) -> Result<Vec<Part>, StorageError> {
        let rows = sqlx::query("SELECT * FROM parts WHERE episode_id = ? ORDER BY position, id")
            .bind(episode_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_part).collect()
    }

    /// Current positions of an episode's parts, in no particular order
    pub async fn positions(
        &self,
        conn: &mut SqliteConnection,
        episode_id: i64,
    ) -> Result<Vec<i64>, StorageError> {
        sqlx::query_scalar("SELECT position FROM parts WHERE episode_id = ?")
            .bind(episode_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)
    }

    /// Whether any part, in any episode, already uses `title`
    pub async fn title_taken(
        &self,
        conn: &mut SqliteConnection,
        title: &str,
    ) -> Result<bool, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM parts WHERE title = ?")
            .bind(title)
            .fetch_one(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(count > 0)
    }

    /// Insert a part at the position given in `input`. Callers make room first.
    pub async fn insert_part(
        &self,
        conn: &mut SqliteConnection,
        input: &PartCreateInput,
    ) -> Result<Part, StorageError> {
        let now = Utc::now();

        debug!(
            "Creating part '{}' in episode {} at position {}",
            input.title, input.episode_id, input.position
        );

        let result = sqlx::query(
            r#"
            INSERT INTO parts (episode_id, title, description, position, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(input.episode_id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.position)
        .bind(now)
        .bind(now)
        .execute(&mut *conn)
        .await
        .map_err(|e| StorageError::from_write(e, &input.title))?;

        let part_id = result.last_insert_rowid();
        self.find_part(conn, part_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("Part {}", part_id)))
    }

    /// Delete a part. Returns whether a row was removed.
    pub async fn delete_part(
        &self,
        conn: &mut SqliteConnection,
        part_id: i64,
    ) -> Result<bool, StorageError> {
        debug!("Deleting part: {}", part_id);

        let result = sqlx::query("DELETE FROM parts WHERE id = ?")
            .bind(part_id)
            .execute(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected() > 0)
    }

    /// Write one part's position
    pub async fn set_position(
        &self,
        conn: &mut SqliteConnection,
        part_id: i64,
        position: i64,
    ) -> Result<(), StorageError> {
        debug!("Setting position of part {} to {}", part_id, position);

        let result = sqlx::query("UPDATE parts SET position = ?, updated_at = ? WHERE id = ?")
            .bind(position)
            .bind(Utc::now())
            .bind(part_id)
            .execute(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("Part {}", part_id)));
        }

        Ok(())
    }

    /// Add `delta` to the position of every part of `episode_id` inside `range`.
    /// Returns the number of parts moved.
    pub async fn shift_positions(
        &self,
        conn: &mut SqliteConnection,
        episode_id: i64,
        range: PositionRange,
        delta: i64,
    ) -> Result<u64, StorageError> {
        debug!(
            "Shifting positions in episode {} over {:?} by {}",
            episode_id, range, delta
        );

        // Build the range filter based on which bounds are present
        let mut query_str = String::from(
            "UPDATE parts SET position = position + ?, updated_at = ? WHERE episode_id = ? AND position >= ?",
        );
        if range.end.is_some() {
            query_str.push_str(" AND position < ?");
        }
        if range.exclude.is_some() {
            query_str.push_str(" AND id != ?");
        }

        let mut query = sqlx::query(&query_str)
            .bind(delta)
            .bind(Utc::now())
            .bind(episode_id)
            .bind(range.start);

        // Bind parameters in the same order
        if let Some(end) = range.end {
            query = query.bind(end);
        }
        if let Some(exclude) = range.exclude {
            query = query.bind(exclude);
        }

        let result = query
            .execute(&mut *conn)
            .await
            .map_err(StorageError::Sqlx)?;

        Ok(result.rows_affected())
    }
}

/// Convert a database row to a Part
pub(crate) fn row_to_part(row: &sqlx::sqlite::SqliteRow) -> Result<Part, StorageError> {
    Ok(Part {
        id: row.try_get("id").map_err(StorageError::Sqlx)?,
        episode_id: row.try_get("episode_id").map_err(StorageError::Sqlx)?,
        title: row.try_get("title").map_err(StorageError::Sqlx)?,
        description: row.try_get("description").map_err(StorageError::Sqlx)?,
        position: row.try_get("position").map_err(StorageError::Sqlx)?,
        created_at: row.try_get("created_at").map_err(StorageError::Sqlx)?,
        updated_at: row.try_get("updated_at").map_err(StorageError::Sqlx)?,
    })
}
