// ABOUTME: Part service: add, delete, reposition, reorder, and list parts of an episode
// ABOUTME: Each mutation loads the sibling set, reconciles positions, and writes in one transaction

use partwise_core::{
    validate_part_input, validate_position_input, PartInput, PositionInput, ValidationError,
};
use partwise_positions::{self as positions, Move, PositionShift, Slot};
use partwise_storage::{
    EpisodeStorage, Part, PartCreateInput, PartStorage, PositionRange, StorageError,
};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::reject;
use crate::error::{ServiceError, ServiceResult};
use crate::locks::EpisodeLocks;
use crate::pagination::{PaginatedResponse, PaginationParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionStatus {
    Updated,
    Unchanged,
}

/// Result of a reposition request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionUpdate {
    pub part_id: i64,
    pub status: PositionStatus,
    pub position: i64,
    pub previous_position: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReorderOutcome {
    /// Parts whose position was rewritten
    pub changed: usize,
    pub parts: Vec<Part>,
}

pub struct PartService {
    pool: SqlitePool,
    episodes: Arc<EpisodeStorage>,
    parts: Arc<PartStorage>,
    locks: EpisodeLocks,
}

impl PartService {
    pub fn new(
        pool: SqlitePool,
        episodes: Arc<EpisodeStorage>,
        parts: Arc<PartStorage>,
        locks: EpisodeLocks,
    ) -> Self {
        Self {
            pool,
            episodes,
            parts,
            locks,
        }
    }

    /// One page of an episode's parts, ordered by position
    pub async fn list_parts(
        &self,
        episode_id: i64,
        params: &PaginationParams,
    ) -> ServiceResult<PaginatedResponse<Part>> {
        self.episodes.get_episode(episode_id).await?;

        let (parts, total) = self
            .parts
            .list_parts_paginated(episode_id, Some(params.limit()), Some(params.offset()))
            .await?;

        Ok(PaginatedResponse::new(parts, params, total))
    }

    /// Insert a part, shifting every sibling at or after the assigned slot
    pub async fn add_part(&self, episode_id: i64, input: PartInput) -> ServiceResult<Part> {
        let _guard = self.locks.lock(episode_id).await;
        let mut tx = self.begin().await?;

        self.require_episode(&mut tx, episode_id).await?;

        let mut errors = validate_part_input(&input);
        if let Some(title) = input.title.as_deref() {
            let title_valid = !errors.iter().any(|e| e.field == "title");
            if title_valid
                && self
                    .parts
                    .title_taken(&mut tx, title)
                    .await
                    .map_err(ServiceError::in_transaction)?
            {
                errors.push(ValidationError::new(
                    "title",
                    "The title has already been taken.",
                ));
            }
        }
        reject(errors)?;

        let (Some(requested), Some(title)) = (input.position, input.title) else {
            // Both are guaranteed by validation
            return Err(ServiceError::validation(
                "position",
                "The position field is required.",
            ));
        };

        let siblings = self.siblings(&mut tx, episode_id).await?;
        let was_contiguous = contiguous(&siblings);
        let insertion =
            positions::insert(&siblings, requested).map_err(ServiceError::from_position)?;

        if let Some(shift) = insertion.shift {
            self.apply_shift(&mut tx, episode_id, shift).await?;
        }

        let part = self
            .parts
            .insert_part(
                &mut tx,
                &PartCreateInput {
                    episode_id,
                    title,
                    description: input.description,
                    position: insertion.position,
                },
            )
            .await
            .map_err(ServiceError::in_transaction)?;

        self.ensure_contiguous(&mut tx, episode_id, was_contiguous)
            .await?;
        commit(tx).await?;

        info!(
            "Added part {} to episode {} at position {} (requested {})",
            part.id, episode_id, part.position, requested
        );
        Ok(part)
    }

    /// Delete a part and close the gap it leaves
    pub async fn delete_part(&self, episode_id: i64, part_id: i64) -> ServiceResult<Part> {
        let _guard = self.locks.lock(episode_id).await;
        let mut tx = self.begin().await?;

        self.require_episode(&mut tx, episode_id).await?;
        let part = self
            .parts
            .find_part(&mut tx, part_id)
            .await
            .map_err(ServiceError::in_transaction)?
            .ok_or_else(|| ServiceError::not_found(format!("Part {} not found.", part_id)))?;

        if part.episode_id != episode_id {
            warn!(
                "Refusing to delete part {} through episode {} (owned by episode {})",
                part_id, episode_id, part.episode_id
            );
            return Err(ServiceError::not_found("Part does not belong to the episode."));
        }

        let siblings = self.siblings(&mut tx, episode_id).await?;
        let was_contiguous = contiguous(&siblings);
        let removal = positions::remove(&siblings, part_id).map_err(ServiceError::from_position)?;

        self.parts
            .delete_part(&mut tx, part_id)
            .await
            .map_err(ServiceError::in_transaction)?;

        if let Some(shift) = removal.shift {
            self.apply_shift(&mut tx, episode_id, shift).await?;
        }

        self.ensure_contiguous(&mut tx, episode_id, was_contiguous)
            .await?;
        commit(tx).await?;

        info!(
            "Deleted part {} from position {} of episode {}",
            part_id, removal.position, episode_id
        );
        Ok(part)
    }

    /// Move a part to a new position within its episode. A request for the
    /// part's current slot performs no write.
    pub async fn set_part_position(
        &self,
        episode_id: i64,
        input: PositionInput,
    ) -> ServiceResult<PositionUpdate> {
        let _guard = self.locks.lock(episode_id).await;
        let mut tx = self.begin().await?;

        self.require_episode(&mut tx, episode_id).await?;

        let mut errors = validate_position_input(&input);
        let mut part = None;
        if let Some(id) = input.id {
            part = self
                .parts
                .find_part(&mut tx, id)
                .await
                .map_err(ServiceError::in_transaction)?;
            if part.is_none() {
                errors.push(ValidationError::new("id", "The selected id is invalid."));
            }
        }
        reject(errors)?;

        let (Some(part), Some(requested)) = (part, input.position) else {
            return Err(ServiceError::validation("id", "The id field is required."));
        };

        if part.episode_id != episode_id {
            return Err(ServiceError::not_found("Part not found."));
        }

        let siblings = self.siblings(&mut tx, episode_id).await?;
        let was_contiguous = contiguous(&siblings);
        let planned =
            positions::move_to(&siblings, part.id, requested).map_err(ServiceError::from_position)?;

        let Move::Moved { from, to, shift } = planned else {
            debug!(
                "Part {} already at position {}, nothing to do",
                part.id, part.position
            );
            // Nothing was written; dropping the transaction releases it
            return Ok(PositionUpdate {
                part_id: part.id,
                status: PositionStatus::Unchanged,
                position: part.position,
                previous_position: part.position,
                message: "Position is already set to the requested value".to_string(),
            });
        };

        self.apply_shift(&mut tx, episode_id, shift).await?;
        self.parts
            .set_position(&mut tx, part.id, to)
            .await
            .map_err(ServiceError::in_transaction)?;

        self.ensure_contiguous(&mut tx, episode_id, was_contiguous)
            .await?;
        commit(tx).await?;

        info!(
            "Moved part {} in episode {} from {} to {} (requested {})",
            part.id, episode_id, from, to, requested
        );
        Ok(PositionUpdate {
            part_id: part.id,
            status: PositionStatus::Updated,
            position: to,
            previous_position: from,
            message: "Position updated successfully".to_string(),
        })
    }

    /// Renumber an episode's parts to `0..N` in their current order. Repairs
    /// gaps and duplicates; running it on a contiguous episode writes nothing.
    pub async fn reorder_parts(&self, episode_id: i64) -> ServiceResult<ReorderOutcome> {
        let _guard = self.locks.lock(episode_id).await;
        let mut tx = self.begin().await?;

        self.require_episode(&mut tx, episode_id).await?;

        let siblings = self.siblings(&mut tx, episode_id).await?;
        let mut changed = 0;
        for assignment in positions::renumber(&siblings) {
            if !assignment.is_change() {
                continue;
            }
            self.parts
                .set_position(&mut tx, assignment.part_id, assignment.to)
                .await
                .map_err(ServiceError::in_transaction)?;
            changed += 1;
        }

        self.ensure_contiguous(&mut tx, episode_id, true).await?;
        let parts = self
            .parts
            .load_siblings(&mut tx, episode_id)
            .await
            .map_err(ServiceError::in_transaction)?;
        commit(tx).await?;

        info!(
            "Reordered episode {}: {} of {} parts renumbered",
            episode_id,
            changed,
            parts.len()
        );
        Ok(ReorderOutcome { changed, parts })
    }

    /// Whether an episode's positions are exactly `0..N`
    pub async fn is_contiguous(&self, episode_id: i64) -> ServiceResult<bool> {
        self.episodes.get_episode(episode_id).await?;

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| ServiceError::Internal(StorageError::Sqlx(e)))?;
        let current = self.parts.positions(&mut conn, episode_id).await?;

        Ok(positions::verify_contiguous(current).is_ok())
    }

    async fn begin(&self) -> ServiceResult<sqlx::Transaction<'static, sqlx::Sqlite>> {
        partwise_storage::begin_write(&self.pool)
            .await
            .map_err(ServiceError::in_transaction)
    }

    async fn require_episode(
        &self,
        conn: &mut SqliteConnection,
        episode_id: i64,
    ) -> ServiceResult<()> {
        match self
            .episodes
            .find_episode(conn, episode_id)
            .await
            .map_err(ServiceError::in_transaction)?
        {
            Some(_) => Ok(()),
            None => Err(ServiceError::not_found(format!(
                "Episode {} not found.",
                episode_id
            ))),
        }
    }

    async fn siblings(
        &self,
        conn: &mut SqliteConnection,
        episode_id: i64,
    ) -> ServiceResult<Vec<Slot>> {
        let parts = self
            .parts
            .load_siblings(conn, episode_id)
            .await
            .map_err(ServiceError::in_transaction)?;

        Ok(parts
            .iter()
            .map(|part| Slot::new(part.id, part.position))
            .collect())
    }

    async fn apply_shift(
        &self,
        conn: &mut SqliteConnection,
        episode_id: i64,
        shift: PositionShift,
    ) -> ServiceResult<()> {
        let range = PositionRange {
            start: shift.start,
            end: shift.end,
            exclude: shift.exclude,
        };

        self.parts
            .shift_positions(conn, episode_id, range, shift.delta)
            .await
            .map_err(ServiceError::in_transaction)?;
        Ok(())
    }

    /// Re-read positions before commit. A mutation must not break an episode
    /// that was contiguous; one that was already broken is left for reorder.
    async fn ensure_contiguous(
        &self,
        conn: &mut SqliteConnection,
        episode_id: i64,
        was_contiguous: bool,
    ) -> ServiceResult<()> {
        let current = self
            .parts
            .positions(conn, episode_id)
            .await
            .map_err(ServiceError::in_transaction)?;

        match positions::verify_contiguous(current) {
            Ok(()) => Ok(()),
            Err(e) if was_contiguous => {
                error!(
                    "Positions of episode {} broken by mutation ({}), rolling back",
                    episode_id, e
                );
                Err(ServiceError::from_position(e))
            }
            Err(e) => {
                warn!(
                    "Episode {} positions are not contiguous ({}); run reorder to repair",
                    episode_id, e
                );
                Ok(())
            }
        }
    }
}

fn contiguous(siblings: &[Slot]) -> bool {
    positions::verify_contiguous(siblings.iter().map(|slot| slot.position)).is_ok()
}

async fn commit(tx: sqlx::Transaction<'static, sqlx::Sqlite>) -> ServiceResult<()> {
    tx.commit()
        .await
        .map_err(|e| ServiceError::Transaction(StorageError::Sqlx(e)))
}
