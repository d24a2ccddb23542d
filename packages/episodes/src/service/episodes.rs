// ABOUTME: Episode service: list, show, create, update, and delete episodes
// ABOUTME: Enforces title rules and deletes an episode's parts in the same transaction

use partwise_core::{validate_episode_input, EpisodeInput, ValidationError};
use partwise_storage::{
    EpisodeCreateInput, EpisodeStorage, EpisodeUpdateInput, EpisodeWithParts, StorageError,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::info;

use super::reject;
use crate::error::{ServiceError, ServiceResult};
use crate::locks::EpisodeLocks;

pub struct EpisodeService {
    pool: SqlitePool,
    episodes: Arc<EpisodeStorage>,
    locks: EpisodeLocks,
}

impl EpisodeService {
    pub fn new(pool: SqlitePool, episodes: Arc<EpisodeStorage>, locks: EpisodeLocks) -> Self {
        Self {
            pool,
            episodes,
            locks,
        }
    }

    pub async fn list_episodes(&self) -> ServiceResult<Vec<EpisodeWithParts>> {
        Ok(self.episodes.list_episodes_with_parts().await?)
    }

    pub async fn get_episode(&self, episode_id: i64) -> ServiceResult<EpisodeWithParts> {
        Ok(self.episodes.get_episode_with_parts(episode_id).await?)
    }

    pub async fn create_episode(&self, input: EpisodeInput) -> ServiceResult<EpisodeWithParts> {
        let title = self.validated_title(&input, None).await?;

        let episode = self
            .episodes
            .create_episode(EpisodeCreateInput {
                title,
                description: input.description,
            })
            .await?;

        info!("Created episode {} ({})", episode.id, episode.title);
        Ok(EpisodeWithParts {
            episode,
            parts: Vec::new(),
        })
    }

    /// Replace title and description. The episode's own title does not count
    /// as taken.
    pub async fn update_episode(
        &self,
        episode_id: i64,
        input: EpisodeInput,
    ) -> ServiceResult<EpisodeWithParts> {
        self.episodes.get_episode(episode_id).await?;
        let title = self.validated_title(&input, Some(episode_id)).await?;

        self.episodes
            .update_episode(
                episode_id,
                EpisodeUpdateInput {
                    title,
                    description: input.description,
                },
            )
            .await?;

        info!("Updated episode {}", episode_id);
        self.get_episode(episode_id).await
    }

    /// Delete an episode together with its parts
    pub async fn delete_episode(&self, episode_id: i64) -> ServiceResult<()> {
        let _guard = self.locks.lock(episode_id).await;

        let mut tx = partwise_storage::begin_write(&self.pool)
            .await
            .map_err(ServiceError::in_transaction)?;

        self.episodes
            .delete_episode(&mut tx, episode_id)
            .await
            .map_err(ServiceError::in_transaction)?;

        tx.commit()
            .await
            .map_err(|e| ServiceError::Transaction(StorageError::Sqlx(e)))?;

        info!("Deleted episode {}", episode_id);
        Ok(())
    }

    /// Run field validation plus the uniqueness rule, returning the title
    async fn validated_title(
        &self,
        input: &EpisodeInput,
        except: Option<i64>,
    ) -> ServiceResult<String> {
        let mut errors = validate_episode_input(input);

        if let Some(title) = input.title.as_deref() {
            let title_valid = !errors.iter().any(|e| e.field == "title");
            if title_valid && self.episodes.title_taken(title, except).await? {
                errors.push(ValidationError::new(
                    "title",
                    "The title has already been taken.",
                ));
            }
        }
        reject(errors)?;

        input
            .title
            .clone()
            .ok_or_else(|| ServiceError::validation("title", "The title field is required."))
    }
}
