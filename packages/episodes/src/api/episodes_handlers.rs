// ABOUTME: HTTP request handlers for episode operations
// ABOUTME: CRUD for episodes; responses embed each episode's parts in position order

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use partwise_core::EpisodeInput;
use tracing::info;

use super::extract::{ValidJson, ValidPath};
use super::response::ApiResponse;
use crate::db::DbState;

/// List all episodes with their parts
pub async fn list_episodes(State(db): State<DbState>) -> impl IntoResponse {
    info!("Listing episodes");

    match db.episode_service.list_episodes().await {
        Ok(episodes) => (StatusCode::OK, ResponseJson(ApiResponse::success(episodes))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Create a new episode
pub async fn create_episode(
    State(db): State<DbState>,
    ValidJson(input): ValidJson<EpisodeInput>,
) -> impl IntoResponse {
    info!("Creating episode: {:?}", input.title);

    match db.episode_service.create_episode(input).await {
        Ok(episode) => {
            (StatusCode::CREATED, ResponseJson(ApiResponse::success(episode))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Get a single episode by ID
pub async fn get_episode(
    State(db): State<DbState>,
    ValidPath(episode_id): ValidPath<i64>,
) -> impl IntoResponse {
    info!("Getting episode: {}", episode_id);

    match db.episode_service.get_episode(episode_id).await {
        Ok(episode) => (StatusCode::OK, ResponseJson(ApiResponse::success(episode))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Update an episode's title and description
pub async fn update_episode(
    State(db): State<DbState>,
    ValidPath(episode_id): ValidPath<i64>,
    ValidJson(input): ValidJson<EpisodeInput>,
) -> impl IntoResponse {
    info!("Updating episode: {}", episode_id);

    match db.episode_service.update_episode(episode_id, input).await {
        Ok(episode) => (StatusCode::OK, ResponseJson(ApiResponse::success(episode))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete an episode and its parts
pub async fn delete_episode(
    State(db): State<DbState>,
    ValidPath(episode_id): ValidPath<i64>,
) -> impl IntoResponse {
    info!("Deleting episode: {}", episode_id);

    match db.episode_service.delete_episode(episode_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => e.into_response(),
    }
}
