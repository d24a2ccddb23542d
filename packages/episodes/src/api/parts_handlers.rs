// ABOUTME: HTTP request handlers for the parts of an episode
// ABOUTME: List, add, delete, reposition, and reorder parts

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use partwise_core::{truncate, PartInput, PositionInput};
use tracing::info;

use super::extract::{ValidJson, ValidPath, ValidQuery};
use super::response::{ApiResponse, MessageBody};
use crate::db::DbState;
use crate::pagination::PaginationParams;

/// List an episode's parts, one page at a time
pub async fn list_parts(
    State(db): State<DbState>,
    ValidPath(episode_id): ValidPath<i64>,
    ValidQuery(pagination): ValidQuery<PaginationParams>,
) -> impl IntoResponse {
    info!(
        "Listing parts of episode {} (page {})",
        episode_id,
        pagination.page()
    );

    match db.part_service.list_parts(episode_id, &pagination).await {
        Ok(page) => (StatusCode::OK, ResponseJson(ApiResponse::success(page))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Add a part at the requested position
pub async fn add_part(
    State(db): State<DbState>,
    ValidPath(episode_id): ValidPath<i64>,
    ValidJson(input): ValidJson<PartInput>,
) -> impl IntoResponse {
    info!(
        "Adding part '{}' to episode {} at position {:?}",
        truncate(input.title.as_deref().unwrap_or_default(), 60),
        episode_id,
        input.position
    );

    match db.part_service.add_part(episode_id, input).await {
        Ok(part) => (StatusCode::CREATED, ResponseJson(ApiResponse::success(part))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Delete a part from an episode
pub async fn delete_part(
    State(db): State<DbState>,
    ValidPath((episode_id, part_id)): ValidPath<(i64, i64)>,
) -> impl IntoResponse {
    info!("Deleting part {} from episode {}", part_id, episode_id);

    match db.part_service.delete_part(episode_id, part_id).await {
        Ok(_) => {
            let body = MessageBody {
                message: "Part deleted successfully".to_string(),
            };
            (StatusCode::OK, ResponseJson(ApiResponse::success(body))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Move one part to a new position
pub async fn update_position(
    State(db): State<DbState>,
    ValidPath(episode_id): ValidPath<i64>,
    ValidJson(input): ValidJson<PositionInput>,
) -> impl IntoResponse {
    info!(
        "Repositioning part {:?} in episode {} to {:?}",
        input.id, episode_id, input.position
    );

    match db.part_service.set_part_position(episode_id, input).await {
        Ok(update) => (StatusCode::OK, ResponseJson(ApiResponse::success(update))).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Renumber every part of an episode to `0..N`
pub async fn reorder_parts(
    State(db): State<DbState>,
    ValidPath(episode_id): ValidPath<i64>,
) -> impl IntoResponse {
    info!("Reordering parts of episode {}", episode_id);

    match db.part_service.reorder_parts(episode_id).await {
        Ok(outcome) => {
            (StatusCode::OK, ResponseJson(ApiResponse::success(outcome))).into_response()
        }
        Err(e) => e.into_response(),
    }
}
