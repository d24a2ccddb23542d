use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::db::DbState;

pub mod episodes_handlers;
pub mod extract;
pub mod parts_handlers;
pub mod response;

/// Creates the episodes API router (nested under /api/episodes)
pub fn create_episodes_router() -> Router<DbState> {
    Router::new()
        .route(
            "/",
            get(episodes_handlers::list_episodes).post(episodes_handlers::create_episode),
        )
        .route(
            "/{id}",
            get(episodes_handlers::get_episode)
                .put(episodes_handlers::update_episode)
                .delete(episodes_handlers::delete_episode),
        )
}

/// Creates the parts API router (nested under /api/episode/{episode})
pub fn create_parts_router() -> Router<DbState> {
    Router::new()
        .route("/parts", get(parts_handlers::list_parts))
        .route("/part", post(parts_handlers::add_part))
        .route("/parts/{part}", delete(parts_handlers::delete_part))
        .route(
            "/parts/update/positions",
            post(parts_handlers::update_position),
        )
        .route("/parts/reorder", post(parts_handlers::reorder_parts))
}

/// All episode and part routes under `/api`, with state applied
pub fn create_api_router(state: DbState) -> Router {
    Router::new()
        .nest("/api/episodes", create_episodes_router())
        .nest("/api/episode/{episode}", create_parts_router())
        .with_state(state)
}
