// ABOUTME: Common test utilities for episode and part integration tests
// ABOUTME: Database state (in-memory or file-backed), fixtures, and oneshot HTTP helpers

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use partwise_core::{EpisodeInput, PartInput};
use partwise_episodes::{create_api_router, DbState, Part};
use partwise_storage::DatabaseConfig;
use serde_json::Value;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

/// Fresh in-memory database with migrations applied
pub async fn setup() -> DbState {
    DbState::in_memory()
        .await
        .expect("Failed to create in-memory database")
}

/// Database in a temporary file with a multi-connection pool, so that
/// transactions from concurrent requests really interleave. Keep the
/// `TempDir` alive for the duration of the test.
#[allow(dead_code)]
pub async fn setup_file_backed() -> (TempDir, DbState) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = DatabaseConfig {
        path: Some(dir.path().join("partwise.db")),
        max_connections: 8,
        busy_timeout: Duration::from_secs(30),
    };
    let db = DbState::init(&config)
        .await
        .expect("Failed to create file database");
    (dir, db)
}

#[allow(dead_code)]
pub async fn setup_app() -> (DbState, Router) {
    let db = setup().await;
    let app = create_api_router(db.clone());
    (db, app)
}

/// Create an episode through the service, returning its id
pub async fn create_episode(db: &DbState, title: &str) -> i64 {
    db.episode_service
        .create_episode(EpisodeInput {
            title: Some(title.to_string()),
            description: Some(format!("{} description", title)),
        })
        .await
        .expect("Failed to create episode")
        .episode
        .id
}

/// Add a part through the service at `position`
pub async fn add_part(db: &DbState, episode_id: i64, title: &str, position: i64) -> Part {
    db.part_service
        .add_part(
            episode_id,
            PartInput {
                position: Some(position),
                title: Some(title.to_string()),
                description: Some(format!("{} description", title)),
            },
        )
        .await
        .expect("Failed to add part")
}

/// Episode with parts titled `{title} Part {i}` at positions `0..n`
#[allow(dead_code)]
pub async fn episode_with_parts(db: &DbState, title: &str, n: i64) -> (i64, Vec<i64>) {
    let episode_id = create_episode(db, title).await;
    let mut ids = Vec::new();
    for position in 0..n {
        let part = add_part(db, episode_id, &format!("{} Part {}", title, position), position).await;
        ids.push(part.id);
    }
    (episode_id, ids)
}

/// Part titles of an episode in position order
#[allow(dead_code)]
pub async fn titles_in_order(db: &DbState, episode_id: i64) -> Vec<String> {
    db.part_storage
        .list_parts(episode_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.title)
        .collect()
}

/// Positions of an episode's parts, sorted
#[allow(dead_code)]
pub async fn positions(db: &DbState, episode_id: i64) -> Vec<i64> {
    let mut positions: Vec<i64> = db
        .part_storage
        .list_parts(episode_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.position)
        .collect();
    positions.sort_unstable();
    positions
}

/// `(id, position)` of every part of an episode, in position order
#[allow(dead_code)]
pub async fn slots(db: &DbState, episode_id: i64) -> Vec<(i64, i64)> {
    db.part_storage
        .list_parts(episode_id)
        .await
        .unwrap()
        .into_iter()
        .map(|p| (p.id, p.position))
        .collect()
}

/// Send a request and decode the body as JSON (`Value::Null` when empty)
#[allow(dead_code)]
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
