use axum::{extract::State, Json};
use chrono::Utc;
use partwise_episodes::DbState;
use serde_json::{json, Value};
use tracing::warn;

const SERVICE_NAME: &str = "partwise";

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": SERVICE_NAME
    }))
}

/// Health plus database reachability and the number of episodes
pub async fn status_check(State(db): State<DbState>) -> Json<Value> {
    let database = match db.episode_storage.count_episodes().await {
        Ok(episodes) => json!({ "connected": true, "episodes": episodes }),
        Err(e) => {
            warn!("Status check could not reach the database: {}", e);
            json!({ "connected": false, "episodes": null })
        }
    };

    let status = if database["connected"] == true {
        "healthy"
    } else {
        "degraded"
    };

    Json(json!({
        "status": status,
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "service": SERVICE_NAME,
        "database": database
    }))
}
