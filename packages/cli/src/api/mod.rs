use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use partwise_episodes::{create_api_router, DbState};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::{Config, ConfigError};

pub mod health;

/// Full application router: health endpoints, episode and part routes,
/// tracing, panic recovery, and CORS
pub fn create_router(state: DbState, config: &Config) -> Result<Router, ConfigError> {
    let health = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/status", get(health::status_check))
        .with_state(state.clone());

    Ok(Router::new()
        .merge(health)
        .merge(create_api_router(state))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origin)?))
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ConfigError> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origin == "*" {
        return Ok(cors.allow_origin(Any));
    }

    let origin = origin
        .parse::<HeaderValue>()
        .map_err(|_| ConfigError::InvalidCorsOrigin(origin.to_string()))?;
    Ok(cors.allow_origin(origin))
}
