// ABOUTME: Partwise server assembly
// ABOUTME: Logging setup, router construction, and the HTTP server loop

use anyhow::Context;
use partwise_episodes::DbState;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod api;
pub mod config;
pub mod seed;


pub use api::create_router;
pub use config::{Config, ConfigError};
pub use seed::{seed, SeedReport};

/// Install the global subscriber. `RUST_LOG` wins over `default_level`.
pub fn init_logging(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A second call (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

/// Open the database and serve the API until the process is stopped
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let db = DbState::init(&config.database())
        .await
        .context("Failed to open database")?;

    let app = create_router(db, &config)?;
    let addr = config.socket_addr();

    info!("Server listening on http://{}", addr);
    info!("CORS origin: {}", config.cors_origin);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
