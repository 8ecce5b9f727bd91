//! Review Roster - team rosters and pull request reviewer assignment.
//!
//! Library behind the `review-roster` binary. Exposes the store, domain
//! services and the axum router so they can be driven from tests.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

use config::Config;
use error::AppError;

/// Open the database, serve the API and block until Ctrl-C.
pub async fn run(config: Config) -> Result<(), AppError> {
    let pool = db::initialize_with(&config.database_path, &config.pool).await?;

    let handle = services::start_server(config.listen_addr(), pool.clone()).await?;

    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("[main] Failed to listen for shutdown signal: {}", e);
    }

    handle.shutdown().await;
    pool.close().await;

    log::info!("[main] Shutdown complete");
    Ok(())
}
