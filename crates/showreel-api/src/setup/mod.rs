//! Application setup and initialization
//!
//! Everything `main` needs to go from a `Config` to a ready router, kept here
//! so integration tests can build the same application.

pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use showreel_core::Config;
use showreel_db::PortfolioRepository;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config.environment);
    tracing::info!("Configuration loaded and validated successfully");

    let portfolio = PortfolioRepository::new(config.data_file.clone(), config.list_failure_policy);
    portfolio
        .init()
        .await
        .context("Failed to prepare portfolio document")?;

    let storage = storage::setup_storage(&config).await?;

    let state = Arc::new(AppState::new(config.clone(), portfolio, storage));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
