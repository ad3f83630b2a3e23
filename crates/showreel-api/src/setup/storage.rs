//! Media storage setup

use anyhow::{Context, Result};
use showreel_core::Config;
use showreel_storage::{create_storage, Storage};
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize media storage")?;

    tracing::info!(
        media_root = %config.media_root.display(),
        "Media storage initialized"
    );

    Ok(storage)
}
