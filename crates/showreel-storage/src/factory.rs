use crate::{LocalStorage, Storage, StorageResult};
use showreel_core::Config;
use std::sync::Arc;

/// Create the media storage backend from configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.media_root.clone(), config.media_base_url.clone()).await?;
    Ok(Arc::new(storage))
}
