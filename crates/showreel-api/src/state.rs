//! Shared application state handed to every handler.

use showreel_core::Config;
use showreel_db::PortfolioRepository;
use showreel_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub portfolio: PortfolioRepository,
    /// Where uploaded videos and thumbnails are written.
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: Config, portfolio: PortfolioRepository, storage: Arc<dyn Storage>) -> Self {
        Self {
            config,
            portfolio,
            storage,
        }
    }
}
