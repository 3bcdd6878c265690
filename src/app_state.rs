use std::sync::Arc;

use crate::services::coinmarket::CoinMarketClient;
use crate::services::store::JobStore;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JobStore>,
    pub coinmarket: Arc<CoinMarketClient>,
}

impl AppState {
    pub fn new(store: JobStore, coinmarket: CoinMarketClient) -> Self {
        Self {
            store: Arc::new(store),
            coinmarket: Arc::new(coinmarket),
        }
    }
}
