use std::sync::Arc;

use showfinder_core::watchlist::WatchlistStore;
use showfinder_metadata::CatalogProvider;
use sqlx::SqlitePool;

use crate::config::ServerConfig;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub catalog: Arc<dyn CatalogProvider>,
    pub watchlist: Arc<dyn WatchlistStore>,
    pub config: Arc<ServerConfig>,
}
