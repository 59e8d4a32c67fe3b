use async_trait::async_trait;
use showfinder_core::types::WatchlistEntry;
use showfinder_core::watchlist::{self, WatchlistError, WatchlistStore};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use super::kv;

pub const WATCHLIST_KEY: &str = "watchlist";

/// Watchlist persisted as a JSON array under a single key of the `kv` table.
///
/// Each mutation reads and rewrites the whole array inside one transaction.
/// Mutations are serialized per store (clones share the lock); two overlapping
/// deferred transactions cannot both upgrade to a write.
#[derive(Clone)]
pub struct SqliteWatchlist {
    pool: SqlitePool,
    key: String,
    writer: Arc<Mutex<()>>,
}

impl SqliteWatchlist {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_key(pool, WATCHLIST_KEY)
    }

    pub fn with_key(pool: SqlitePool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
            writer: Arc::new(Mutex::new(())),
        }
    }

    async fn modify<F>(&self, f: F) -> Result<bool, WatchlistError>
    where
        F: FnOnce(&mut Vec<WatchlistEntry>) -> bool + Send,
    {
        let _writer = self.writer.lock().await;
        let mut tx = self.pool.begin().await.map_err(storage)?;
        let raw = kv::get(&mut *tx, &self.key).await.map_err(storage)?;
        let mut entries = watchlist::decode(raw.as_deref())?;

        let changed = f(&mut entries);
        if changed {
            let encoded = watchlist::encode(&entries)?;
            kv::set(&mut *tx, &self.key, &encoded).await.map_err(storage)?;
        }
        tx.commit().await.map_err(storage)?;

        debug!(key = %self.key, len = entries.len(), changed, "watchlist written");
        Ok(changed)
    }
}

fn storage(e: sqlx::Error) -> WatchlistError {
    WatchlistError::Storage(e.to_string())
}

#[async_trait]
impl WatchlistStore for SqliteWatchlist {
    async fn list(&self) -> Result<Vec<WatchlistEntry>, WatchlistError> {
        let raw = kv::get(&self.pool, &self.key).await.map_err(storage)?;
        watchlist::decode(raw.as_deref())
    }

    async fn contains(&self, id: i64) -> Result<bool, WatchlistError> {
        Ok(self.list().await?.iter().any(|e| e.id == id))
    }

    async fn add(&self, entry: WatchlistEntry) -> Result<bool, WatchlistError> {
        self.modify(move |entries| watchlist::insert_entry(entries, entry))
            .await
    }

    async fn remove(&self, id: i64) -> Result<bool, WatchlistError> {
        self.modify(move |entries| watchlist::remove_entry(entries, id))
            .await
    }
}
