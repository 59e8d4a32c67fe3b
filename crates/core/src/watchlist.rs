//! The watchlist: a small, user-curated set of shows persisted as one JSON
//! array.
//!
//! Every operation reads the whole collection, modifies it and writes the
//! whole collection back. Concurrent writers are not merged: the last write
//! of the collection wins.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::types::WatchlistEntry;

#[derive(Debug, Error)]
pub enum WatchlistError {
    #[error("watchlist storage error: {0}")]
    Storage(String),
    #[error("stored watchlist is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// Entries in insertion order.
    async fn list(&self) -> Result<Vec<WatchlistEntry>, WatchlistError>;

    async fn contains(&self, id: i64) -> Result<bool, WatchlistError>;

    /// Append unless an entry with the same id exists. Returns whether it was added.
    async fn add(&self, entry: WatchlistEntry) -> Result<bool, WatchlistError>;

    /// Returns whether an entry was removed.
    async fn remove(&self, id: i64) -> Result<bool, WatchlistError>;
}

/// Decode the persisted form. A missing value is an empty watchlist.
pub fn decode(raw: Option<&str>) -> Result<Vec<WatchlistEntry>, WatchlistError> {
    match raw.map(str::trim).filter(|r| !r.is_empty()) {
        Some(raw) => Ok(serde_json::from_str(raw)?),
        None => Ok(Vec::new()),
    }
}

pub fn encode(entries: &[WatchlistEntry]) -> Result<String, WatchlistError> {
    Ok(serde_json::to_string(entries)?)
}

pub fn insert_entry(entries: &mut Vec<WatchlistEntry>, entry: WatchlistEntry) -> bool {
    if entries.iter().any(|e| e.id == entry.id) {
        return false;
    }
    entries.push(entry);
    true
}

pub fn remove_entry(entries: &mut Vec<WatchlistEntry>, id: i64) -> bool {
    let before = entries.len();
    entries.retain(|e| e.id != id);
    entries.len() != before
}

/// Watchlist held in process memory, stored in its encoded form so it goes
/// through the same read-modify-write path as the persistent stores.
#[derive(Default)]
pub struct MemoryWatchlist {
    raw: Mutex<Option<String>>,
}

impl MemoryWatchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already-encoded value, as if loaded from storage.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }
}

#[async_trait]
impl WatchlistStore for MemoryWatchlist {
    async fn list(&self) -> Result<Vec<WatchlistEntry>, WatchlistError> {
        decode(self.raw.lock().await.as_deref())
    }

    async fn contains(&self, id: i64) -> Result<bool, WatchlistError> {
        Ok(self.list().await?.iter().any(|e| e.id == id))
    }

    async fn add(&self, entry: WatchlistEntry) -> Result<bool, WatchlistError> {
        let mut raw = self.raw.lock().await;
        let mut entries = decode(raw.as_deref())?;
        let added = insert_entry(&mut entries, entry);
        if added {
            *raw = Some(encode(&entries)?);
        }
        Ok(added)
    }

    async fn remove(&self, id: i64) -> Result<bool, WatchlistError> {
        let mut raw = self.raw.lock().await;
        let mut entries = decode(raw.as_deref())?;
        let removed = remove_entry(&mut entries, id);
        if removed {
            *raw = Some(encode(&entries)?);
        }
        Ok(removed)
    }
}
