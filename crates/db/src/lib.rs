//! SQLite persistence: pool setup, schema migrations and the key-value repo
//! the watchlist lives in.

pub mod migrate;
pub mod repo;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// How long a writer waits for another connection's transaction to finish.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Open a pool on `db_path`, creating the file if needed. `:memory:` gives a
/// private in-memory database shared by the pool's connections.
pub async fn connect(db_path: &str) -> Result<SqlitePool, sqlx::Error> {
    let opts = if db_path == ":memory:" {
        SqliteConnectOptions::from_str(db_path)?
    } else {
        let parent = Path::new(db_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty());
        if let Some(parent) = parent {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "could not create database directory");
            }
        }
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
    };

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts.busy_timeout(BUSY_TIMEOUT))
        .await
}
