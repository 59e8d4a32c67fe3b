use showfinder_core::error::CatalogError;
use showfinder_core::types::{Episode, Show, ShowCategory};

/// A remote TV catalog.
///
/// `list` and `search` return partial shows (no seasons, networks, creators,
/// status or counts); only `show` returns a full record.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    fn name(&self) -> &str;

    /// One of the home page category lists.
    async fn list(&self, category: ShowCategory) -> Result<Vec<Show>, CatalogError>;

    /// Full record for one show. Its seasons carry empty episode lists.
    async fn show(&self, id: i64) -> Result<Show, CatalogError>;

    /// Episodes of one season of a show.
    async fn season(&self, show_id: i64, season_number: i64)
    -> Result<Vec<Episode>, CatalogError>;

    /// Free-text search over show names.
    async fn search(&self, query: &str) -> Result<Vec<Show>, CatalogError>;
}
