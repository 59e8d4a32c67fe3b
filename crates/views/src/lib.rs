//! View controllers: the state behind each page of the app, independent of
//! how it is rendered.

pub mod detail;
pub mod home;
pub mod query;
pub mod scope;
pub mod search;
pub mod typeahead;

use showfinder_core::error::CatalogError;

pub const HOME_FAILED: &str = "Failed to fetch shows from TMDB.";
pub const SEARCH_FAILED: &str = "Failed to fetch search results from TMDB.";
pub const QUOTA_EXCEEDED: &str = "API quota exceeded. Please try again later.";
pub const SHOW_FAILED: &str = "Failed to fetch show details from TMDB.";
pub const SEASON_FAILED: &str = "Failed to fetch season episodes from TMDB.";

/// User-facing message for a failed search. Only search distinguishes quota errors.
pub fn search_failure_message(error: &CatalogError) -> &'static str {
    match error {
        CatalogError::RateLimited => QUOTA_EXCEEDED,
        _ => SEARCH_FAILED,
    }
}
