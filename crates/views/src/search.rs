use serde::Serialize;
use showfinder_core::route::Route;
use showfinder_core::sort::{self, SortKey};
use showfinder_core::types::{Show, ShowCard};
use showfinder_metadata::CatalogProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::query::{self, DebouncedQuery, QueryState};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    Idle,
    Loading,
    Ready,
    Empty,
    Failed,
}

/// Everything the search page renders.
#[derive(Debug, Clone, Serialize)]
pub struct SearchView {
    pub query: String,
    pub url: String,
    pub sort: SortKey,
    pub headline: String,
    pub status: SearchStatus,
    pub summary: String,
    pub message: Option<String>,
    pub results: Vec<ShowCard>,
}

impl SearchView {
    /// Build the view for `text` from a query state. Sorting happens here, on
    /// every render, so changing the sort key needs no request.
    pub fn build(text: &str, sort_key: SortKey, state: &QueryState<Show>) -> Self {
        let (status, message) = match state {
            QueryState::Idle => (SearchStatus::Idle, None),
            QueryState::Pending { .. } | QueryState::Loading { .. } => {
                (SearchStatus::Loading, None)
            }
            QueryState::Ready { .. } => (SearchStatus::Ready, None),
            QueryState::Empty { .. } => (
                SearchStatus::Empty,
                Some("No shows found. Try adjusting your search query".to_string()),
            ),
            QueryState::Failed { error, .. } => (
                SearchStatus::Failed,
                Some(crate::search_failure_message(error).to_string()),
            ),
        };

        let results: Vec<ShowCard> = sort::sorted(state.items(), sort_key)
            .iter()
            .map(ShowCard::from)
            .collect();

        let headline = if text.is_empty() {
            "Browse TV Shows".to_string()
        } else {
            format!("Search Results for \"{text}\"")
        };
        let summary = if status == SearchStatus::Loading {
            "Loading...".to_string()
        } else {
            format!("{} shows found", results.len())
        };

        Self {
            query: text.to_string(),
            url: Route::search(text).to_string(),
            sort: sort_key,
            headline,
            status,
            summary,
            message,
            results,
        }
    }
}

/// Search page state: a query string mirrored in the URL, a debounced remote
/// search and a client-side sort key.
pub struct SearchController {
    query: DebouncedQuery<Show>,
    sort: SortKey,
}

impl SearchController {
    pub fn new(provider: Arc<dyn CatalogProvider>, debounce: Duration) -> Self {
        Self {
            query: DebouncedQuery::new(debounce, query::search_fetcher(provider)),
            sort: SortKey::default(),
        }
    }

    /// Mount from a URL; a `q` parameter seeds the query.
    pub fn from_route(route: &Route, provider: Arc<dyn CatalogProvider>, debounce: Duration) -> Self {
        let mut controller = Self::new(provider, debounce);
        if let Route::Search { query } = route {
            if !query.is_empty() {
                controller.set_query(query.clone());
            }
        }
        controller
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query.set_query(text);
    }

    /// Escape key or the clear button.
    pub fn clear(&mut self) {
        self.query.clear();
    }

    pub fn set_sort(&mut self, key: SortKey) {
        self.sort = key;
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    /// The URL reflecting the current query text.
    pub fn route(&self) -> Route {
        Route::search(self.query.text())
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<Show>> {
        self.query.subscribe()
    }

    pub fn view(&self) -> SearchView {
        SearchView::build(self.query.text(), self.sort, &self.query.state())
    }
}

/// One-shot search without debouncing, for request/response callers.
pub async fn search_now(
    provider: &dyn CatalogProvider,
    text: &str,
    sort_key: SortKey,
) -> SearchView {
    let text = text.trim();
    let query = text.to_string();
    let state = if query.is_empty() {
        QueryState::Idle
    } else {
        match provider.search(&query).await {
            Ok(items) if items.is_empty() => QueryState::Empty { seq: 1, query },
            Ok(items) => QueryState::Ready {
                seq: 1,
                query,
                items,
            },
            Err(error) => {
                tracing::warn!(error = %error, "search failed");
                QueryState::Failed {
                    seq: 1,
                    query,
                    error,
                }
            }
        }
    };
    SearchView::build(text, sort_key, &state)
}
