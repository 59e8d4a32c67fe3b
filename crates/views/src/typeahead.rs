use serde::Serialize;
use showfinder_core::route::Route;
use showfinder_core::types::{Show, ShowCard};
use showfinder_metadata::CatalogProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::query::{self, DebouncedQuery, QueryState};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);
pub const DEFAULT_LIMIT: usize = 6;

#[derive(Debug, Clone, Serialize)]
pub struct TypeaheadView {
    pub query: String,
    pub open: bool,
    pub loading: bool,
    pub results: Vec<ShowCard>,
}

/// Navbar live search: a capped dropdown of matches that links straight to
/// detail pages.
pub struct Typeahead {
    query: DebouncedQuery<Show>,
    open: bool,
}

impl Typeahead {
    pub fn new(provider: Arc<dyn CatalogProvider>, debounce: Duration, limit: usize) -> Self {
        Self {
            query: DebouncedQuery::new(debounce, query::search_fetcher(provider))
                .with_mapper(query::cap(limit)),
            open: false,
        }
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        self.query.set_query(text);
        self.open = !self.query.text().trim().is_empty();
    }

    /// Click outside the dropdown.
    pub fn dismiss(&mut self) {
        self.open = false;
    }

    /// Input regained focus; reopen if there is something to show.
    pub fn focus(&mut self) {
        self.open = !self.results().is_empty();
    }

    pub fn results(&self) -> Vec<Show> {
        self.query.state().items().to_vec()
    }

    /// Whether the dropdown is visible. Failed lookups simply show nothing.
    pub fn is_open(&self) -> bool {
        self.open && !self.results().is_empty()
    }

    /// Pick a result: reset and navigate to its detail page.
    pub fn select(&mut self, show: &Show) -> Route {
        self.query.clear();
        self.open = false;
        Route::show(show.id, &show.name)
    }

    /// Enter key: go to the full search page for the typed text.
    pub fn submit(&mut self) -> Option<Route> {
        let text = self.query.text().trim().to_string();
        if text.is_empty() {
            return None;
        }
        self.query.clear();
        self.open = false;
        Some(Route::search(text))
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<Show>> {
        self.query.subscribe()
    }

    pub fn view(&self) -> TypeaheadView {
        let state = self.query.state();
        let open = self.is_open();
        TypeaheadView {
            query: self.query.text().to_string(),
            open,
            loading: state.is_busy(),
            results: if open {
                state.items().iter().map(ShowCard::from).collect()
            } else {
                Vec::new()
            },
        }
    }
}
