//! Debounced remote query shared by the search page and the navbar typeahead.
//!
//! Each keystroke bumps a sequence number. A response is applied only if its
//! sequence number is still the latest issued and the owning view is alive,
//! so a slow response can never overwrite a newer one.

use futures::future::BoxFuture;
use futures::FutureExt;
use showfinder_core::error::CatalogError;
use showfinder_core::types::Show;
use showfinder_metadata::CatalogProvider;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::scope::ViewScope;

pub type FetchFn<T> =
    Arc<dyn Fn(String) -> BoxFuture<'static, Result<Vec<T>, CatalogError>> + Send + Sync>;
pub type MapFn<T> = Arc<dyn Fn(Vec<T>) -> Vec<T> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
    /// Blank query; nothing requested.
    Idle,
    /// Waiting for input to go quiet.
    Pending { seq: u64, query: String },
    Loading { seq: u64, query: String },
    Ready { seq: u64, query: String, items: Vec<T> },
    /// The request succeeded with zero results.
    Empty { seq: u64, query: String },
    Failed { seq: u64, query: String, error: CatalogError },
}

impl<T> QueryState<T> {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Pending { .. } | Self::Loading { .. })
    }

    pub fn items(&self) -> &[T] {
        match self {
            Self::Ready { items, .. } => items,
            _ => &[],
        }
    }

    pub fn seq(&self) -> Option<u64> {
        match self {
            Self::Idle => None,
            Self::Pending { seq, .. }
            | Self::Loading { seq, .. }
            | Self::Ready { seq, .. }
            | Self::Empty { seq, .. }
            | Self::Failed { seq, .. } => Some(*seq),
        }
    }
}

/// Fetcher that runs a free-text search against `provider`.
pub fn search_fetcher(provider: Arc<dyn CatalogProvider>) -> FetchFn<Show> {
    Arc::new(move |query: String| {
        let provider = provider.clone();
        async move { provider.search(&query).await }.boxed()
    })
}

/// Mapper that keeps only the first `limit` results.
pub fn cap<T: Send + 'static>(limit: usize) -> MapFn<T> {
    Arc::new(move |mut items: Vec<T>| {
        items.truncate(limit);
        items
    })
}

pub struct DebouncedQuery<T> {
    fetch: FetchFn<T>,
    map: MapFn<T>,
    window: Duration,
    text: String,
    latest: Arc<AtomicU64>,
    state: Arc<watch::Sender<QueryState<T>>>,
    timer: Option<CancellationToken>,
    scope: ViewScope,
}

impl<T> DebouncedQuery<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(window: Duration, fetch: FetchFn<T>) -> Self {
        let (tx, _) = watch::channel(QueryState::Idle);
        Self {
            fetch,
            map: Arc::new(|items: Vec<T>| items),
            window,
            text: String::new(),
            latest: Arc::new(AtomicU64::new(0)),
            state: Arc::new(tx),
            timer: None,
            scope: ViewScope::new(),
        }
    }

    pub fn with_mapper(mut self, map: MapFn<T>) -> Self {
        self.map = map;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state.subscribe()
    }

    pub fn state(&self) -> QueryState<T> {
        self.state.borrow().clone()
    }

    /// The raw text as typed, untrimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Record a new input value. Must be called inside a tokio runtime.
    pub fn set_query(&mut self, text: impl Into<String>) {
        let seq = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }
        self.text = text.into();

        let query = self.text.trim().to_string();
        if query.is_empty() {
            self.state.send_replace(QueryState::Idle);
            return;
        }
        self.state.send_replace(QueryState::Pending {
            seq,
            query: query.clone(),
        });

        let timer = self.scope.child_token();
        self.timer = Some(timer.clone());

        let alive = self.scope.child_token();
        let fetch = self.fetch.clone();
        let map = self.map.clone();
        let latest = self.latest.clone();
        let state = self.state.clone();
        let window = self.window;

        tokio::spawn(async move {
            tokio::select! {
                _ = timer.cancelled() => return,
                _ = tokio::time::sleep(window) => {}
            }
            let applied = state.send_if_modified(|s| {
                if latest.load(Ordering::SeqCst) != seq {
                    return false;
                }
                *s = QueryState::Loading {
                    seq,
                    query: query.clone(),
                };
                true
            });
            if !applied {
                return;
            }

            debug!(seq, query = %query, "issuing debounced query");
            // Later keystrokes do not abort this request; only the view going away does.
            let result = tokio::select! {
                _ = alive.cancelled() => return,
                r = fetch(query.clone()) => r,
            };

            let next = match result {
                Ok(items) => {
                    let items = map(items);
                    if items.is_empty() {
                        QueryState::Empty { seq, query }
                    } else {
                        QueryState::Ready { seq, query, items }
                    }
                }
                Err(error) => QueryState::Failed { seq, query, error },
            };

            let applied = state.send_if_modified(|s| {
                if alive.is_cancelled() || latest.load(Ordering::SeqCst) != seq {
                    return false;
                }
                *s = next;
                true
            });
            if !applied {
                debug!(seq, "discarding stale query response");
            }
        });
    }

    pub fn clear(&mut self) {
        self.set_query("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use showfinder_metadata::memory::{CatalogCall, MemoryCatalog};

    const WINDOW: Duration = Duration::from_millis(400);

    fn catalog() -> Arc<MemoryCatalog> {
        let catalog = MemoryCatalog::new();
        for (id, name) in [(1, "Slow Horses"), (2, "Fast Track"), (3, "Fastest Lap")] {
            catalog.insert_show(Show {
                id,
                name: name.into(),
                ..Default::default()
            });
        }
        Arc::new(catalog)
    }

    fn query(catalog: &Arc<MemoryCatalog>) -> DebouncedQuery<Show> {
        let provider: Arc<dyn CatalogProvider> = catalog.clone();
        DebouncedQuery::new(WINDOW, search_fetcher(provider))
    }

    async fn settle(rx: &mut watch::Receiver<QueryState<Show>>) -> QueryState<Show> {
        rx.wait_for(|s| !s.is_busy()).await.unwrap().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_keystrokes_issue_one_request() {
        let catalog = catalog();
        let mut q = query(&catalog);
        let mut rx = q.subscribe();

        for text in ["f", "fa", "fas"] {
            q.set_query(text);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        let state = settle(&mut rx).await;

        assert_eq!(catalog.calls(), [CatalogCall::Search("fas".into())]);
        assert_eq!(state.items().len(), 2);
        assert_eq!(state.seq(), Some(3));
    }

    #[tokio::test(start_paused = true)]
    async fn blank_query_is_idle_without_request() {
        let catalog = catalog();
        let mut q = query(&catalog);
        q.set_query("   ");
        tokio::time::sleep(WINDOW * 2).await;
        assert_eq!(q.state(), QueryState::Idle);
        assert!(catalog.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_cancels_pending_timer() {
        let catalog = catalog();
        let mut q = query(&catalog);
        q.set_query("fast");
        tokio::time::sleep(Duration::from_millis(100)).await;
        q.clear();
        tokio::time::sleep(WINDOW * 2).await;
        assert!(catalog.calls().is_empty());
        assert_eq!(q.state(), QueryState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn stale_response_does_not_overwrite_newer_one() {
        let catalog = catalog();
        catalog.delay(CatalogCall::Search("slow".into()), Duration::from_secs(1));
        let mut q = query(&catalog);
        let mut rx = q.subscribe();

        q.set_query("slow");
        // Past the window: the slow request is in flight.
        tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;
        q.set_query("fast");

        let state = settle(&mut rx).await;
        assert!(matches!(&state, QueryState::Ready { query, .. } if query == "fast"));

        // Let the slow response land; it must be ignored.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(q.state(), state);
        assert_eq!(catalog.count(&CatalogCall::Search("slow".into())), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_results_is_explicit_empty_state() {
        let catalog = catalog();
        let mut q = query(&catalog);
        let mut rx = q.subscribe();
        q.set_query("zzz");
        let state = settle(&mut rx).await;
        assert_eq!(
            state,
            QueryState::Empty {
                seq: 1,
                query: "zzz".into()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_published() {
        let catalog = catalog();
        catalog.fail_searches(CatalogError::RateLimited);
        let mut q = query(&catalog);
        let mut rx = q.subscribe();
        q.set_query("fast");
        let state = settle(&mut rx).await;
        assert!(matches!(
            state,
            QueryState::Failed {
                error: CatalogError::RateLimited,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn mapper_caps_results() {
        let catalog = catalog();
        let provider: Arc<dyn CatalogProvider> = catalog.clone();
        let mut q = DebouncedQuery::new(WINDOW, search_fetcher(provider)).with_mapper(cap(1));
        let mut rx = q.subscribe();
        q.set_query("fast");
        assert_eq!(settle(&mut rx).await.items().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_query_discards_late_response() {
        let catalog = catalog();
        catalog.delay(CatalogCall::Search("fast".into()), Duration::from_secs(1));
        let mut q = query(&catalog);
        let rx = q.subscribe();
        q.set_query("fast");
        tokio::time::sleep(WINDOW + Duration::from_millis(100)).await;
        assert!(matches!(*rx.borrow(), QueryState::Loading { .. }));

        drop(q);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(matches!(*rx.borrow(), QueryState::Loading { .. }));
    }
}
