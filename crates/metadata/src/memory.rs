//! In-process catalog with seeded data, call recording and injectable
//! failures and latency. Backs tests and offline demos.

use parking_lot::Mutex;
use showfinder_core::error::CatalogError;
use showfinder_core::types::{Episode, Show, ShowCategory};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::provider::CatalogProvider;

/// One recorded provider call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CatalogCall {
    List(ShowCategory),
    Show(i64),
    Season(i64, i64),
    Search(String),
}

#[derive(Default)]
struct Inner {
    shows: BTreeMap<i64, Show>,
    episodes: HashMap<(i64, i64), Vec<Episode>>,
    lists: HashMap<ShowCategory, Vec<i64>>,
    failures: HashMap<CatalogCall, CatalogError>,
    search_failure: Option<CatalogError>,
    latency: HashMap<CatalogCall, Duration>,
    calls: Vec<CatalogCall>,
}

#[derive(Default)]
pub struct MemoryCatalog {
    inner: Mutex<Inner>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a full show record. Episodes inside its seasons are moved into
    /// the season store so `show()` hands out seasons without episodes.
    pub fn insert_show(&self, mut show: Show) -> &Self {
        let mut inner = self.inner.lock();
        for season in &mut show.seasons {
            if !season.episodes.is_empty() {
                let episodes = std::mem::take(&mut season.episodes);
                inner
                    .episodes
                    .insert((show.id, season.season_number), episodes);
            }
        }
        inner.shows.insert(show.id, show);
        self
    }

    pub fn insert_episodes(&self, show_id: i64, season_number: i64, episodes: Vec<Episode>) -> &Self {
        self.inner
            .lock()
            .episodes
            .insert((show_id, season_number), episodes);
        self
    }

    pub fn set_list(&self, category: ShowCategory, ids: &[i64]) -> &Self {
        self.inner.lock().lists.insert(category, ids.to_vec());
        self
    }

    /// Make one specific call fail until cleared.
    pub fn fail(&self, call: CatalogCall, error: CatalogError) -> &Self {
        self.inner.lock().failures.insert(call, error);
        self
    }

    /// Make every search fail until cleared.
    pub fn fail_searches(&self, error: CatalogError) -> &Self {
        self.inner.lock().search_failure = Some(error);
        self
    }

    pub fn clear_failures(&self) -> &Self {
        let mut inner = self.inner.lock();
        inner.failures.clear();
        inner.search_failure = None;
        self
    }

    /// Delay the response to one specific call.
    pub fn delay(&self, call: CatalogCall, latency: Duration) -> &Self {
        self.inner.lock().latency.insert(call, latency);
        self
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.inner.lock().calls.clone()
    }

    pub fn count(&self, call: &CatalogCall) -> usize {
        self.inner.lock().calls.iter().filter(|c| *c == call).count()
    }

    /// Record the call and return its injected latency and failure.
    fn begin(&self, call: CatalogCall) -> (Option<Duration>, Option<CatalogError>) {
        let mut inner = self.inner.lock();
        let latency = inner.latency.get(&call).copied();
        let failure = inner.failures.get(&call).cloned().or_else(|| match call {
            CatalogCall::Search(_) => inner.search_failure.clone(),
            _ => None,
        });
        inner.calls.push(call);
        (latency, failure)
    }

    async fn enter(&self, call: CatalogCall) -> Result<(), CatalogError> {
        let (latency, failure) = self.begin(call);
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// What list endpoints return: the summary fields only.
fn summary(show: &Show) -> Show {
    Show {
        seasons: Vec::new(),
        status: String::new(),
        number_of_episodes: 0,
        number_of_seasons: 0,
        networks: Vec::new(),
        created_by: Vec::new(),
        ..show.clone()
    }
}

#[async_trait::async_trait]
impl CatalogProvider for MemoryCatalog {
    fn name(&self) -> &str {
        "memory"
    }

    async fn list(&self, category: ShowCategory) -> Result<Vec<Show>, CatalogError> {
        self.enter(CatalogCall::List(category)).await?;
        let inner = self.inner.lock();
        Ok(inner
            .lists
            .get(&category)
            .into_iter()
            .flatten()
            .filter_map(|id| inner.shows.get(id))
            .map(summary)
            .collect())
    }

    async fn show(&self, id: i64) -> Result<Show, CatalogError> {
        self.enter(CatalogCall::Show(id)).await?;
        self.inner
            .lock()
            .shows
            .get(&id)
            .cloned()
            .ok_or(CatalogError::NotFound)
    }

    async fn season(
        &self,
        show_id: i64,
        season_number: i64,
    ) -> Result<Vec<Episode>, CatalogError> {
        self.enter(CatalogCall::Season(show_id, season_number))
            .await?;
        let inner = self.inner.lock();
        let show = inner.shows.get(&show_id).ok_or(CatalogError::NotFound)?;
        if show.season(season_number).is_none() {
            return Err(CatalogError::NotFound);
        }
        Ok(inner
            .episodes
            .get(&(show_id, season_number))
            .cloned()
            .unwrap_or_default())
    }

    async fn search(&self, query: &str) -> Result<Vec<Show>, CatalogError> {
        self.enter(CatalogCall::Search(query.to_string())).await?;
        let needle = query.trim().to_lowercase();
        let inner = self.inner.lock();
        Ok(inner
            .shows
            .values()
            .filter(|s| !needle.is_empty() && s.name.to_lowercase().contains(&needle))
            .map(summary)
            .collect())
    }
}
