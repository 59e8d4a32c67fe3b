//! Show detail page: load a show from its slug, pick a season, fetch its
//! episodes, toggle watchlist membership.

use serde::Serialize;
use showfinder_core::error::CatalogError;
use showfinder_core::images::{self, ImageSize};
use showfinder_core::slug::parse_show_id;
use showfinder_core::types::{Season, Show, WatchlistEntry};
use showfinder_core::watchlist::{WatchlistError, WatchlistStore};
use showfinder_metadata::CatalogProvider;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::scope::{ScopeHandle, ViewScope};
use crate::{SEASON_FAILED, SHOW_FAILED};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailPhase {
    Idle,
    LoadingShow,
    ShowLoaded,
    LoadingEpisodes,
    SeasonReady,
    NotFound,
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum DetailActionError {
    #[error("no show is loaded")]
    NotLoaded,
    #[error("the load failed; open the show again to retry")]
    Failed,
    #[error("the view is closed")]
    Closed,
    #[error("show has no season {0}")]
    UnknownSeason(i64),
    #[error(transparent)]
    Watchlist(#[from] WatchlistError),
}

/// A failed fetch: the user-facing message and the catalog error behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailFailure {
    pub message: &'static str,
    pub cause: CatalogError,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailSnapshot {
    pub phase: DetailPhase,
    pub show_id: Option<i64>,
    pub show: Option<Show>,
    pub selected_season: Option<i64>,
    pub season: Option<Season>,
    pub in_watchlist: bool,
    pub watchlist_label: &'static str,
    pub error: Option<&'static str>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub season_poster_url: Option<String>,
}

pub struct ShowDetailLoader {
    provider: Arc<dyn CatalogProvider>,
    watchlist: Arc<dyn WatchlistStore>,
    scope: ViewScope,
    phase: DetailPhase,
    show_id: Option<i64>,
    show: Option<Show>,
    selected: Option<i64>,
    in_watchlist: bool,
    failure: Option<DetailFailure>,
}

impl ShowDetailLoader {
    pub fn new(provider: Arc<dyn CatalogProvider>, watchlist: Arc<dyn WatchlistStore>) -> Self {
        Self {
            provider,
            watchlist,
            scope: ViewScope::new(),
            phase: DetailPhase::Idle,
            show_id: None,
            show: None,
            selected: None,
            in_watchlist: false,
            failure: None,
        }
    }

    /// Handle that closes this view from another task.
    pub fn handle(&self) -> ScopeHandle {
        self.scope.handle()
    }

    pub fn close(&self) {
        self.scope.close();
    }

    pub fn phase(&self) -> DetailPhase {
        self.phase
    }

    pub fn show(&self) -> Option<&Show> {
        self.show.as_ref()
    }

    pub fn selected_season(&self) -> Option<&Season> {
        let n = self.selected?;
        self.show.as_ref()?.season(n)
    }

    pub fn in_watchlist(&self) -> bool {
        self.in_watchlist
    }

    pub fn failure(&self) -> Option<&DetailFailure> {
        self.failure.as_ref()
    }

    /// Load the show named by `slug` and auto-select its first season.
    ///
    /// Only the leading numeric token of the slug is used; the name part is
    /// never checked. A slug without a usable id is `NotFound` without a fetch.
    pub async fn open(&mut self, slug: &str) {
        if !self.load_show(slug).await {
            return;
        }
        let first = self
            .show
            .as_ref()
            .and_then(|show| show.seasons.first())
            .map(|s| s.season_number);
        if let (Some(id), Some(n)) = (self.show_id, first) {
            self.fetch_season(id, n).await;
        }
    }

    /// Load the show named by `slug` and go straight to `season_number`,
    /// skipping the first-season fetch `open` would make.
    ///
    /// A show that fails to load is reported through [`phase`](Self::phase)
    /// like `open`; only the season selection itself returns an error.
    pub async fn open_season(
        &mut self,
        slug: &str,
        season_number: i64,
    ) -> Result<(), DetailActionError> {
        if !self.load_show(slug).await {
            return Ok(());
        }
        self.select_season(season_number).await
    }

    /// Reset and fetch the show. `true` when it ended in `ShowLoaded`.
    async fn load_show(&mut self, slug: &str) -> bool {
        if self.scope.is_closed() {
            return false;
        }
        self.show_id = None;
        self.show = None;
        self.selected = None;
        self.in_watchlist = false;
        self.failure = None;

        let id = match parse_show_id(slug) {
            Ok(id) => id,
            Err(e) => {
                debug!(slug, error = %e, "unusable show slug");
                self.phase = DetailPhase::NotFound;
                return false;
            }
        };
        self.show_id = Some(id);
        self.phase = DetailPhase::LoadingShow;

        let Some(result) = self.scope.guard(self.provider.show(id)).await else {
            return false;
        };
        match result {
            Ok(show) => {
                self.in_watchlist = self.membership(id).await;
                self.show = Some(show);
                self.phase = DetailPhase::ShowLoaded;
                true
            }
            Err(CatalogError::NotFound) => {
                debug!(show_id = id, "show not found");
                self.phase = DetailPhase::NotFound;
                false
            }
            Err(e) => {
                self.fail(SHOW_FAILED, e);
                false
            }
        }
    }

    /// Select a season and fetch its episodes. Always fetches, even when the
    /// season is already selected.
    pub async fn select_season(&mut self, season_number: i64) -> Result<(), DetailActionError> {
        if self.scope.is_closed() {
            return Err(DetailActionError::Closed);
        }
        match self.phase {
            DetailPhase::ShowLoaded | DetailPhase::LoadingEpisodes | DetailPhase::SeasonReady => {}
            DetailPhase::Error => return Err(DetailActionError::Failed),
            _ => return Err(DetailActionError::NotLoaded),
        }
        let show = self.show.as_ref().ok_or(DetailActionError::NotLoaded)?;
        if show.season(season_number).is_none() {
            return Err(DetailActionError::UnknownSeason(season_number));
        }
        let id = show.id;
        self.fetch_season(id, season_number).await;
        Ok(())
    }

    /// Add the loaded show to the watchlist or remove it. Returns the new membership.
    pub async fn toggle_watchlist(&mut self) -> Result<bool, DetailActionError> {
        let show = self.show.as_ref().ok_or(DetailActionError::NotLoaded)?;
        self.in_watchlist = if self.in_watchlist {
            self.watchlist.remove(show.id).await?;
            false
        } else {
            self.watchlist.add(WatchlistEntry::from(show)).await?;
            true
        };
        Ok(self.in_watchlist)
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        let season = self.selected_season().cloned();
        DetailSnapshot {
            phase: self.phase,
            show_id: self.show_id,
            show: self.show.clone(),
            selected_season: self.selected,
            season_poster_url: season.as_ref().map(|s| {
                let fallback = self.show.as_ref().and_then(|show| show.poster_path.as_deref());
                images::poster_url(s.poster_path.as_deref().or(fallback), ImageSize::W300)
            }),
            season,
            in_watchlist: self.in_watchlist,
            watchlist_label: if self.in_watchlist {
                "Remove from Watchlist"
            } else {
                "Add to Watchlist"
            },
            error: self.failure.as_ref().map(|f| f.message),
            poster_url: self.show.as_ref().map(Show::poster_url),
            backdrop_url: self.show.as_ref().map(Show::backdrop_url),
        }
    }

    async fn fetch_season(&mut self, show_id: i64, season_number: i64) {
        if let Some(show) = self.show.as_mut() {
            for season in &mut show.seasons {
                season.episodes.clear();
            }
        }
        self.selected = Some(season_number);
        self.phase = DetailPhase::LoadingEpisodes;

        let Some(result) = self
            .scope
            .guard(self.provider.season(show_id, season_number))
            .await
        else {
            return;
        };
        match result {
            Ok(episodes) => {
                if let Some(season) = self
                    .show
                    .as_mut()
                    .and_then(|show| show.seasons.iter_mut().find(|s| s.season_number == season_number))
                {
                    season.episodes = episodes;
                }
                self.phase = DetailPhase::SeasonReady;
            }
            Err(e) => self.fail(SEASON_FAILED, e),
        }
    }

    async fn membership(&self, id: i64) -> bool {
        match self.watchlist.contains(id).await {
            Ok(found) => found,
            Err(e) => {
                warn!(show_id = id, error = %e, "watchlist unreadable, treating show as absent");
                false
            }
        }
    }

    fn fail(&mut self, message: &'static str, cause: CatalogError) {
        warn!(error = %cause, "{message}");
        self.phase = DetailPhase::Error;
        self.failure = Some(DetailFailure { message, cause });
    }
}
