use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::images::{self, ImageSize};
use crate::route::Route;

/// A television series.
///
/// List-style endpoints only populate the summary fields; `seasons`,
/// `networks`, `created_by`, `status` and the counts stay at their defaults.
/// Callers must treat every `Show` as possibly partial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: i64,
    pub name: String,
    pub overview: String,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: i64,
    pub popularity: f64,
    pub genre_ids: Vec<i64>,
    pub origin_country: Vec<String>,
    pub original_language: String,
    pub original_name: String,
    pub seasons: Vec<Season>,
    pub status: String,
    pub number_of_episodes: i64,
    pub number_of_seasons: i64,
    pub networks: Vec<Network>,
    pub created_by: Vec<Creator>,
}

impl Show {
    pub fn first_air_date(&self) -> Option<NaiveDate> {
        parse_date(self.first_air_date.as_deref())
    }

    pub fn year(&self) -> Option<i32> {
        self.first_air_date().map(|d| d.year())
    }

    pub fn season(&self, season_number: i64) -> Option<&Season> {
        self.seasons.iter().find(|s| s.season_number == season_number)
    }

    pub fn poster_url(&self) -> String {
        images::poster_url(self.poster_path.as_deref(), ImageSize::W500)
    }

    pub fn backdrop_url(&self) -> String {
        images::backdrop_url(self.backdrop_path.as_deref(), ImageSize::W1280)
    }
}

/// A season of a show. `episodes` is empty until the season is selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    pub name: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub season_number: i64,
    pub episode_count: i64,
    pub air_date: Option<String>,
    pub episodes: Vec<Episode>,
}

impl Season {
    pub fn year(&self) -> Option<i32> {
        parse_date(self.air_date.as_deref()).map(|d| d.year())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: i64,
    pub name: String,
    pub overview: String,
    pub episode_number: i64,
    pub season_number: i64,
    pub air_date: Option<String>,
    pub runtime: i64,
    pub still_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub id: i64,
    pub name: String,
    pub profile_path: Option<String>,
}

/// The reduced projection of a [`Show`] kept in the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: String,
}

impl From<&Show> for WatchlistEntry {
    fn from(show: &Show) -> Self {
        Self {
            id: show.id,
            name: show.name.clone(),
            poster_path: show.poster_path.clone(),
            first_air_date: show.first_air_date.clone(),
            overview: show.overview.clone(),
        }
    }
}

/// Category of the home page carousels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowCategory {
    Trending,
    TopRated,
    AiringToday,
}

impl ShowCategory {
    pub const ALL: [ShowCategory; 3] = [Self::Trending, Self::TopRated, Self::AiringToday];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::TopRated => "top_rated",
            Self::AiringToday => "airing_today",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Trending => "Trending This Week",
            Self::TopRated => "Top Rated",
            Self::AiringToday => "Airing Today",
        }
    }
}

impl std::fmt::Display for ShowCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a card in a carousel, result grid or the watchlist page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShowCard {
    pub id: i64,
    pub name: String,
    pub year: Option<i32>,
    /// Average rating with one decimal, absent for watchlist entries.
    pub rating: Option<String>,
    pub overview: String,
    pub poster_url: String,
    pub href: String,
}

impl From<&Show> for ShowCard {
    fn from(show: &Show) -> Self {
        Self {
            id: show.id,
            name: show.name.clone(),
            year: show.year(),
            rating: Some(format!("{:.1}", show.vote_average)),
            overview: show.overview.clone(),
            poster_url: show.poster_url(),
            href: Route::show(show.id, &show.name).to_string(),
        }
    }
}

impl From<&WatchlistEntry> for ShowCard {
    fn from(entry: &WatchlistEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
            year: parse_date(entry.first_air_date.as_deref()).map(|d| d.year()),
            rating: None,
            overview: entry.overview.clone(),
            poster_url: images::poster_url(entry.poster_path.as_deref(), ImageSize::W500),
            href: Route::show(entry.id, &entry.name).to_string(),
        }
    }
}

pub(crate) fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}
