//! Response shapes of the TMDB v3 API and their mapping into the local model.
//!
//! TMDB omits or nulls fields freely, so every field defaults.

use serde::{Deserialize, Deserializer};
use showfinder_core::types::{Creator, Episode, Network, Season, Show};

fn nullable<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Empty path fragments mean "no image".
fn path(p: Option<String>) -> Option<String> {
    p.filter(|s| !s.trim().is_empty())
}

fn date(d: Option<String>) -> Option<String> {
    d.filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct Paged<T> {
    #[serde(default = "Vec::new", deserialize_with = "nullable")]
    pub results: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireShow {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub overview: String,
    pub first_air_date: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub vote_average: f64,
    #[serde(deserialize_with = "nullable")]
    pub vote_count: i64,
    #[serde(deserialize_with = "nullable")]
    pub popularity: f64,
    #[serde(deserialize_with = "nullable")]
    pub genre_ids: Vec<i64>,
    #[serde(deserialize_with = "nullable")]
    pub genres: Vec<WireGenre>,
    #[serde(deserialize_with = "nullable")]
    pub origin_country: Vec<String>,
    #[serde(deserialize_with = "nullable")]
    pub original_language: String,
    #[serde(deserialize_with = "nullable")]
    pub original_name: String,
    #[serde(deserialize_with = "nullable")]
    pub seasons: Vec<WireSeason>,
    #[serde(deserialize_with = "nullable")]
    pub status: String,
    #[serde(deserialize_with = "nullable")]
    pub number_of_episodes: i64,
    #[serde(deserialize_with = "nullable")]
    pub number_of_seasons: i64,
    #[serde(deserialize_with = "nullable")]
    pub networks: Vec<WireNetwork>,
    #[serde(deserialize_with = "nullable")]
    pub created_by: Vec<WireCreator>,
}

impl WireShow {
    /// Mapping for list-style endpoints: detail-only fields stay empty.
    pub fn into_summary(self) -> Show {
        Show {
            id: self.id,
            name: self.name,
            overview: self.overview,
            first_air_date: date(self.first_air_date),
            poster_path: path(self.poster_path),
            backdrop_path: path(self.backdrop_path),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            genre_ids: self.genre_ids,
            origin_country: self.origin_country,
            original_language: self.original_language,
            original_name: self.original_name,
            seasons: Vec::new(),
            status: String::new(),
            number_of_episodes: 0,
            number_of_seasons: 0,
            networks: Vec::new(),
            created_by: Vec::new(),
        }
    }

    /// Mapping for the detail endpoint. Genre ids come from `genres[].id`
    /// and every season starts without episodes.
    pub fn into_detail(self) -> Show {
        Show {
            id: self.id,
            name: self.name,
            overview: self.overview,
            first_air_date: date(self.first_air_date),
            poster_path: path(self.poster_path),
            backdrop_path: path(self.backdrop_path),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            genre_ids: self.genres.into_iter().map(|g| g.id).collect(),
            origin_country: self.origin_country,
            original_language: self.original_language,
            original_name: self.original_name,
            seasons: self.seasons.into_iter().map(Into::into).collect(),
            status: self.status,
            number_of_episodes: self.number_of_episodes,
            number_of_seasons: self.number_of_seasons,
            networks: self.networks.into_iter().map(Into::into).collect(),
            created_by: self.created_by.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireGenre {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireSeason {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub overview: String,
    pub poster_path: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub season_number: i64,
    #[serde(deserialize_with = "nullable")]
    pub episode_count: i64,
    pub air_date: Option<String>,
}

impl From<WireSeason> for Season {
    fn from(s: WireSeason) -> Self {
        Season {
            id: s.id,
            name: s.name,
            overview: s.overview,
            poster_path: path(s.poster_path),
            season_number: s.season_number,
            episode_count: s.episode_count,
            air_date: date(s.air_date),
            episodes: Vec::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireSeasonDetail {
    #[serde(deserialize_with = "nullable")]
    pub episodes: Vec<WireEpisode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireEpisode {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub overview: String,
    #[serde(deserialize_with = "nullable")]
    pub episode_number: i64,
    #[serde(deserialize_with = "nullable")]
    pub season_number: i64,
    pub air_date: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub runtime: i64,
    pub still_path: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub vote_average: f64,
    #[serde(deserialize_with = "nullable")]
    pub vote_count: i64,
}

impl From<WireEpisode> for Episode {
    fn from(e: WireEpisode) -> Self {
        Episode {
            id: e.id,
            name: e.name,
            overview: e.overview,
            episode_number: e.episode_number,
            season_number: e.season_number,
            air_date: date(e.air_date),
            runtime: e.runtime,
            still_path: path(e.still_path),
            vote_average: e.vote_average,
            vote_count: e.vote_count,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireNetwork {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub logo_path: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub origin_country: String,
}

impl From<WireNetwork> for Network {
    fn from(n: WireNetwork) -> Self {
        Network {
            id: n.id,
            name: n.name,
            logo_path: path(n.logo_path),
            origin_country: n.origin_country,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireCreator {
    #[serde(deserialize_with = "nullable")]
    pub id: i64,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub profile_path: Option<String>,
}

impl From<WireCreator> for Creator {
    fn from(c: WireCreator) -> Self {
        Creator {
            id: c.id,
            name: c.name,
            profile_path: path(c.profile_path),
        }
    }
}
