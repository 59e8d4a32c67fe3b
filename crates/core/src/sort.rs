use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::types::Show;

/// Client-side ordering for search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Popularity,
    Name,
    Year,
    Rating,
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::Name => "name",
            Self::Year => "year",
            Self::Rating => "rating",
        }
    }

    /// Lenient parse: unknown keys fall back to the default ordering.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Self::Name,
            "year" => Self::Year,
            "rating" => Self::Rating,
            _ => Self::Popularity,
        }
    }

    fn compare(self, a: &Show, b: &Show) -> Ordering {
        match self {
            Self::Popularity => b.popularity.total_cmp(&a.popularity),
            Self::Rating => b.vote_average.total_cmp(&a.vote_average),
            Self::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name)),
            // Undated shows go last.
            Self::Year => match (a.first_air_date(), b.first_air_date()) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable in-place sort.
pub fn sort_shows(shows: &mut [Show], key: SortKey) {
    shows.sort_by(|a, b| key.compare(a, b));
}

pub fn sorted(shows: &[Show], key: SortKey) -> Vec<Show> {
    let mut out = shows.to_vec();
    sort_shows(&mut out, key);
    out
}
