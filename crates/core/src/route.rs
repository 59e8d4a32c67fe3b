//! In-app routes and their URL forms.

use crate::slug::{self, SlugError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/search?q=<query>`; an empty query renders as plain `/search`.
    Search { query: String },
    /// `/show/<id>-<slug>`
    Show { slug: String },
    /// `/watchlist`
    Watchlist,
}

impl Route {
    pub fn show(id: i64, name: &str) -> Self {
        Self::Show {
            slug: slug::show_slug(id, name),
        }
    }

    pub fn search(query: impl Into<String>) -> Self {
        Self::Search {
            query: query.into(),
        }
    }

    /// Parse a path with optional query string. Unknown paths yield `None`.
    pub fn parse(url: &str) -> Option<Self> {
        let (path, query) = match url.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (url, None),
        };
        let path = path.trim_end_matches('/');

        match path {
            "" => Some(Self::Home),
            "/watchlist" => Some(Self::Watchlist),
            "/search" => Some(Self::Search {
                query: query.and_then(|q| query_param(q, "q")).unwrap_or_default(),
            }),
            _ => {
                let slug = path.strip_prefix("/show/")?;
                if slug.is_empty() || slug.contains('/') {
                    return None;
                }
                Some(Self::Show {
                    slug: slug.to_string(),
                })
            }
        }
    }

    /// The show id embedded in a detail route.
    pub fn show_id(&self) -> Option<Result<i64, SlugError>> {
        match self {
            Self::Show { slug } => Some(slug::parse_show_id(slug)),
            _ => None,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => f.write_str("/"),
            Self::Search { query } if query.is_empty() => f.write_str("/search"),
            Self::Search { query } => write!(f, "/search?q={}", urlencoding::encode(query)),
            Self::Show { slug } => write!(f, "/show/{slug}"),
            Self::Watchlist => f.write_str("/watchlist"),
        }
    }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != name {
            return None;
        }
        let value = value.replace('+', " ");
        Some(
            urlencoding::decode(&value)
                .map(|v| v.into_owned())
                .unwrap_or(value),
        )
    })
}
