use serde::Serialize;
use showfinder_core::error::CatalogError;
use showfinder_core::types::{Show, ShowCard, ShowCategory};
use showfinder_metadata::CatalogProvider;
use tracing::warn;

use crate::scope::ViewScope;

#[derive(Debug, Clone, Serialize)]
pub struct Carousel {
    pub category: ShowCategory,
    pub title: &'static str,
    pub cards: Vec<ShowCard>,
}

impl Carousel {
    pub fn new(category: ShowCategory, shows: &[Show]) -> Self {
        Self {
            category,
            title: category.title(),
            cards: shows.iter().map(ShowCard::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HomeView {
    Ready {
        carousels: Vec<Carousel>,
    },
    Failed {
        message: String,
        #[serde(skip)]
        cause: CatalogError,
    },
}

/// Fetch all three category lists concurrently. Any single failure fails the
/// whole page.
pub async fn fetch_home(
    provider: &dyn CatalogProvider,
) -> Result<[(ShowCategory, Vec<Show>); 3], CatalogError> {
    let (trending, top_rated, airing_today) = tokio::try_join!(
        provider.list(ShowCategory::Trending),
        provider.list(ShowCategory::TopRated),
        provider.list(ShowCategory::AiringToday),
    )?;
    Ok([
        (ShowCategory::Trending, trending),
        (ShowCategory::TopRated, top_rated),
        (ShowCategory::AiringToday, airing_today),
    ])
}

/// Load the home page within `scope`. `None` if the view went away first.
pub async fn load_home(provider: &dyn CatalogProvider, scope: &ViewScope) -> Option<HomeView> {
    let view = match scope.guard(fetch_home(provider)).await? {
        Ok(lists) => HomeView::Ready {
            carousels: lists
                .iter()
                .map(|(category, shows)| Carousel::new(*category, shows))
                .collect(),
        },
        Err(e) => {
            warn!(provider = provider.name(), error = %e, "home lists failed");
            HomeView::Failed {
                message: crate::HOME_FAILED.to_string(),
                cause: e,
            }
        }
    };
    Some(view)
}
