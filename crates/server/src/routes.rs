use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use showfinder_core::error::ApiError;
use showfinder_core::slug::parse_show_id;
use showfinder_core::sort::SortKey;
use showfinder_core::types::{Episode, ShowCard, WatchlistEntry};
use showfinder_views::detail::{DetailActionError, DetailPhase, DetailSnapshot, ShowDetailLoader};
use showfinder_views::home::{self, Carousel, HomeView};
use showfinder_views::scope::ViewScope;
use showfinder_views::search::{self, SearchView};
use showfinder_views::{HOME_FAILED, SEASON_FAILED};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/home", get(get_home))
        .route("/search", get(get_search))
        // Shows
        .route("/shows/{slug}", get(get_show))
        .route("/shows/{slug}/seasons/{season}", get(get_season))
        // Watchlist
        .route("/watchlist", get(list_watchlist).post(add_to_watchlist))
        .route("/watchlist/{id}", delete(remove_from_watchlist))
        .route("/watchlist/{id}/toggle", post(toggle_watchlist))
        // Live views
        .route("/live/search", get(crate::live::live_search))
        .route("/live/typeahead", get(crate::live::live_typeahead))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    sqlx::query("SELECT 1")
        .execute(&state.db)
        .await
        .map_err(|e| ApiError::Internal(format!("database check failed: {e}")))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HomeResponse {
    carousels: Vec<Carousel>,
}

async fn get_home(State(state): State<AppState>) -> Result<Json<HomeResponse>, AppError> {
    // The scope lives as long as the request; a dropped connection drops it.
    let scope = ViewScope::new();
    match home::load_home(state.catalog.as_ref(), &scope).await {
        Some(HomeView::Ready { carousels }) => Ok(Json(HomeResponse { carousels })),
        Some(HomeView::Failed { cause, .. }) => Err(AppError::catalog(cause, HOME_FAILED)),
        None => Err(ApiError::Internal("home view closed".into()).into()),
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    #[serde(default)]
    sort: String,
}

async fn get_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchView> {
    let sort = SortKey::parse_or_default(&params.sort);
    Json(search::search_now(state.catalog.as_ref(), &params.q, sort).await)
}

// ---------------------------------------------------------------------------
// Shows
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ShowParams {
    season: Option<i64>,
}

async fn get_show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<ShowParams>,
) -> Result<Json<DetailSnapshot>, AppError> {
    let mut loader = ShowDetailLoader::new(state.catalog.clone(), state.watchlist.clone());
    match params.season {
        None => loader.open(&slug).await,
        Some(season) => match loader.open_season(&slug, season).await {
            Ok(()) => {}
            Err(DetailActionError::UnknownSeason(n)) => {
                return Err(ApiError::NotFound(format!("season {n} not found")).into());
            }
            Err(e) => return Err(ApiError::BadRequest(e.to_string()).into()),
        },
    }
    detail_outcome(&loader)?;

    Ok(Json(loader.snapshot()))
}

/// Turn a terminal loader phase into an error response.
fn detail_outcome(loader: &ShowDetailLoader) -> Result<(), AppError> {
    match loader.phase() {
        DetailPhase::NotFound => Err(ApiError::NotFound("show not found".into()).into()),
        DetailPhase::Error => match loader.failure() {
            Some(failure) => Err(AppError::catalog(failure.cause.clone(), failure.message)),
            None => Err(ApiError::Internal("show load failed".into()).into()),
        },
        _ => Ok(()),
    }
}

#[derive(Serialize)]
struct SeasonResponse {
    show_id: i64,
    season_number: i64,
    episodes: Vec<Episode>,
}

async fn get_season(
    State(state): State<AppState>,
    Path((slug, season_number)): Path<(String, i64)>,
) -> Result<Json<SeasonResponse>, AppError> {
    let show_id =
        parse_show_id(&slug).map_err(|_| ApiError::NotFound("show not found".into()))?;
    let episodes = state
        .catalog
        .season(show_id, season_number)
        .await
        .map_err(|e| AppError::catalog(e, SEASON_FAILED))?;

    Ok(Json(SeasonResponse {
        show_id,
        season_number,
        episodes,
    }))
}

// ---------------------------------------------------------------------------
// Watchlist
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct WatchlistResponse {
    shows: Vec<ShowCard>,
    empty_message: Option<&'static str>,
}

async fn list_watchlist(State(state): State<AppState>) -> Result<Json<WatchlistResponse>, AppError> {
    let entries = state.watchlist.list().await?;
    Ok(Json(WatchlistResponse {
        empty_message: entries.is_empty().then_some("Your watchlist is empty."),
        shows: entries.iter().map(ShowCard::from).collect(),
    }))
}

#[derive(Serialize)]
struct AddResponse {
    added: bool,
}

async fn add_to_watchlist(
    State(state): State<AppState>,
    Json(entry): Json<WatchlistEntry>,
) -> Result<(StatusCode, Json<AddResponse>), AppError> {
    if entry.id <= 0 {
        return Err(ApiError::BadRequest("id must be a positive show id".into()).into());
    }
    if entry.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".into()).into());
    }

    let added = state.watchlist.add(entry).await?;
    let status = if added { StatusCode::CREATED } else { StatusCode::OK };
    Ok((status, Json(AddResponse { added })))
}

#[derive(Serialize)]
struct RemoveResponse {
    removed: bool,
}

async fn remove_from_watchlist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RemoveResponse>, AppError> {
    let removed = state.watchlist.remove(id).await?;
    Ok(Json(RemoveResponse { removed }))
}

#[derive(Serialize)]
struct ToggleResponse {
    id: i64,
    in_watchlist: bool,
}

async fn toggle_watchlist(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ToggleResponse>, AppError> {
    let in_watchlist = if state.watchlist.contains(id).await? {
        state.watchlist.remove(id).await?;
        false
    } else {
        let show = state.catalog.show(id).await?;
        state.watchlist.add(WatchlistEntry::from(&show)).await?;
        true
    };
    tracing::debug!(show_id = id, in_watchlist, "watchlist toggled");
    Ok(Json(ToggleResponse { id, in_watchlist }))
}
