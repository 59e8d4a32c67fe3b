use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use showfinder_core::error::CatalogError;
use showfinder_core::types::{Episode, Season, Show, ShowCategory};
use showfinder_db::repo::watchlist::SqliteWatchlist;
use showfinder_metadata::memory::{CatalogCall, MemoryCatalog};
use showfinder_server::config::ServerConfig;
use showfinder_server::routes::build_router;
use showfinder_server::state::AppState;
use std::sync::Arc;
use std::time::Duration;

fn seeded_catalog() -> Arc<MemoryCatalog> {
    let catalog = MemoryCatalog::new();
    catalog.insert_show(Show {
        id: 1399,
        name: "Game of Thrones".into(),
        first_air_date: Some("2011-04-17".into()),
        poster_path: Some("/got.jpg".into()),
        vote_average: 8.4,
        popularity: 300.0,
        seasons: vec![
            Season {
                id: 3624,
                name: "Season 1".into(),
                season_number: 1,
                episodes: vec![Episode {
                    id: 63056,
                    name: "Winter Is Coming".into(),
                    episode_number: 1,
                    season_number: 1,
                    ..Default::default()
                }],
                ..Default::default()
            },
            Season {
                id: 3625,
                name: "Season 2".into(),
                season_number: 2,
                ..Default::default()
            },
        ],
        ..Default::default()
    });
    catalog.insert_show(Show {
        id: 1396,
        name: "Breaking Bad".into(),
        first_air_date: Some("2008-01-20".into()),
        vote_average: 8.9,
        popularity: 200.0,
        ..Default::default()
    });
    catalog
        .set_list(ShowCategory::Trending, &[1399, 1396])
        .set_list(ShowCategory::TopRated, &[1396])
        .set_list(ShowCategory::AiringToday, &[]);
    Arc::new(catalog)
}

/// Create a test server with an in-memory SQLite database.
async fn test_app(catalog: Arc<MemoryCatalog>) -> TestServer {
    let pool = showfinder_db::connect(":memory:").await.unwrap();
    showfinder_db::migrate::run(&pool).await.unwrap();

    let config = ServerConfig {
        search_debounce: Duration::from_millis(20),
        typeahead_debounce: Duration::from_millis(20),
        ..Default::default()
    };
    let state = AppState {
        watchlist: Arc::new(SqliteWatchlist::new(pool.clone())),
        db: pool,
        catalog,
        config: Arc::new(config),
    };

    TestServer::new(build_router(state)).unwrap()
}

#[tokio::test]
async fn health_endpoint_returns_ok() {
    let server = test_app(seeded_catalog()).await;
    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[tokio::test]
async fn home_returns_three_carousels() {
    let server = test_app(seeded_catalog()).await;
    let resp = server.get("/api/v1/home").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    let carousels = body["carousels"].as_array().unwrap();
    assert_eq!(carousels.len(), 3);
    assert_eq!(carousels[0]["category"], "trending");
    assert_eq!(carousels[0]["title"], "Trending This Week");
    assert_eq!(carousels[0]["cards"][0]["href"], "/show/1399-game-of-thrones");
    assert_eq!(carousels[0]["cards"][0]["rating"], "8.4");
    assert_eq!(carousels[2]["cards"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn home_fails_whole_page_on_one_list_error() {
    let catalog = seeded_catalog();
    catalog.fail(
        CatalogCall::List(ShowCategory::AiringToday),
        CatalogError::FetchFailed("connection reset".into()),
    );
    let server = test_app(catalog).await;
    let resp = server.get("/api/v1/home").await;
    resp.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "fetch_failed");
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Failed to fetch shows from TMDB."));
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn search_sorts_results() {
    let server = test_app(seeded_catalog()).await;
    let resp = server.get("/api/v1/search?q=a&sort=name").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["sort"], "name");
    assert_eq!(body["summary"], "2 shows found");
    assert_eq!(body["results"][0]["name"], "Breaking Bad");
    assert_eq!(body["results"][1]["name"], "Game of Thrones");
}

#[tokio::test]
async fn search_reports_quota_exhaustion() {
    let catalog = seeded_catalog();
    catalog.fail_searches(CatalogError::RateLimited);
    let server = test_app(catalog).await;
    let body: Value = server.get("/api/v1/search?q=thrones").await.json();
    assert_eq!(body["status"], "failed");
    assert_eq!(body["message"], "API quota exceeded. Please try again later.");
}

#[tokio::test]
async fn blank_search_makes_no_request() {
    let catalog = seeded_catalog();
    let server = test_app(catalog.clone()).await;
    let body: Value = server.get("/api/v1/search?q=%20%20").await.json();
    assert_eq!(body["status"], "idle");
    assert_eq!(body["headline"], "Browse TV Shows");
    assert!(catalog.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Shows
// ---------------------------------------------------------------------------

#[tokio::test]
async fn show_detail_loads_first_season() {
    let server = test_app(seeded_catalog()).await;
    let resp = server.get("/api/v1/shows/1399-game-of-thrones").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["phase"], "season_ready");
    assert_eq!(body["selected_season"], 1);
    assert_eq!(body["season"]["episodes"][0]["name"], "Winter Is Coming");
    assert_eq!(body["in_watchlist"], false);
    assert_eq!(body["watchlist_label"], "Add to Watchlist");
    assert_eq!(body["poster_url"], "https://image.tmdb.org/t/p/w500/got.jpg");
}

#[tokio::test]
async fn show_detail_selects_requested_season() {
    let catalog = seeded_catalog();
    let server = test_app(catalog.clone()).await;
    let body: Value = server.get("/api/v1/shows/1399?season=2").await.json();
    assert_eq!(body["selected_season"], 2);
    assert_eq!(catalog.count(&CatalogCall::Season(1399, 2)), 1);
    assert_eq!(catalog.count(&CatalogCall::Season(1399, 1)), 0);

    server
        .get("/api/v1/shows/1399?season=7")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn show_detail_maps_failures_to_statuses() {
    let catalog = seeded_catalog();
    catalog.fail(CatalogCall::Show(1396), CatalogError::RateLimited);
    catalog.fail(
        CatalogCall::Season(1399, 1),
        CatalogError::FetchFailed("timeout".into()),
    );
    let server = test_app(catalog).await;

    server
        .get("/api/v1/shows/not-a-show")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/v1/shows/42-missing")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/v1/shows/1396-breaking-bad")
        .await
        .assert_status(StatusCode::TOO_MANY_REQUESTS);

    let resp = server.get("/api/v1/shows/1399").await;
    resp.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = resp.json();
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Failed to fetch season episodes from TMDB."));
}

#[tokio::test]
async fn season_endpoint_returns_episodes() {
    let server = test_app(seeded_catalog()).await;
    let body: Value = server.get("/api/v1/shows/1399/seasons/1").await.json();
    assert_eq!(body["show_id"], 1399);
    assert_eq!(body["episodes"].as_array().unwrap().len(), 1);

    let body: Value = server
        .get("/api/v1/shows/1399-game-of-thrones/seasons/1")
        .await
        .json();
    assert_eq!(body["show_id"], 1399);
    assert_eq!(body["episodes"][0]["name"], "Winter Is Coming");

    server
        .get("/api/v1/shows/not-a-show/seasons/1")
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get("/api/v1/shows/1399/seasons/9")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Watchlist
// ---------------------------------------------------------------------------

#[tokio::test]
async fn watchlist_add_list_remove() {
    let server = test_app(seeded_catalog()).await;

    let body: Value = server.get("/api/v1/watchlist").await.json();
    assert_eq!(body["shows"].as_array().unwrap().len(), 0);
    assert_eq!(body["empty_message"], "Your watchlist is empty.");

    let entry = json!({
        "id": 1396,
        "name": "Breaking Bad",
        "poster_path": "/bb.jpg",
        "first_air_date": "2008-01-20",
        "overview": "A chemistry teacher turns to crime."
    });
    let resp = server.post("/api/v1/watchlist").json(&entry).await;
    resp.assert_status(StatusCode::CREATED);
    assert_eq!(resp.json::<Value>()["added"], true);

    let resp = server.post("/api/v1/watchlist").json(&entry).await;
    resp.assert_status_ok();
    assert_eq!(resp.json::<Value>()["added"], false);

    let body: Value = server.get("/api/v1/watchlist").await.json();
    let shows = body["shows"].as_array().unwrap();
    assert_eq!(shows.len(), 1);
    assert_eq!(shows[0]["year"], 2008);
    assert_eq!(shows[0]["href"], "/show/1396-breaking-bad");
    assert!(body["empty_message"].is_null());

    let body: Value = server.delete("/api/v1/watchlist/1396").await.json();
    assert_eq!(body["removed"], true);
    let body: Value = server.delete("/api/v1/watchlist/1396").await.json();
    assert_eq!(body["removed"], false);
}

#[tokio::test]
async fn watchlist_rejects_invalid_entries() {
    let server = test_app(seeded_catalog()).await;
    let resp = server
        .post("/api/v1/watchlist")
        .json(&json!({ "id": 0, "name": "Nothing" }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = resp.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn toggle_flips_membership_seen_by_detail() {
    let server = test_app(seeded_catalog()).await;

    let body: Value = server.post("/api/v1/watchlist/1399/toggle").await.json();
    assert_eq!(body["in_watchlist"], true);

    let detail: Value = server.get("/api/v1/shows/1399").await.json();
    assert_eq!(detail["in_watchlist"], true);
    assert_eq!(detail["watchlist_label"], "Remove from Watchlist");

    let body: Value = server.post("/api/v1/watchlist/1399/toggle").await.json();
    assert_eq!(body["in_watchlist"], false);

    server
        .post("/api/v1/watchlist/777/toggle")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Live views
// ---------------------------------------------------------------------------

async fn live_app(catalog: Arc<MemoryCatalog>) -> TestServer {
    let pool = showfinder_db::connect(":memory:").await.unwrap();
    showfinder_db::migrate::run(&pool).await.unwrap();
    let config = ServerConfig {
        search_debounce: Duration::from_millis(20),
        typeahead_debounce: Duration::from_millis(20),
        typeahead_limit: 1,
        ..Default::default()
    };
    let state = AppState {
        watchlist: Arc::new(SqliteWatchlist::new(pool.clone())),
        db: pool,
        catalog,
        config: Arc::new(config),
    };
    TestServer::builder()
        .http_transport()
        .build(build_router(state))
        .unwrap()
}

#[tokio::test]
async fn live_typeahead_pushes_capped_results() {
    let server = live_app(seeded_catalog()).await;
    let mut ws = server
        .get_websocket("/api/v1/live/typeahead")
        .await
        .into_websocket()
        .await;

    let first: Value = ws.receive_json().await;
    assert_eq!(first["type"], "typeahead");
    assert_eq!(first["data"]["open"], false);

    ws.send_json(&json!({ "query": "a" })).await;
    let mut ready = None;
    for _ in 0..10 {
        let event: Value = ws.receive_json().await;
        if event["data"]["open"] == true {
            ready = Some(event);
            break;
        }
    }
    let ready = ready.expect("typeahead never opened");
    assert_eq!(ready["data"]["results"].as_array().unwrap().len(), 1);

    ws.send_json(&json!({ "action": "dismiss" })).await;
    let dismissed: Value = ws.receive_json().await;
    assert_eq!(dismissed["data"]["open"], false);
}

#[tokio::test]
async fn live_search_reports_bad_messages() {
    let server = live_app(seeded_catalog()).await;
    let mut ws = server
        .get_websocket("/api/v1/live/search?q=thrones")
        .await
        .into_websocket()
        .await;

    let first: Value = ws.receive_json().await;
    assert_eq!(first["type"], "search");
    assert_eq!(first["data"]["query"], "thrones");

    ws.send_text("not json").await;
    let mut saw_error = false;
    for _ in 0..10 {
        let event: Value = ws.receive_json().await;
        if event["type"] == "error" {
            saw_error = true;
            break;
        }
    }
    assert!(saw_error);
}

#[tokio::test]
async fn live_search_pushes_debounced_results() {
    let server = live_app(seeded_catalog()).await;
    let mut ws = server
        .get_websocket("/api/v1/live/search")
        .await
        .into_websocket()
        .await;

    let first: Value = ws.receive_json().await;
    assert_eq!(first["data"]["status"], "idle");

    ws.send_json(&json!({ "query": "a", "sort": "name" })).await;
    let mut ready = None;
    for _ in 0..10 {
        let event: Value = ws.receive_json().await;
        if event["data"]["status"] == "ready" {
            ready = Some(event);
            break;
        }
    }
    let ready = ready.expect("search never became ready");
    assert_eq!(ready["type"], "search");
    assert_eq!(ready["data"]["results"][0]["name"], "Breaking Bad");
    assert_eq!(ready["data"]["results"][1]["name"], "Game of Thrones");

    ws.send_json(&json!({ "query": "zzzz" })).await;
    let mut empty = None;
    for _ in 0..10 {
        let event: Value = ws.receive_json().await;
        if event["data"]["status"] == "empty" {
            empty = Some(event);
            break;
        }
    }
    let empty = empty.expect("search never reported no results");
    assert_eq!(empty["data"]["query"], "zzzz");
    assert_eq!(
        empty["data"]["message"],
        "No shows found. Try adjusting your search query"
    );
}
