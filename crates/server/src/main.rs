use anyhow::Context;
use showfinder_db::repo::watchlist::SqliteWatchlist;
use showfinder_metadata::{CatalogProvider, TmdbClient};
use showfinder_server::config::ServerConfig;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;

    info!(db_path = %config.db_path, "connecting to database");
    let pool = showfinder_db::connect(&config.db_path)
        .await
        .context("failed to connect to database")?;

    showfinder_db::migrate::run(&pool)
        .await
        .context("failed to run migrations")?;
    info!("migrations complete");

    let catalog = TmdbClient::new(config.tmdb_api_key.clone()).with_base_url(&config.tmdb_base_url);
    info!(provider = catalog.name(), base_url = %config.tmdb_base_url, "catalog client ready");

    let bind_addr = config.bind_addr.clone();
    let app_state = showfinder_server::state::AppState {
        watchlist: Arc::new(SqliteWatchlist::new(pool.clone())),
        db: pool,
        catalog: Arc::new(catalog),
        config: Arc::new(config),
    };

    let app = showfinder_server::routes::build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %bind_addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
