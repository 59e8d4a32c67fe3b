//! TMDB (The Movie Database) catalog client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use serde::de::DeserializeOwned;
use showfinder_core::error::CatalogError;
use showfinder_core::types::{Episode, Show, ShowCategory};
use tracing::{debug, warn};

use crate::provider::CatalogProvider;
use crate::wire::{Paged, WireSeasonDetail, WireShow};

pub const BASE_URL: &str = "https://api.themoviedb.org/3";

pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self::with_client(api_key, reqwest::Client::new())
    }

    pub fn with_client(api_key: String, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url: BASE_URL.to_string(),
            client,
        }
    }

    /// Point the client at another host speaking the same API (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn category_path(category: ShowCategory) -> &'static str {
        match category {
            ShowCategory::Trending => "/trending/tv/week",
            ShowCategory::TopRated => "/tv/top_rated",
            ShowCategory::AiringToday => "/tv/airing_today",
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let mut all_params = vec![("api_key", self.api_key.as_str())];
        all_params.extend_from_slice(params);

        let url = format!("{}{path}", self.base_url);
        debug!(path = %path, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            .map_err(|e| {
                warn!(path = %path, error = %e, "TMDB request failed");
                CatalogError::FetchFailed(format!("network: {e}"))
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            warn!(path = %path, "TMDB rate limit hit");
            return Err(CatalogError::RateLimited);
        }
        if !status.is_success() {
            warn!(path = %path, status = %status, "TMDB returned an error status");
            return Err(CatalogError::FetchFailed(format!("TMDB returned {status}")));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| CatalogError::FetchFailed(format!("read body: {e}")))?;
        let deserializer = &mut serde_json::Deserializer::from_str(&body);
        serde_path_to_error::deserialize(deserializer).map_err(|e| {
            warn!(path = %path, field = %e.path(), "TMDB response did not parse");
            CatalogError::FetchFailed(format!("parse JSON at {}: {}", e.path(), e.inner()))
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn list(&self, category: ShowCategory) -> Result<Vec<Show>, CatalogError> {
        let page: Paged<WireShow> = self.get_json(Self::category_path(category), &[]).await?;
        Ok(page.results.into_iter().map(WireShow::into_summary).collect())
    }

    async fn show(&self, id: i64) -> Result<Show, CatalogError> {
        let data: WireShow = self
            .get_json(&format!("/tv/{id}"), &[("append_to_response", "credits")])
            .await?;

        if data.id == 0 || data.name.trim().is_empty() {
            return Err(CatalogError::NotFound);
        }
        Ok(data.into_detail())
    }

    async fn season(
        &self,
        show_id: i64,
        season_number: i64,
    ) -> Result<Vec<Episode>, CatalogError> {
        let data: WireSeasonDetail = self
            .get_json(&format!("/tv/{show_id}/season/{season_number}"), &[])
            .await?;
        Ok(data.episodes.into_iter().map(Into::into).collect())
    }

    async fn search(&self, query: &str) -> Result<Vec<Show>, CatalogError> {
        let page: Paged<WireShow> = self.get_json("/search/tv", &[("query", query)]).await?;
        Ok(page.results.into_iter().map(WireShow::into_summary).collect())
    }
}
