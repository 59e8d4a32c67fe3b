//! Server configuration, read from `SHOWFINDER_*` environment variables.

use anyhow::{bail, Context};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db_path: String,
    pub bind_addr: String,
    pub tmdb_api_key: String,
    pub tmdb_base_url: String,
    pub search_debounce: Duration,
    pub typeahead_debounce: Duration,
    pub typeahead_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: "showfinder.db".to_string(),
            bind_addr: "0.0.0.0:8097".to_string(),
            tmdb_api_key: String::new(),
            tmdb_base_url: showfinder_metadata::tmdb::BASE_URL.to_string(),
            search_debounce: showfinder_views::search::DEFAULT_DEBOUNCE,
            typeahead_debounce: showfinder_views::typeahead::DEFAULT_DEBOUNCE,
            typeahead_limit: showfinder_views::typeahead::DEFAULT_LIMIT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        match lookup("TMDB_API_KEY") {
            Some(key) if !key.trim().is_empty() => config.tmdb_api_key = key.trim().to_string(),
            _ => bail!("TMDB_API_KEY must be set"),
        }
        if let Some(v) = lookup("SHOWFINDER_DB") {
            config.db_path = v;
        }
        if let Some(v) = lookup("SHOWFINDER_BIND") {
            config.bind_addr = v;
        }
        if let Some(v) = lookup("TMDB_BASE_URL") {
            config.tmdb_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("SHOWFINDER_SEARCH_DEBOUNCE_MS") {
            config.search_debounce = millis("SHOWFINDER_SEARCH_DEBOUNCE_MS", &v)?;
        }
        if let Some(v) = lookup("SHOWFINDER_TYPEAHEAD_DEBOUNCE_MS") {
            config.typeahead_debounce = millis("SHOWFINDER_TYPEAHEAD_DEBOUNCE_MS", &v)?;
        }
        if let Some(v) = lookup("SHOWFINDER_TYPEAHEAD_LIMIT") {
            config.typeahead_limit = v
                .parse()
                .with_context(|| format!("SHOWFINDER_TYPEAHEAD_LIMIT is not a count: {v}"))?;
            if config.typeahead_limit == 0 {
                bail!("SHOWFINDER_TYPEAHEAD_LIMIT must be at least 1");
            }
        }
        Ok(config)
    }
}

fn millis(key: &str, raw: &str) -> anyhow::Result<Duration> {
    let ms: u64 = raw
        .parse()
        .with_context(|| format!("{key} is not a number of milliseconds: {raw}"))?;
    Ok(Duration::from_millis(ms))
}
