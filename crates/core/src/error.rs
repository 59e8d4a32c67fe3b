use serde::Serialize;
use thiserror::Error;

/// Failure taxonomy shared by every catalog fetch path.
///
/// All three are terminal for the load that produced them; nothing retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Network, HTTP or decode failure. The payload is diagnostic detail for
    /// logs, not for display.
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("rate limited by the metadata service")]
    RateLimited,

    /// The id resolved but the catalog has no usable record for it.
    #[error("not found")]
    NotFound,
}

impl CatalogError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::FetchFailed(_) => "fetch_failed",
            Self::RateLimited => "rate_limited",
            Self::NotFound => "not_found",
        }
    }
}

/// Unified API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("too many requests: {0}")]
    TooManyRequests(String),

    #[error("upstream error: {0}")]
    BadGateway(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::TooManyRequests(_) => "rate_limited",
            Self::BadGateway(_) => "fetch_failed",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::TooManyRequests(_) => 429,
            Self::BadGateway(_) => 502,
            Self::Internal(_) => 500,
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::FetchFailed(detail) => Self::BadGateway(detail),
            CatalogError::RateLimited => {
                Self::TooManyRequests("metadata service quota exceeded".into())
            }
            CatalogError::NotFound => Self::NotFound("show not found".into()),
        }
    }
}

/// JSON error envelope: `{ "error": { "code": "…", "message": "…", "details": {} } }`
#[derive(Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(e: &ApiError) -> Self {
        Self {
            error: ErrorBody {
                code: e.code().to_string(),
                message: e.to_string(),
                details: serde_json::Value::Object(serde_json::Map::new()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_errors_map_to_distinct_statuses() {
        let cases = [
            (CatalogError::FetchFailed("boom".into()), 502, "fetch_failed"),
            (CatalogError::RateLimited, 429, "rate_limited"),
            (CatalogError::NotFound, 404, "not_found"),
        ];
        for (catalog, status, code) in cases {
            assert_eq!(catalog.code(), code);
            let api = ApiError::from(catalog);
            assert_eq!(api.status_code(), status);
            assert_eq!(api.code(), code);
        }
    }

    #[test]
    fn envelope_carries_code_and_message() {
        let envelope = ErrorEnvelope::from(&ApiError::BadRequest("missing q".into()));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["error"]["code"], "bad_request");
        assert_eq!(json["error"]["message"], "bad request: missing q");
        assert!(json["error"]["details"].as_object().unwrap().is_empty());
    }
}
