use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use showfinder_core::error::{ApiError, CatalogError, ErrorEnvelope};
use showfinder_core::watchlist::WatchlistError;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
#[derive(Debug)]
pub struct AppError(pub ApiError);

impl AppError {
    /// A catalog failure reported with a page-specific message. The status
    /// still follows the failure kind.
    pub fn catalog(error: CatalogError, message: &str) -> Self {
        tracing::warn!(error = %error, "{message}");
        let message = message.to_string();
        Self(match error {
            CatalogError::FetchFailed(_) => ApiError::BadGateway(message),
            CatalogError::RateLimited => ApiError::TooManyRequests(message),
            CatalogError::NotFound => ApiError::NotFound(message),
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        Self(ApiError::from(e))
    }
}

impl From<WatchlistError> for AppError {
    fn from(e: WatchlistError) -> Self {
        tracing::error!(error = %e, "watchlist storage failed");
        Self(ApiError::Internal(e.to_string()))
    }
}
