use thiserror::Error;

use super::common::ApiErrorDetails;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error (HTTP {status}): {message}")]
    ApiError {
        status: u16,
        message: String,
        #[source]
        details: Option<Box<ApiErrorDetails>>,
    },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Authentication failed, check the Render API key")]
    AuthError,

    #[error("Request timeout after {0} seconds")]
    Timeout(u64),

    #[error("Too many requests, rate limited")]
    RateLimited,

    #[error("Service unavailable, retry later")]
    ServiceUnavailable,
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}
