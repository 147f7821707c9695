use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::common::{ApiErrorDetails, ApiErrorResponse, ApiQueryParams, CursorItem, PAGE_LIMIT};
use super::error::ApiError;

pub const DEFAULT_API_URL: &str = "https://api.render.com/v1";

/// Which failures a request may be resent after
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RetryPolicy {
    /// Server errors, timeouts and dropped connections as well as 429
    Idempotent,
    /// 429 only. A create that timed out or hit a 5xx may still have landed.
    RateLimitedOnly,
}

/// Render REST API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: String,
    retry_config: RetryConfig,
}

#[derive(Clone, Debug)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10000,
            timeout_seconds: 30,
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2_u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis(
            self.initial_backoff_ms
                .saturating_mul(factor)
                .min(self.max_backoff_ms),
        )
    }
}

fn build_http_client(retry_config: &RetryConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .use_rustls_tls()
        .timeout(Duration::from_secs(retry_config.timeout_seconds))
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(90))
        .pool_max_idle_per_host(10)
        .tcp_keepalive(Duration::from_secs(30))
        .build()
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, ApiError> {
        Self::with_config(base_url, api_key, RetryConfig::default())
    }

    /// Create a new API client with custom retry configuration
    pub fn with_config(
        base_url: &str,
        api_key: &str,
        retry_config: RetryConfig,
    ) -> Result<Self, ApiError> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!(
                "{}: scheme must be http or https",
                base_url
            )));
        }

        let http_client = build_http_client(&retry_config)?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: base_url.trim_end_matches('/').to_string(),
                auth_header: format!("Bearer {}", api_key),
                retry_config,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Owner (user and team) operations
    pub fn owners(&self) -> crate::api::owners::OwnersApi<'_> {
        crate::api::owners::OwnersApi::new(self)
    }

    /// Registry credential operations
    pub fn registry_credentials(
        &self,
    ) -> crate::api::registry_credentials::RegistryCredentialsApi<'_> {
        crate::api::registry_credentials::RegistryCredentialsApi::new(self)
    }

    /// Service operations
    pub fn services(&self) -> crate::api::services::ServicesApi<'_> {
        crate::api::services::ServicesApi::new(self)
    }

    /// Execute a GET request with retry logic
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("GET request to: {}", url);

        let response = self
            .execute_with_retry(
                || self.authorized(self.inner.http_client.get(&url)),
                path,
                RetryPolicy::Idempotent,
            )
            .await?;
        self.parse_success_response(response).await
    }

    /// Execute a GET request with query parameters
    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<T, ApiError> {
        let full_path = format!("{}{}", path, params.to_query_string());
        self.get(&full_path).await
    }

    /// Follows `cursor` until a short page comes back
    pub async fn get_all_pages<C>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<Vec<C::Item>, ApiError>
    where
        C: CursorItem + DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page_params = params
                .clone()
                .add("limit", PAGE_LIMIT)
                .add_optional("cursor", cursor.take());
            let page: Vec<C> = self.get_with_params(path, &page_params).await?;
            let page_len = page.len();

            for entry in page {
                let (item, next) = entry.into_parts();
                items.push(item);
                cursor = Some(next);
            }

            if page_len < PAGE_LIMIT || cursor.as_deref().map_or(true, str::is_empty) {
                break;
            }
            tracing::debug!("Fetching next page of {} after {} items", path, items.len());
        }

        Ok(items)
    }

    /// Execute a POST request. Only rate limiting is retried.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("POST request to: {}", url);

        let response = self
            .execute_with_retry(
                || self.authorized(self.inner.http_client.post(&url)).json(body),
                path,
                RetryPolicy::RateLimitedOnly,
            )
            .await?;
        self.parse_success_response(response).await
    }

    /// Execute a PATCH request with retry logic
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!("PATCH request to: {}", url);

        let response = self
            .execute_with_retry(
                || self.authorized(self.inner.http_client.patch(&url)).json(body),
                path,
                RetryPolicy::Idempotent,
            )
            .await?;
        self.parse_success_response(response).await
    }

    /// Execute a DELETE request with retry logic. Any success body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        tracing::debug!("DELETE request to: {}", url);

        self.execute_with_retry(
            || self.authorized(self.inner.http_client.delete(&url)),
            path,
            RetryPolicy::Idempotent,
        )
        .await
        .map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.inner.base_url, path)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(AUTHORIZATION, &self.inner.auth_header)
            .header(ACCEPT, "application/json")
    }

    /// Sends until a non-retryable outcome; returns the successful response
    async fn execute_with_retry<F>(
        &self,
        request_fn: F,
        path: &str,
        policy: RetryPolicy,
    ) -> Result<reqwest::Response, ApiError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let config = &self.inner.retry_config;
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= config.max_retries {
            if attempt > 0 {
                let backoff = config.backoff(attempt);
                tracing::debug!(
                    "Retrying request to {} after {}ms (attempt {})",
                    path,
                    backoff.as_millis(),
                    attempt
                );
                tokio::time::sleep(backoff).await;
            }

            match request_fn().send().await {
                Ok(response) => {
                    let status = response.status();
                    tracing::debug!("Response status for {}: {}", path, status);

                    if status.is_success() {
                        return Ok(response);
                    }

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(ApiError::AuthError);
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(ApiError::NotFound(path.to_string()));
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(ApiError::RateLimited);
                    } else if status.is_server_error() {
                        if policy == RetryPolicy::RateLimitedOnly {
                            return Err(ApiError::ServiceUnavailable);
                        }
                        last_error = Some(ApiError::ServiceUnavailable);
                    } else {
                        return self.handle_error_response(response).await;
                    }
                }
                Err(e) => {
                    let error = if e.is_timeout() {
                        ApiError::Timeout(config.timeout_seconds)
                    } else if e.is_connect() {
                        ApiError::ServiceUnavailable
                    } else {
                        return Err(ApiError::RequestError(e));
                    };
                    if policy == RetryPolicy::RateLimitedOnly {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
            }

            attempt += 1;
        }

        Err(last_error.unwrap_or(ApiError::ServiceUnavailable))
    }

    /// Parse successful response. An empty body decodes as JSON null.
    async fn parse_success_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };

        serde_json::from_str::<T>(body).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::ParseError(format!("Failed to parse response: {}", e))
        })
    }

    /// Handle error response
    async fn handle_error_response<T>(&self, response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        let details = serde_json::from_str::<ApiErrorResponse>(&text)
            .ok()
            .map(|err_resp| {
                Box::new(ApiErrorDetails {
                    id: err_resp.id,
                    message: err_resp.message,
                })
            });

        let message = details
            .as_ref()
            .and_then(|d| d.message.clone())
            .unwrap_or(text);

        Err(ApiError::ApiError {
            status,
            message,
            details,
        })
    }
}
