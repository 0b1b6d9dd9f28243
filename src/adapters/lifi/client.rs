//! LI.FI API Client
//!
//! HTTP client for the LI.FI aggregation API (`/v1`). Sends any
//! [`ApiRequest`] and hands back status + parsed body without judging it:
//! every HTTP status is data for the assertion layer, not an error. Only
//! connection failures and timeouts are retried.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{
    ApiRequest, ChainsQuery, ChainsResponse, Method, QuoteParams, QuoteResponse, RoutesRequest, RoutesResponse,
    TokenDetails, TokenQuery, TokensQuery, TokensResponse, ToolsQuery, ToolsResponse,
};
use crate::ports::{AggregatorApi, ApiResponse, TransportError};

pub const DEFAULT_BASE_URL: &str = "https://li.quest/v1/";

/// Header carrying the optional integrator API key
pub const API_KEY_HEADER: &str = "x-lifi-api-key";

/// LI.FI client configuration
#[derive(Debug, Clone)]
pub struct LiFiConfig {
    /// Base URL, always with a trailing slash
    pub base_url: String,
    /// Optional API key for higher rate limits
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Retries after the first attempt, for connection failures and timeouts
    pub max_retries: u32,
    /// Base delay before the first retry, doubled for each further one
    pub retry_backoff: Duration,
}

impl Default for LiFiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

/// Ensure exactly one trailing slash so relative joins keep the `/v1` segment
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    format!("{}/", trimmed)
}

/// LI.FI aggregator client
#[derive(Debug, Clone)]
pub struct LiFiClient {
    config: LiFiConfig,
    base: Url,
    http: Client,
}

impl LiFiClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self, TransportError> {
        Self::with_config(LiFiConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(mut config: LiFiConfig) -> Result<Self, TransportError> {
        config.base_url = normalize_base_url(&config.base_url);
        let base = Url::parse(&config.base_url)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self { config, base, http })
    }

    /// Get the configured API base URL
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn endpoint_url(&self, request: &ApiRequest) -> Result<Url, TransportError> {
        self.base
            .join(request.endpoint.path())
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", request.endpoint.path(), e)))
    }

    fn build(&self, request: &ApiRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = self.endpoint_url(request)?;
        let mut req = match request.method() {
            Method::Get => self.http.get(url),
            Method::Post => self.http.post(url),
        };
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(ref body) = request.body {
            req = req.json(body);
        }
        if let Some(ref api_key) = self.config.api_key {
            req = req.header(API_KEY_HEADER, api_key);
        }
        Ok(req.header("Accept", "application/json"))
    }

    /// Delay before retry number `attempt + 1`, doubling each time
    fn backoff(&self, attempt: u32) -> Duration {
        self.config
            .retry_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Send with retries for connection failures and timeouts only.
    /// Any HTTP answer, 429 and 5xx included, is returned on first sight.
    async fn execute_with_retry(&self, request: &ApiRequest) -> Result<reqwest::Response, TransportError> {
        let builder = self.build(request)?;
        let attempts = self.config.max_retries.saturating_add(1);
        let mut attempt = 0;

        loop {
            let req = builder
                .try_clone()
                .ok_or_else(|| TransportError::Client("request body cannot be cloned".into()))?;

            let err = match req.send().await {
                Ok(response) => {
                    if response.status() == StatusCode::TOO_MANY_REQUESTS {
                        tracing::warn!("Rate limited (429) on {}", request.endpoint);
                    }
                    return Ok(response);
                }
                Err(e) if e.is_timeout() => TransportError::Timeout(self.config.timeout),
                Err(e) => TransportError::Http(e),
            };

            attempt += 1;
            if attempt >= attempts {
                return Err(err);
            }
            let backoff = self.backoff(attempt - 1);
            tracing::warn!(
                "Request to {} failed: {} (attempt {}/{}), retrying in {:?}",
                request.endpoint,
                err,
                attempt,
                attempts,
                backoff
            );
            tokio::time::sleep(backoff).await;
        }
    }

    /// Decode a typed success body, surfacing error envelopes as text
    fn handle_response<T: DeserializeOwned>(response: ApiResponse) -> Result<T, TransportError> {
        if !response.is_success() {
            return Err(TransportError::Decode(format!(
                "API error {}: {}",
                response.status, response.body
            )));
        }
        serde_json::from_value(response.body)
            .map_err(|e| TransportError::Decode(format!("Failed to parse response: {}", e)))
    }

    pub async fn get_quote(&self, params: &QuoteParams) -> Result<QuoteResponse, TransportError> {
        Self::handle_response(self.send(&params.to_request()).await?)
    }

    pub async fn post_routes(&self, body: &RoutesRequest) -> Result<RoutesResponse, TransportError> {
        Self::handle_response(self.send(&body.to_request()).await?)
    }

    pub async fn get_tools(&self, query: &ToolsQuery) -> Result<ToolsResponse, TransportError> {
        Self::handle_response(self.send(&query.to_request()).await?)
    }

    pub async fn get_tokens(&self, query: &TokensQuery) -> Result<TokensResponse, TransportError> {
        Self::handle_response(self.send(&query.to_request()).await?)
    }

    pub async fn get_token(&self, query: &TokenQuery) -> Result<TokenDetails, TransportError> {
        Self::handle_response(self.send(&query.to_request()).await?)
    }

    pub async fn get_chains(&self, query: &ChainsQuery) -> Result<ChainsResponse, TransportError> {
        Self::handle_response(self.send(&query.to_request()).await?)
    }
}

#[async_trait]
impl AggregatorApi for LiFiClient {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        tracing::debug!("{} {}", request.describe(), self.config.base_url);
        let started = Instant::now();
        let response = self.execute_with_retry(request).await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let elapsed = started.elapsed();

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        tracing::debug!("{} -> {} in {:?}", request.endpoint, status, elapsed);
        Ok(ApiResponse::new(status, body).with_elapsed(elapsed))
    }
}
