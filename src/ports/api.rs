use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::api::ApiRequest;

/// Infrastructure failure: the remote API could not be asked or did not answer
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Raw response as seen by the assertion layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON; non-JSON bodies are kept as a JSON string
    pub body: Value,
    #[serde(with = "duration_ms")]
    pub elapsed: Duration,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body,
            elapsed: Duration::ZERO,
        }
    }

    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the body is an object holding an array under `key`
    pub fn has_array(&self, key: &str) -> bool {
        self.body.get(key).is_some_and(Value::is_array)
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}

/// Port to the aggregator API. One generic call; builders pick the endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AggregatorApi: Send + Sync {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoint;
    use serde_json::json;

    #[test]
    fn test_response_helpers() {
        let resp = ApiResponse::new(200, json!({"routes": [], "count": 1}));
        assert!(resp.is_success());
        assert!(resp.has_array("routes"));
        assert!(!resp.has_array("count"));
        assert!(!ApiResponse::new(404, Value::Null).is_success());
    }

    #[test]
    fn test_response_serializes_elapsed_as_millis() {
        let resp = ApiResponse::new(200, json!({})).with_elapsed(Duration::from_millis(1500));
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(value["elapsed"], json!(1500));
    }

    #[tokio::test]
    async fn test_mock_api_returns_configured_response() {
        let mut mock = MockAggregatorApi::new();
        mock.expect_send()
            .withf(|req| req.endpoint == Endpoint::Tools)
            .times(1)
            .returning(|_| Ok(ApiResponse::new(200, json!({"bridges": [], "exchanges": []}))));

        let resp = mock.send(&ApiRequest::get(Endpoint::Tools)).await.unwrap();
        assert!(resp.has_array("bridges"));
    }

    #[test]
    fn test_mock_api_propagates_transport_error() {
        let mut mock = MockAggregatorApi::new();
        mock.expect_send()
            .returning(|_| Err(TransportError::Timeout(Duration::from_secs(30))));

        let result = tokio_test::block_on(mock.send(&ApiRequest::get(Endpoint::Chains)));
        let err = tokio_test::assert_err!(result);
        assert_eq!(err.to_string(), "request timed out after 30s");
    }
}
