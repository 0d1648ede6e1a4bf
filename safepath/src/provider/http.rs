//! HTTP client abstraction for testability

use std::future::Future;
use std::time::Duration;

use tracing::{debug, trace, warn};

use super::types::ProviderError;

/// Trait for asynchronous HTTP GET requests.
///
/// Providers are generic over this trait so tests can substitute
/// [`tests::MockAsyncHttpClient`] for the network.
pub trait AsyncHttpClient: Send + Sync + 'static {
    /// Performs an async HTTP GET request and returns the response body.
    fn get(&self, url: &str) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("safepath/", env!("CARGO_PKG_VERSION"));

/// Async HTTP client implementation using reqwest.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a client with a custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                ProviderError::HttpError(format!("Failed to create async HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

/// Strips the `key` query parameter so credentials never reach the logs.
fn redact(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(mut parsed) => {
            let pairs: Vec<(String, String)> = parsed
                .query_pairs()
                .map(|(k, v)| {
                    let v = if k == "key" { "***".to_string() } else { v.into_owned() };
                    (k.into_owned(), v)
                })
                .collect();
            parsed.query_pairs_mut().clear().extend_pairs(pairs);
            parsed.to_string()
        }
        Err(_) => "<invalid url>".to_string(),
    }
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
        let safe_url = redact(url);
        trace!(url = %safe_url, "HTTP GET request starting");

        let response = match self.client.get(url).send().await {
            Ok(resp) => {
                debug!(
                    url = %safe_url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                let e = e.without_url();
                warn!(
                    url = %safe_url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ProviderError::HttpError(format!("Request failed: {}", e)));
            }
        };

        if !response.status().is_success() {
            warn!(
                url = %safe_url,
                status = response.status().as_u16(),
                "HTTP error status"
            );
            return Err(ProviderError::HttpError(format!(
                "HTTP {}",
                response.status()
            )));
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = %safe_url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                let e = e.without_url();
                warn!(url = %safe_url, error = %e, "Failed to read response body");
                Err(ProviderError::HttpError(format!(
                    "Failed to read response: {}",
                    e
                )))
            }
        }
    }
}

/// Test doubles, available to other crates with the `test-util` feature.
#[cfg(any(test, feature = "test-util"))]
pub mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Mock async HTTP client that records requested URLs.
    ///
    /// Responses are matched by URL substring in insertion order; unmatched
    /// URLs get `fallback`.
    #[derive(Clone)]
    pub struct MockAsyncHttpClient {
        routes: Vec<(String, Result<Vec<u8>, ProviderError>)>,
        fallback: Result<Vec<u8>, ProviderError>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl MockAsyncHttpClient {
        /// Client that answers every request with `response`.
        pub fn new(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self {
                routes: Vec::new(),
                fallback: response,
                requests: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Client that answers every request with a JSON body.
        pub fn json(body: &str) -> Self {
            Self::new(Ok(body.as_bytes().to_vec()))
        }

        /// Answer URLs containing `pattern` with a JSON body.
        pub fn route(mut self, pattern: &str, body: &str) -> Self {
            self.routes
                .push((pattern.to_string(), Ok(body.as_bytes().to_vec())));
            self
        }

        /// URLs requested so far.
        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().clone()
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().push(url.to_string());
            self.routes
                .iter()
                .find(|(pattern, _)| url.contains(pattern.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| self.fallback.clone())
        }
    }

    #[tokio::test]
    async fn test_mock_client_routes_and_records() {
        let client = MockAsyncHttpClient::json(r#"{"status":"ZERO_RESULTS"}"#)
            .route("/directions/", r#"{"status":"OK"}"#);

        let routed = client.get("https://example.test/directions/json").await;
        let fallback = client.get("https://example.test/geocode/json").await;

        assert_eq!(routed.unwrap(), br#"{"status":"OK"}"#.to_vec());
        assert_eq!(fallback.unwrap(), br#"{"status":"ZERO_RESULTS"}"#.to_vec());
        assert_eq!(client.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let client = MockAsyncHttpClient::new(Err(ProviderError::HttpError("down".into())));
        let result = client.get("https://example.test").await;
        assert_eq!(result, Err(ProviderError::HttpError("down".into())));
    }

    #[test]
    fn test_redact_hides_api_key() {
        let url = "https://maps.example.test/json?input=India+Gate&key=SECRET123";
        let safe = redact(url);
        assert!(!safe.contains("SECRET123"));
        assert!(safe.contains("input=India+Gate"));
    }
}
