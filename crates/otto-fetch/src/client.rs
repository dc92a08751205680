//! HTTP client wrapper with bounded retry and rate limiting

use crate::error::Result;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Rate limiter for a specific registry
pub type RegistryRateLimiter = Arc<RateLimiter<governor::state::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>>;

/// Response from a completed HTTP round trip.
///
/// The status is always present, including for non-2xx responses; deciding
/// whether a given status is acceptable is the caller's job.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code of the final response
    pub status: reqwest::StatusCode,
    /// Response body as text
    pub body: String,
}

impl FetchResponse {
    /// Whether the response carries exactly `200 OK`
    pub fn is_ok(&self) -> bool {
        self.status == reqwest::StatusCode::OK
    }
}

/// The injectable fetch function used by resolution code.
///
/// Production code uses [`HttpClient`]; tests substitute canned responses.
/// Implementations must treat `retry_limit` as additional attempts after the
/// first, applied only to transport-level failures.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Perform a GET request against `url` with up to `retry_limit` retries
    async fn get(&self, url: &str, retry_limit: u32) -> Result<FetchResponse>;
}

/// HTTP client wrapper for registry and remote manifest requests
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    rate_limiter: Option<RegistryRateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration (no rate limiting)
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("otto-fetch/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            rate_limiter: None,
        })
    }

    /// Create a new HTTP client with rate limiting
    ///
    /// # Arguments
    ///
    /// * `requests_per_second` - Maximum requests per second against any one host
    pub fn with_rate_limit(requests_per_second: u32) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(format!("otto-fetch/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        let quota = Quota::per_second(NonZeroU32::new(requests_per_second).unwrap());
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            client,
            rate_limiter: Some(rate_limiter),
        })
    }

    /// Wait for rate limiter if enabled
    async fn wait_for_rate_limit(&self) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
    }

    /// Make a GET request, retrying transport failures up to `retry_limit` times
    pub async fn get(&self, url: &str, retry_limit: u32) -> Result<FetchResponse> {
        // Reject malformed URLs up front so they count as transport failures,
        // not as requests.
        let parsed = url::Url::parse(url)?;

        let mut last_err = None;
        for attempt in 0..=retry_limit {
            self.wait_for_rate_limit().await;

            match self.client.get(parsed.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await?;
                    return Ok(FetchResponse { status, body });
                }
                Err(err) => {
                    tracing::debug!(url, attempt, error = %err, "fetch attempt failed");
                    last_err = Some(err);
                }
            }
        }

        Err(crate::error::Error::Http(last_err.expect("at least one attempt")))
    }
}

#[async_trait::async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &str, retry_limit: u32) -> Result<FetchResponse> {
        HttpClient::get(self, url, retry_limit).await
    }
}
