//! Upstream price providers
//!
//! Every provider implements [`PriceSource`]: fetch the current gold spot
//! price from one upstream and normalize its payload into a [`PriceReading`].
//! Failures are data, not exceptions - the acquisition chain inspects the
//! [`FetchFailure`] kind to decide between retrying and falling through to
//! the next provider.

pub mod binance;
pub mod cnyes;
pub mod coingecko;
pub mod goldapi;

pub use binance::BinanceProvider;
pub use cnyes::CnyesProvider;
pub use coingecko::CoinGeckoProvider;
pub use goldapi::GoldApiProvider;

use crate::models::PriceReading;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Browser User-Agent sent to upstreams that block obvious bot traffic.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Why a provider could not produce a usable reading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchFailure {
    #[error("provider credential not configured")]
    ConfigMissing,
    #[error("rate limited by upstream")]
    RateLimited,
    #[error("upstream rejected the credential")]
    Unauthorized,
    #[error("upstream is geo-blocked from this network")]
    GeoBlocked,
    #[error("request timed out")]
    Timeout,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("implausible price: {0}")]
    InvalidPrice(f64),
}

impl FetchFailure {
    /// Transient failures worth retrying against the same provider.
    /// Everything else yields to the next provider in the chain immediately.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FetchFailure::RateLimited | FetchFailure::Timeout | FetchFailure::Connection(_)
        )
    }
}

/// Per-provider request and retry policy.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: &'static str,
    pub endpoint: String,
    pub timeout: Duration,
    /// Total attempts against this provider, including the first.
    pub max_attempts: u32,
    /// Linear backoff base: attempt index times this delay.
    pub backoff: Duration,
    /// Statuses treated as transient beyond the built-in 429 mapping.
    pub retryable_statuses: Vec<u16>,
    /// Statuses with a provider-specific meaning (e.g. 451 geo-block).
    pub fatal_statuses: Vec<(u16, FetchFailure)>,
}

impl ProviderConfig {
    pub fn new(name: &'static str, endpoint: impl Into<String>) -> Self {
        Self {
            name,
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(10),
            max_attempts: 3,
            backoff: Duration::from_secs(2),
            retryable_statuses: vec![500, 502, 503, 504],
            fatal_statuses: Vec::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_fatal_status(mut self, status: u16, failure: FetchFailure) -> Self {
        self.fatal_statuses.push((status, failure));
        self
    }

    /// Map a non-success HTTP status to a failure kind.
    pub fn classify_status(&self, status: u16) -> FetchFailure {
        if let Some((_, failure)) = self.fatal_statuses.iter().find(|(s, _)| *s == status) {
            return failure.clone();
        }
        match status {
            429 => FetchFailure::RateLimited,
            401 | 403 => FetchFailure::Unauthorized,
            451 => FetchFailure::GeoBlocked,
            s if self.retryable_statuses.contains(&s) => {
                FetchFailure::Connection(format!("HTTP {}", s))
            }
            s => FetchFailure::MalformedResponse(format!("unexpected HTTP status {}", s)),
        }
    }
}

/// A single upstream price source.
#[async_trait]
pub trait PriceSource: Send + Sync {
    fn name(&self) -> &str;

    fn config(&self) -> &ProviderConfig;

    /// Fetch and normalize the current spot price.
    async fn fetch(&self) -> Result<PriceReading, FetchFailure>;
}

/// Build the HTTP client for a provider: timeout and browser User-Agent.
/// Falls back to a default client if the builder rejects the configuration.
pub(crate) fn build_client(config: &ProviderConfig) -> Client {
    let mut headers = HeaderMap::new();
    if let Ok(ua) = HeaderValue::from_str(BROWSER_USER_AGENT) {
        headers.insert(USER_AGENT, ua);
    }
    Client::builder()
        .timeout(config.timeout)
        .default_headers(headers)
        .build()
        .unwrap_or_default()
}

/// Map a reqwest transport error to a failure kind.
pub(crate) fn map_transport_error(err: reqwest::Error) -> FetchFailure {
    if err.is_timeout() {
        FetchFailure::Timeout
    } else {
        FetchFailure::Connection(err.to_string())
    }
}

/// Issue a GET-style request and return the response body, classifying
/// transport errors and non-success statuses per the provider config.
pub(crate) async fn fetch_body(
    config: &ProviderConfig,
    request: reqwest::RequestBuilder,
) -> Result<String, FetchFailure> {
    let response = request.send().await.map_err(map_transport_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(config.classify_status(status.as_u16()));
    }
    response.text().await.map_err(map_transport_error)
}

/// Reject non-positive prices before they reach the decision engine.
pub(crate) fn require_positive(price: f64) -> Result<f64, FetchFailure> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(FetchFailure::InvalidPrice(price))
    }
}
