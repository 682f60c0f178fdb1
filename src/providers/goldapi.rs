//! GoldAPI.io provider
//!
//! Requires an API key (`x-access-token` header). A missing key reports
//! `ConfigMissing` so the chain skips this provider without burning a
//! network attempt. GoldAPI signals an invalid key either with HTTP 401 or
//! with an `error`/`message` field inside a 200 response.

use super::{build_client, fetch_body, require_positive, FetchFailure, PriceSource, ProviderConfig};
use crate::models::PriceReading;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_ENDPOINT: &str = "https://www.goldapi.io/api/XAU/USD";

pub struct GoldApiProvider {
    config: ProviderConfig,
    client: Client,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct GoldApiResponse {
    price: Option<f64>,
    open_price: Option<f64>,
    high_price: Option<f64>,
    low_price: Option<f64>,
    error: Option<String>,
    message: Option<String>,
}

impl GoldApiProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string(), api_key)
    }

    pub fn with_endpoint(endpoint: String, api_key: Option<String>) -> Self {
        Self::with_config(ProviderConfig::new("goldapi", endpoint), api_key)
    }

    pub fn with_config(config: ProviderConfig, api_key: Option<String>) -> Self {
        let client = build_client(&config);
        Self {
            config,
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Normalize a raw response body into a reading.
    pub fn parse_payload(body: &str) -> Result<PriceReading, FetchFailure> {
        let response: GoldApiResponse = serde_json::from_str(body)
            .map_err(|e| FetchFailure::MalformedResponse(e.to_string()))?;

        // GoldAPI reports key problems in-band with a 200 status
        if response.error.is_some() || response.message.is_some() {
            return Err(FetchFailure::Unauthorized);
        }

        let current = require_positive(
            response
                .price
                .ok_or_else(|| FetchFailure::MalformedResponse("no price field".to_string()))?,
        )?;

        Ok(PriceReading::new(
            current,
            response.open_price,
            response.high_price,
            response.low_price,
            "goldapi",
        ))
    }
}

#[async_trait]
impl PriceSource for GoldApiProvider {
    fn name(&self) -> &str {
        self.config.name
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn fetch(&self) -> Result<PriceReading, FetchFailure> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => return Err(FetchFailure::ConfigMissing),
        };

        let request = self
            .client
            .get(&self.config.endpoint)
            .header("x-access-token", api_key)
            .header("Content-Type", "application/json");
        let body = fetch_body(&self.config, request).await?;
        Self::parse_payload(&body)
    }
}
