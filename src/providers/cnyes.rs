//! Cnyes (Anue) quote API provider
//!
//! Primary source: no credential required and the payload carries the full
//! open/high/low picture. Field names vary across API revisions, so every
//! price field has a fallback chain.

use super::{build_client, fetch_body, require_positive, FetchFailure, PriceSource, ProviderConfig};
use crate::models::PriceReading;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_ENDPOINT: &str = "https://ws.cnyes.com/ws/api/v1/quote/quotes/XAUUSD";

pub struct CnyesProvider {
    config: ProviderConfig,
    client: Client,
}

#[derive(Deserialize)]
struct CnyesResponse {
    #[serde(default)]
    data: Vec<CnyesQuote>,
}

#[derive(Deserialize)]
struct CnyesQuote {
    close: Option<f64>,
    last: Option<f64>,
    open: Option<f64>,
    #[serde(rename = "previousClose")]
    previous_close: Option<f64>,
    #[serde(rename = "yesterdayClose")]
    yesterday_close: Option<f64>,
    high: Option<f64>,
    #[serde(rename = "dayHigh")]
    day_high: Option<f64>,
    low: Option<f64>,
    #[serde(rename = "dayLow")]
    day_low: Option<f64>,
}

impl CnyesProvider {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        Self::with_config(ProviderConfig::new("cnyes", endpoint))
    }

    pub fn with_config(config: ProviderConfig) -> Self {
        let client = build_client(&config);
        Self { config, client }
    }

    /// Normalize a raw response body into a reading.
    pub fn parse_payload(body: &str) -> Result<PriceReading, FetchFailure> {
        let response: CnyesResponse = serde_json::from_str(body)
            .map_err(|e| FetchFailure::MalformedResponse(e.to_string()))?;
        let quote = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| FetchFailure::MalformedResponse("empty data array".to_string()))?;

        let current = require_positive(
            quote
                .close
                .or(quote.last)
                .ok_or_else(|| FetchFailure::MalformedResponse("no close/last field".to_string()))?,
        )?;
        let open = quote
            .open
            .or(quote.previous_close)
            .or(quote.yesterday_close);
        let high = quote.high.or(quote.day_high);
        let low = quote.low.or(quote.day_low);

        Ok(PriceReading::new(current, open, high, low, "cnyes"))
    }
}

impl Default for CnyesProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for CnyesProvider {
    fn name(&self) -> &str {
        self.config.name
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn fetch(&self) -> Result<PriceReading, FetchFailure> {
        let request = self.client.get(&self.config.endpoint);
        let body = fetch_body(&self.config, request).await?;
        Self::parse_payload(&body)
    }
}
