//! CoinGecko simple-price provider (PAX Gold)
//!
//! Last resort in the chain: free, keyless, aggressively rate limited, and
//! only supplies a point price. Open/high/low are set to the current price,
//! which downstream math treats as zero variance.

use super::{build_client, fetch_body, require_positive, FetchFailure, PriceSource, ProviderConfig};
use crate::models::PriceReading;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_ENDPOINT: &str = "https://api.coingecko.com/api/v3/simple/price";
const COIN_ID: &str = "pax-gold";

pub struct CoinGeckoProvider {
    config: ProviderConfig,
    client: Client,
}

#[derive(Deserialize)]
struct CoinGeckoResponse {
    #[serde(rename = "pax-gold")]
    pax_gold: Option<CoinGeckoPrice>,
}

#[derive(Deserialize)]
struct CoinGeckoPrice {
    usd: Option<f64>,
}

impl CoinGeckoProvider {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        Self::with_config(ProviderConfig::new("coingecko", endpoint))
    }

    pub fn with_config(config: ProviderConfig) -> Self {
        let client = build_client(&config);
        Self { config, client }
    }

    /// Normalize a raw response body into a point-price reading.
    pub fn parse_payload(body: &str) -> Result<PriceReading, FetchFailure> {
        let response: CoinGeckoResponse = serde_json::from_str(body)
            .map_err(|e| FetchFailure::MalformedResponse(e.to_string()))?;
        let usd = response
            .pax_gold
            .and_then(|p| p.usd)
            .ok_or_else(|| FetchFailure::MalformedResponse("no pax-gold.usd field".to_string()))?;
        let current = require_positive(usd)?;
        Ok(PriceReading::point(current, "coingecko"))
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for CoinGeckoProvider {
    fn name(&self) -> &str {
        self.config.name
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn fetch(&self) -> Result<PriceReading, FetchFailure> {
        let request = self
            .client
            .get(&self.config.endpoint)
            .query(&[("ids", COIN_ID), ("vs_currencies", "usd")]);
        let body = fetch_body(&self.config, request).await?;
        Self::parse_payload(&body)
    }
}
