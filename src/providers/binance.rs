//! Binance 24h ticker provider (PAXG/USDT as a gold proxy)
//!
//! Binance returns HTTP 451 from restricted regions; that is a hard
//! geo-block, not a transient failure, so it falls through to the next
//! provider without retrying. All price fields arrive string-encoded.

use super::{build_client, fetch_body, require_positive, FetchFailure, PriceSource, ProviderConfig};
use crate::models::PriceReading;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_ENDPOINT: &str = "https://api.binance.com/api/v3/ticker/24hr";
const SYMBOL: &str = "PAXGUSDT";

pub struct BinanceProvider {
    config: ProviderConfig,
    client: Client,
}

#[derive(Deserialize)]
struct BinanceTicker {
    #[serde(rename = "lastPrice")]
    last_price: String,
    #[serde(rename = "openPrice")]
    open_price: Option<String>,
    #[serde(rename = "highPrice")]
    high_price: Option<String>,
    #[serde(rename = "lowPrice")]
    low_price: Option<String>,
}

impl BinanceProvider {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT.to_string())
    }

    pub fn with_endpoint(endpoint: String) -> Self {
        Self::with_config(
            ProviderConfig::new("binance", endpoint)
                .with_fatal_status(451, FetchFailure::GeoBlocked),
        )
    }

    pub fn with_config(config: ProviderConfig) -> Self {
        let client = build_client(&config);
        Self { config, client }
    }

    /// Normalize a raw response body into a reading.
    pub fn parse_payload(body: &str) -> Result<PriceReading, FetchFailure> {
        let ticker: BinanceTicker = serde_json::from_str(body)
            .map_err(|e| FetchFailure::MalformedResponse(e.to_string()))?;

        let current = require_positive(parse_price(&ticker.last_price)?)?;
        let open = ticker.open_price.as_deref().map(parse_price).transpose()?;
        let high = ticker.high_price.as_deref().map(parse_price).transpose()?;
        let low = ticker.low_price.as_deref().map(parse_price).transpose()?;

        Ok(PriceReading::new(current, open, high, low, "binance"))
    }
}

fn parse_price(raw: &str) -> Result<f64, FetchFailure> {
    raw.parse::<f64>()
        .map_err(|_| FetchFailure::MalformedResponse(format!("non-numeric price: {}", raw)))
}

impl Default for BinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceSource for BinanceProvider {
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
            .query(&[("symbol", SYMBOL)]);
        let body = fetch_body(&self.config, request).await?;
        Self::parse_payload(&body)
    }
}
