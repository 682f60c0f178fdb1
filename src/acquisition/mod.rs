//! Ordered provider fallback chain
//!
//! Providers are tried strictly in priority order - not randomized, not
//! raced - so runs stay deterministic and only one upstream rate limit is
//! touched at a time. Each provider exhausts its own retry policy before the
//! chain moves on; retries apply to transient failure kinds only.

use crate::config::Config;
use crate::models::PriceReading;
use crate::providers::{
    BinanceProvider, CnyesProvider, CoinGeckoProvider, FetchFailure, GoldApiProvider, PriceSource,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// The last failure recorded for one provider in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderFailure {
    pub provider: String,
    pub failure: FetchFailure,
}

/// Every provider in the chain was exhausted.
#[derive(Debug, Error)]
#[error("all price providers failed")]
pub struct AcquisitionFailed {
    pub failures: Vec<ProviderFailure>,
}

pub struct AcquisitionEngine {
    sources: Vec<Box<dyn PriceSource>>,
}

impl AcquisitionEngine {
    pub fn new(sources: Vec<Box<dyn PriceSource>>) -> Self {
        Self { sources }
    }

    /// The production chain, in priority order. GoldAPI sits in the chain
    /// even without a key; it reports `ConfigMissing` and is skipped without
    /// a network attempt.
    pub fn from_config(config: &Config) -> Self {
        Self::new(vec![
            Box::new(CnyesProvider::new()),
            Box::new(GoldApiProvider::new(config.goldapi_key.clone())),
            Box::new(BinanceProvider::new()),
            Box::new(CoinGeckoProvider::new()),
        ])
    }

    /// Try each provider in order until one returns a usable reading.
    ///
    /// On success the reading is widened so high/low bracket the current
    /// price. On exhaustion the per-provider failure kinds are returned for
    /// the diagnostic notification.
    pub async fn acquire(&self) -> Result<PriceReading, AcquisitionFailed> {
        let mut failures = Vec::new();

        for source in &self.sources {
            let config = source.config();
            let max_attempts = config.max_attempts.max(1);
            let mut last_failure = None;

            for attempt in 1..=max_attempts {
                match source.fetch().await {
                    Ok(reading) => {
                        info!(
                            provider = source.name(),
                            price = reading.current_price,
                            attempt,
                            "acquired price from {}: ${:.2}",
                            source.name(),
                            reading.current_price
                        );
                        return Ok(reading.widened());
                    }
                    Err(failure) => {
                        let retry = failure.is_retryable() && attempt < max_attempts;
                        if retry {
                            let delay = config.backoff * attempt;
                            warn!(
                                provider = source.name(),
                                attempt,
                                error = %failure,
                                "transient failure from {}, retrying in {:?}",
                                source.name(),
                                delay
                            );
                            last_failure = Some(failure);
                            tokio::time::sleep(delay).await;
                        } else {
                            if failure == FetchFailure::ConfigMissing {
                                debug!(
                                    provider = source.name(),
                                    "{} has no credential configured, skipping",
                                    source.name()
                                );
                            } else {
                                warn!(
                                    provider = source.name(),
                                    attempt,
                                    error = %failure,
                                    "{} failed, moving to next provider",
                                    source.name()
                                );
                            }
                            last_failure = Some(failure);
                            break;
                        }
                    }
                }
            }

            if let Some(failure) = last_failure {
                failures.push(ProviderFailure {
                    provider: source.name().to_string(),
                    failure,
                });
            }
        }

        Err(AcquisitionFailed { failures })
    }
}
