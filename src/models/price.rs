//! Normalized price reading produced by a provider

use serde::{Deserialize, Serialize};

/// A single normalized spot price observation.
///
/// Providers that can only supply a point price set open = high = low =
/// current; downstream change/volatility math treats that as zero variance,
/// not as an error. Upstream high/low are not trusted to bracket the current
/// price - [`PriceReading::widened`] restores the invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceReading {
    pub current_price: f64,
    pub open_price: f64,
    pub day_high: f64,
    pub day_low: f64,
    /// Which provider produced this reading.
    pub source: String,
}

impl PriceReading {
    /// Build a reading, substituting the current price for any field the
    /// upstream did not supply.
    pub fn new(
        current_price: f64,
        open_price: Option<f64>,
        day_high: Option<f64>,
        day_low: Option<f64>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            current_price,
            open_price: open_price.unwrap_or(current_price),
            day_high: day_high.unwrap_or(current_price),
            day_low: day_low.unwrap_or(current_price),
            source: source.into(),
        }
    }

    /// A point-price reading: open = high = low = current.
    pub fn point(current_price: f64, source: impl Into<String>) -> Self {
        Self::new(current_price, None, None, None, source)
    }

    /// Widen high/low so that `day_low <= current_price <= day_high` holds
    /// even when the upstream data contradicts it.
    pub fn widened(mut self) -> Self {
        if self.day_high < self.current_price {
            self.day_high = self.current_price;
        }
        if self.day_low > self.current_price {
            self.day_low = self.current_price;
        }
        self
    }
}
