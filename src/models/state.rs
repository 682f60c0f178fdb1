//! Persisted tracking state
//!
//! One versioned JSON document carries everything that must survive between
//! process invocations: the last seen price, the daily high/low with its date
//! boundary and the last report timestamp. The schema is versioned so a
//! future format change cannot silently diverge.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Current state document schema version.
pub const STATE_SCHEMA_VERSION: u32 = 1;

fn schema_version() -> u32 {
    STATE_SCHEMA_VERSION
}

/// Cross-invocation tracking state. All fields are absent on the first run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedState {
    #[serde(default = "schema_version")]
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_price_at: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub daily_high: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub daily_low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub daily_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_report_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_report_at: Option<DateTime<FixedOffset>>,
}

impl Default for TrackedState {
    fn default() -> Self {
        Self {
            version: STATE_SCHEMA_VERSION,
            last_price: None,
            last_price_at: None,
            daily_high: None,
            daily_low: None,
            daily_date: None,
            last_report_date: None,
            last_report_at: None,
        }
    }
}

impl TrackedState {
    /// Apply the day-boundary rule: daily extrema are never carried across a
    /// date change, they are reseeded from the first reading of the new day.
    pub fn roll_over(&mut self, today: NaiveDate) {
        if self.daily_date != Some(today) {
            self.daily_high = None;
            self.daily_low = None;
            self.daily_date = None;
        }
    }

    /// Fold a fresh price into the state: update daily extrema for `today`
    /// and record the price as the new last-seen value.
    pub fn observe(&mut self, price: f64, now: DateTime<FixedOffset>, today: NaiveDate) {
        self.roll_over(today);

        match self.daily_high {
            Some(high) if price <= high => {}
            _ => self.daily_high = Some(price),
        }
        match self.daily_low {
            Some(low) if price >= low => {}
            _ => self.daily_low = Some(price),
        }
        self.daily_date = Some(today);

        self.last_price = Some(price);
        self.last_price_at = Some(now);
    }

    /// Record that a scheduled report went out at `now`.
    pub fn mark_reported(&mut self, now: DateTime<FixedOffset>, today: NaiveDate) {
        self.last_report_date = Some(today);
        self.last_report_at = Some(now);
    }
}
