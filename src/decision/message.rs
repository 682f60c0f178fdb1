//! Notification message composition

use crate::acquisition::ProviderFailure;
use chrono::{DateTime, FixedOffset};
use std::fmt::Write;

/// Daily range volatility in percent, guarded against a zero high.
pub fn volatility(day_high: f64, day_low: f64) -> f64 {
    if day_high > 0.0 {
        (day_high - day_low) / day_high * 100.0
    } else {
        0.0
    }
}

/// The scheduled daily report.
pub fn daily_report(
    now: DateTime<FixedOffset>,
    current_price: f64,
    open_price: f64,
    day_high: f64,
    day_low: f64,
) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "\u{1F4CA} Daily Gold Price Report");
    let _ = writeln!(text, "Report time: {}", now.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(text, "Date: {}", now.format("%Y-%m-%d"));
    let _ = writeln!(text, "Current price: ${:.2}", current_price);
    let _ = writeln!(text, "-------------------");
    let _ = writeln!(text, "Open price: ${:.2}", open_price);
    let _ = writeln!(text, "Day high: ${:.2}", day_high);
    let _ = writeln!(text, "Day low: ${:.2}", day_low);
    let _ = write!(text, "Volatility: {:.2}%", volatility(day_high, day_low));
    text
}

/// The threshold-breach alert block. `pct_change` is signed, relative to the
/// last stored price.
pub fn alert(last_price: f64, current_price: f64, pct_change: f64) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "\u{26A0}\u{FE0F} Gold Price Alert");
    let _ = writeln!(text, "Change: {:+.2}% since last check", pct_change);
    let _ = writeln!(text, "Last price: ${:.2}", last_price);
    let _ = write!(text, "Current price: ${:.2}", current_price);
    text
}

/// The diagnostic sent when every provider failed.
pub fn acquisition_failed(now: DateTime<FixedOffset>, failures: &[ProviderFailure]) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "\u{26A0}\u{FE0F} Gold price fetch failed");
    let _ = writeln!(text, "Report time: {}", now.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(text, "All providers were exhausted:");
    for failure in failures {
        let _ = writeln!(text, "- {}: {}", failure.provider, failure.failure);
    }
    let _ = write!(
        text,
        "Check network connectivity and provider status; the next scheduled run will retry."
    );
    text
}
