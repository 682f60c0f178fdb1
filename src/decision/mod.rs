//! Notification decision engine
//!
//! One decision per invocation: given the fresh reading, the persisted
//! state and the current local time, decide whether to notify and compose
//! the message. Pure - no IO here; the runner persists the returned state
//! before any delivery attempt.

pub mod message;

use crate::config::{Config, ReportWindow};
use crate::models::{PriceReading, TrackedState};
use chrono::{DateTime, FixedOffset};
use tracing::debug;

/// Decision-relevant configuration, detached from credentials.
#[derive(Debug, Clone)]
pub struct DecisionSettings {
    pub change_threshold_percent: f64,
    pub report_windows: Vec<ReportWindow>,
    pub report_window_tolerance_minutes: u32,
}

impl From<&Config> for DecisionSettings {
    fn from(config: &Config) -> Self {
        Self {
            change_threshold_percent: config.change_threshold_percent,
            report_windows: config.report_windows.clone(),
            report_window_tolerance_minutes: config.report_window_tolerance_minutes,
        }
    }
}

/// Which message format was composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    DailyReport,
    Alert,
    /// Threshold breach inside a report window: alert block prepended to the
    /// daily summary.
    AlertWithReport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Notify { message: String, kind: MessageKind },
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub action: Action,
    /// Updated state to persist, regardless of the action.
    pub state: TrackedState,
    pub alert: bool,
    pub scheduled: bool,
    /// Signed percent change vs the last stored price, when one existed.
    pub pct_change: Option<f64>,
}

/// Evaluate one invocation.
///
/// The alert comparison is always against the previous *stored* price, never
/// the day's opening price; the first run (no stored price) never alerts.
pub fn evaluate(
    reading: &PriceReading,
    prior: TrackedState,
    now: DateTime<FixedOffset>,
    manual_trigger: bool,
    settings: &DecisionSettings,
) -> Decision {
    let today = now.date_naive();
    let last_price = prior.last_price;

    let mut state = prior;
    state.observe(reading.current_price, now, today);

    let pct_change = last_price
        .filter(|last| *last > 0.0)
        .map(|last| (reading.current_price - last) / last * 100.0);
    let alert = pct_change
        .map(|pct| pct.abs() >= settings.change_threshold_percent)
        .unwrap_or(false);

    let in_window = settings.report_windows.iter().any(|window| {
        window.contains(now, settings.report_window_tolerance_minutes)
    });
    let scheduled = manual_trigger || in_window;

    debug!(
        price = reading.current_price,
        pct_change = ?pct_change,
        alert,
        scheduled,
        manual_trigger,
        "evaluated reading from {}",
        reading.source
    );

    if !alert && !scheduled {
        return Decision {
            action: Action::Skip,
            state,
            alert,
            scheduled,
            pct_change,
        };
    }

    // Reported extrema combine what this monitor observed today with the
    // range the upstream supplied. A point-price reading contributes nothing
    // beyond the current price, so a first report from such a reading
    // legitimately shows high == low and zero volatility.
    let day_high = state
        .daily_high
        .unwrap_or(reading.current_price)
        .max(reading.day_high);
    let day_low = state
        .daily_low
        .unwrap_or(reading.current_price)
        .min(reading.day_low);

    let (text, kind) = match (alert, scheduled) {
        (true, true) => {
            let alert_block = message::alert(
                last_price.unwrap_or(reading.current_price),
                reading.current_price,
                pct_change.unwrap_or(0.0),
            );
            let report = message::daily_report(
                now,
                reading.current_price,
                reading.open_price,
                day_high,
                day_low,
            );
            (
                format!("{}\n\n{}", alert_block, report),
                MessageKind::AlertWithReport,
            )
        }
        (true, false) => (
            message::alert(
                last_price.unwrap_or(reading.current_price),
                reading.current_price,
                pct_change.unwrap_or(0.0),
            ),
            MessageKind::Alert,
        ),
        _ => (
            message::daily_report(
                now,
                reading.current_price,
                reading.open_price,
                day_high,
                day_low,
            ),
            MessageKind::DailyReport,
        ),
    };

    if scheduled {
        state.mark_reported(now, today);
    }

    Decision {
        action: Action::Notify {
            message: text,
            kind,
        },
        state,
        alert,
        scheduled,
        pct_change,
    }
}
