//! Process configuration
//!
//! All environment reads happen here, once, at startup. The resulting
//! [`Config`] is passed by reference into the acquisition, decision and
//! notification layers - nothing deeper in the stack touches the process
//! environment.

use chrono::{DateTime, FixedOffset, Timelike};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Default alert threshold in percent, relative to the last stored price.
pub const DEFAULT_CHANGE_THRESHOLD_PERCENT: f64 = 1.0;

/// Default inclusive report window length in minutes.
pub const DEFAULT_WINDOW_TOLERANCE_MINUTES: u32 = 10;

/// Default monitor-local timezone offset (Taiwan, UTC+8).
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set - configure it in the environment or GitHub Secrets")]
    MissingCredential(&'static str),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// A daily report window start, at minute-of-hour granularity.
///
/// `hour: None` means the window recurs every hour; the default configuration
/// reports hourly at `*:00`. The window spans from `hour:minute` through
/// `hour:minute + tolerance`, both bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub hour: Option<u32>,
    pub minute: u32,
}

impl ReportWindow {
    /// Parse a window spec of the form `HH:MM` or `*:MM`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (hour_part, minute_part) = spec.trim().split_once(':')?;
        let minute: u32 = minute_part.trim().parse().ok()?;
        if minute > 59 {
            return None;
        }
        if hour_part.trim() == "*" {
            return Some(Self { hour: None, minute });
        }
        let hour: u32 = hour_part.trim().parse().ok()?;
        if hour > 23 {
            return None;
        }
        Some(Self {
            hour: Some(hour),
            minute,
        })
    }

    /// Whether `now` falls inside this window given an inclusive tolerance
    /// in minutes. Bounds are inclusive at both ends: a `10:00` window with
    /// tolerance 5 covers 10:00 through 10:05 and excludes 10:06.
    pub fn contains(&self, now: DateTime<FixedOffset>, tolerance_minutes: u32) -> bool {
        let minute_of_day = now.hour() * 60 + now.minute();
        match self.hour {
            Some(hour) => {
                let start = hour * 60 + self.minute;
                let elapsed = (minute_of_day as i64 - start as i64).rem_euclid(24 * 60);
                elapsed <= tolerance_minutes as i64
            }
            None => {
                let elapsed = (now.minute() as i64 - self.minute as i64).rem_euclid(60);
                elapsed <= tolerance_minutes as i64
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// LINE Messaging API channel access token (required).
    pub channel_access_token: String,
    /// LINE push recipient user id (required).
    pub user_id: String,
    /// GoldAPI.io credential; absence skips that provider entirely.
    pub goldapi_key: Option<String>,
    /// Operator-initiated run: forces a scheduled report.
    pub manual_trigger: bool,
    pub change_threshold_percent: f64,
    pub report_windows: Vec<ReportWindow>,
    pub report_window_tolerance_minutes: u32,
    pub utc_offset_hours: i32,
    /// Path of the persisted state document.
    pub state_file: PathBuf,
}

impl Config {
    /// Build the configuration from the process environment.
    ///
    /// Missing transport credentials are an error; everything else falls back
    /// to documented defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let channel_access_token = require_credential("CHANNEL_ACCESS_TOKEN")?;
        let user_id = require_credential("USER_ID")?;

        let goldapi_key = env::var("GOLDAPI_KEY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let manual_trigger = env::var("MANUAL_TRIGGER")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false);

        let change_threshold_percent = env::var("CHANGE_THRESHOLD_PERCENT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CHANGE_THRESHOLD_PERCENT);

        let report_windows = match env::var("REPORT_WINDOWS") {
            Ok(raw) => {
                let mut windows = Vec::new();
                for spec in raw.split(',').filter(|s| !s.trim().is_empty()) {
                    let window =
                        ReportWindow::parse(spec).ok_or_else(|| ConfigError::InvalidValue {
                            name: "REPORT_WINDOWS",
                            value: spec.to_string(),
                        })?;
                    windows.push(window);
                }
                windows
            }
            // Hourly reports at the top of the hour
            Err(_) => vec![ReportWindow {
                hour: None,
                minute: 0,
            }],
        };

        let report_window_tolerance_minutes = env::var("REPORT_WINDOW_TOLERANCE_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_WINDOW_TOLERANCE_MINUTES);

        let utc_offset_hours = env::var("UTC_OFFSET_HOURS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_UTC_OFFSET_HOURS);

        let state_file = env::var("STATE_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("goldwatch_state.json"));

        Ok(Self {
            channel_access_token,
            user_id,
            goldapi_key,
            manual_trigger,
            change_threshold_percent,
            report_windows,
            report_window_tolerance_minutes,
            utc_offset_hours,
            state_file,
        })
    }

    /// The monitor's local timezone as a fixed offset.
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }
}

fn require_credential(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::MissingCredential(name)),
    }
}

/// Get the current environment name (defaults to "sandbox").
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}
