//! Goldwatch
//!
//! Run-to-completion gold price monitor. An external scheduler (cron,
//! GitHub Actions) invokes this binary every few minutes; each run acquires
//! the spot price, updates persisted tracking state and pushes a LINE
//! notification when a report window or price-change threshold is hit.

use dotenvy::dotenv;
use goldwatch::config::{self, Config};
use goldwatch::core::{Monitor, RunOutcome};
use goldwatch::logging;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    dotenv().ok();
    logging::init_logging();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!(environment = %config::get_environment(), "Starting goldwatch");
    info!(
        threshold = config.change_threshold_percent,
        windows = config.report_windows.len(),
        tolerance_minutes = config.report_window_tolerance_minutes,
        manual_trigger = config.manual_trigger,
        "change threshold {}%, {} report window(s)",
        config.change_threshold_percent,
        config.report_windows.len()
    );

    let monitor = Monitor::from_config(&config);
    match monitor.run().await {
        Ok(RunOutcome::Notified { delivered: true }) => {
            info!("run complete, notification delivered");
        }
        Ok(RunOutcome::Notified { delivered: false }) => {
            warn!("run complete, but notification delivery failed (state already persisted)");
        }
        Ok(RunOutcome::Skipped) => {
            info!("run complete, no notification needed");
        }
        Ok(RunOutcome::AcquisitionFailed) => {
            warn!("run complete: acquisition failed, diagnostic delivered");
        }
        Err(e) => {
            error!(error = %e, "run failed: {}", e);
            std::process::exit(1);
        }
    }
}
