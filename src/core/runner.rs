//! One monitoring run, end to end
//!
//! acquire -> load state -> decide -> persist -> deliver. State is persisted
//! BEFORE any delivery attempt so a transport failure can neither lose the
//! observed price nor cause a duplicate alert on the next run.

use crate::acquisition::AcquisitionEngine;
use crate::config::Config;
use crate::decision::{self, message, Action, DecisionSettings};
use crate::notify::{LineNotifier, Notifier, NotifyError};
use crate::state::FileStateStore;
use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// How the run ended. Only `RunError` maps to a non-zero process exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A message was composed; `delivered` records the transport result.
    Notified { delivered: bool },
    /// No condition met; state persisted, nothing sent.
    Skipped,
    /// All providers failed, but the diagnostic notification went out.
    AcquisitionFailed,
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("all providers failed and the diagnostic could not be delivered: {0}")]
    DiagnosticDeliveryFailed(#[source] NotifyError),
}

pub struct Monitor {
    acquisition: AcquisitionEngine,
    store: FileStateStore,
    notifier: Arc<dyn Notifier>,
    settings: DecisionSettings,
    manual_trigger: bool,
    local_offset: FixedOffset,
}

impl Monitor {
    pub fn new(
        acquisition: AcquisitionEngine,
        store: FileStateStore,
        notifier: Arc<dyn Notifier>,
        settings: DecisionSettings,
        manual_trigger: bool,
        local_offset: FixedOffset,
    ) -> Self {
        Self {
            acquisition,
            store,
            notifier,
            settings,
            manual_trigger,
            local_offset,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            AcquisitionEngine::from_config(config),
            FileStateStore::new(config.state_file.clone()),
            Arc::new(LineNotifier::new(
                config.channel_access_token.clone(),
                config.user_id.clone(),
            )),
            DecisionSettings::from(config),
            config.manual_trigger,
            config.local_offset(),
        )
    }

    /// Execute one run at the current wall-clock time.
    pub async fn run(&self) -> Result<RunOutcome, RunError> {
        let now = Utc::now().with_timezone(&self.local_offset);
        self.run_at(now).await
    }

    /// Execute one run as of `now` (monitor-local time).
    pub async fn run_at(&self, now: DateTime<FixedOffset>) -> Result<RunOutcome, RunError> {
        let reading = match self.acquisition.acquire().await {
            Ok(reading) => reading,
            Err(failed) => {
                for f in &failed.failures {
                    warn!(provider = %f.provider, error = %f.failure, "provider exhausted");
                }
                let diagnostic = message::acquisition_failed(now, &failed.failures);
                return match self.notifier.push(&diagnostic).await {
                    Ok(()) => {
                        info!("acquisition-failure diagnostic delivered");
                        Ok(RunOutcome::AcquisitionFailed)
                    }
                    Err(e) => {
                        error!(error = %e, "failed to deliver acquisition-failure diagnostic");
                        Err(RunError::DiagnosticDeliveryFailed(e))
                    }
                };
            }
        };

        let today = now.date_naive();
        let prior = self.store.load(today);
        let decision =
            decision::evaluate(&reading, prior, now, self.manual_trigger, &self.settings);

        // Persist before delivery; a save failure is logged but the decision
        // was already reached, so the run continues.
        if let Err(e) = self.store.save(&decision.state) {
            error!(error = %e, "failed to persist tracking state");
        }

        match decision.action {
            Action::Skip => {
                info!(
                    price = reading.current_price,
                    pct_change = ?decision.pct_change,
                    "no notification condition met, state recorded"
                );
                Ok(RunOutcome::Skipped)
            }
            Action::Notify { message, kind } => {
                info!(
                    kind = ?kind,
                    alert = decision.alert,
                    scheduled = decision.scheduled,
                    "sending notification"
                );
                let delivered = match self.notifier.push(&message).await {
                    Ok(()) => true,
                    Err(e) => {
                        // State is already persisted; delivery failure is
                        // reported, not fatal.
                        error!(error = %e, "notification delivery failed");
                        false
                    }
                };
                Ok(RunOutcome::Notified { delivered })
            }
        }
    }
}
