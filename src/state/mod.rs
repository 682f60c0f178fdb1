//! Durable state persistence
//!
//! One JSON document, fully overwritten on save. A missing or corrupt file
//! is never fatal: the run simply proceeds as if there were no prior state.

use crate::models::TrackedState;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state file io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("state serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the persisted state, applying the day-boundary rule for `today`.
    ///
    /// Missing file, unreadable file and corrupt JSON all degrade to an
    /// all-absent state.
    pub fn load(&self, today: NaiveDate) -> TrackedState {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no prior state file, starting fresh");
                return TrackedState::default();
            }
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file unreadable, treating as absent"
                );
                return TrackedState::default();
            }
        };

        let mut state: TrackedState = match serde_json::from_str(&raw) {
            Ok(state) => state,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "state file corrupt, treating as absent"
                );
                return TrackedState::default();
            }
        };

        state.roll_over(today);
        state
    }

    /// Persist the state with a full overwrite: write a sibling temp file,
    /// then rename over the target so readers never see a partial document.
    pub fn save(&self, state: &TrackedState) -> Result<(), StateError> {
        let json = serde_json::to_string_pretty(state)?;

        let mut tmp = self.path.clone();
        let mut tmp_name = tmp.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        tmp_name.push(".tmp");
        tmp.set_file_name(tmp_name);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
