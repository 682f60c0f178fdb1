//! Run orchestration

pub mod runner;

pub use runner::{Monitor, RunError, RunOutcome};
