//! Goldwatch - gold spot price monitor with LINE push notifications
//!
//! Designed as a run-to-completion batch job: an external scheduler invokes
//! the binary every few minutes, each run acquires the current XAU/USD price
//! from a chain of upstream providers, compares it against persisted tracking
//! state and pushes a notification when a report window or price-change
//! threshold is hit.

pub mod acquisition;
pub mod config;
pub mod core;
pub mod decision;
pub mod logging;
pub mod models;
pub mod notify;
pub mod providers;
pub mod state;
