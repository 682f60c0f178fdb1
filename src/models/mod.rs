//! Data model: price readings and persisted tracking state

pub mod price;
pub mod state;

pub use price::PriceReading;
pub use state::TrackedState;
