pub mod oscillator;
pub mod price_history;
pub mod volatility;

pub use price_history::{IngestOutcome, PriceHistoryBuffer};
