use serde::{Deserialize, Serialize};

use crate::model::quote::MarketQuoteRow;

/// One update from the market feed. The first row carries the reference
/// prices for the underlying.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unix seconds. Wall clock is used when absent.
    #[serde(default)]
    pub timestamp: Option<f64>,
    #[serde(default)]
    pub rows: Vec<MarketQuoteRow>,
}

impl Snapshot {
    pub fn primary(&self) -> Option<&MarketQuoteRow> {
        self.rows.first()
    }
}
