use crate::config::TrendModelConfig;
use crate::model::quote::{BookQuotes, ModelQuote};
use crate::model::signal::SignalState;
use crate::pricing::blender::{bids_from_probability, round2};

/// Quotes straight off the estimator's `p_up`.
#[derive(Debug, Clone)]
pub struct TrendModel {
    cfg: TrendModelConfig,
}

impl TrendModel {
    pub fn new(cfg: TrendModelConfig) -> Self {
        Self { cfg }
    }

    pub fn probability(&self, signal: &SignalState) -> f64 {
        signal.p_up.clamp(self.cfg.p_min, self.cfg.p_max)
    }

    pub fn quote(&self, signal: &SignalState, book: &BookQuotes) -> ModelQuote {
        bids_from_probability(book, self.probability(signal), self.cfg.margin)
    }

    /// Lead in basis points, rounded for display next to the quote.
    pub fn lead_bps(&self, signal: &SignalState) -> f64 {
        round2(signal.lead_bps)
    }
}
