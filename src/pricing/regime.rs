use crate::config::RegimeModelConfig;
use crate::model::quote::{BookQuotes, ModelQuote};
use crate::model::signal::SignalState;
use crate::pricing::blender::bids_from_probability;

/// Blends trend-following with mean reversion, weighted by how much of the
/// recent movement was directional rather than noise.
#[derive(Debug, Clone)]
pub struct RegimeModel {
    cfg: RegimeModelConfig,
}

impl RegimeModel {
    pub fn new(cfg: RegimeModelConfig) -> Self {
        Self { cfg }
    }

    pub fn trend_weight(&self, signal: &SignalState) -> f64 {
        let trend = signal.momentum_fast.abs() + signal.momentum_slow.abs();
        let chop = signal.volatility;
        (trend / (trend + chop).max(1e-6))
            .clamp(self.cfg.trend_weight_min, self.cfg.trend_weight_max)
    }

    pub fn probability(&self, signal: &SignalState) -> f64 {
        let cfg = &self.cfg;
        let w = self.trend_weight(signal);
        let p_trend = signal.p_up.clamp(cfg.p_min, cfg.p_max);
        let p_mr = (0.5 - cfg.mean_reversion_slope * signal.rsi_normalized)
            .clamp(cfg.p_min, cfg.p_max);
        (w * p_trend + (1.0 - w) * p_mr).clamp(cfg.p_min, cfg.p_max)
    }

    pub fn quote(&self, signal: &SignalState, book: &BookQuotes) -> ModelQuote {
        bids_from_probability(book, self.probability(signal), self.cfg.margin)
    }
}
