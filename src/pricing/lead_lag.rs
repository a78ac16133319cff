use crate::config::LeadLagModelConfig;
use crate::model::quote::{BookQuotes, ModelQuote};
use crate::model::signal::SignalState;
use crate::pricing::blender::bids_from_probability;

/// Leans toward the exchange price when it runs ahead of the composite.
#[derive(Debug, Clone)]
pub struct LeadLagModel {
    cfg: LeadLagModelConfig,
}

impl LeadLagModel {
    pub fn new(cfg: LeadLagModelConfig) -> Self {
        Self { cfg }
    }

    pub fn probability(&self, signal: &SignalState) -> f64 {
        let cfg = &self.cfg;
        let z = (signal.lead_bps / cfg.lead_scale_bps).clamp(-cfg.z_limit, cfg.z_limit);
        (0.5 + cfg.slope * z).clamp(cfg.p_min, cfg.p_max)
    }

    pub fn quote(&self, signal: &SignalState, book: &BookQuotes) -> ModelQuote {
        bids_from_probability(book, self.probability(signal), self.cfg.margin)
    }
}
