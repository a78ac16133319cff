use crate::config::BookSkewModelConfig;
use crate::model::quote::{BookQuotes, ModelQuote};
use crate::pricing::blender::bids_from_probability;

/// Reads direction from the book alone: the outcome with the tighter spread
/// is treated as the more contested, likelier one.
#[derive(Debug, Clone)]
pub struct BookSkewModel {
    cfg: BookSkewModelConfig,
}

impl BookSkewModel {
    pub fn new(cfg: BookSkewModelConfig) -> Self {
        Self { cfg }
    }

    /// `None` unless both asks are quoted.
    pub fn probability(&self, book: &BookQuotes) -> Option<f64> {
        let cfg = &self.cfg;
        let (ask_yes, ask_no) = book.asks()?;
        let sy = book
            .bid_yes
            .map(|bid| (ask_yes - bid).max(0.0))
            .unwrap_or(cfg.default_spread);
        let sn = book
            .bid_no
            .map(|bid| (ask_no - bid).max(0.0))
            .unwrap_or(cfg.default_spread);
        Some((0.5 + cfg.slope * (sn - sy)).clamp(cfg.p_min, cfg.p_max))
    }

    pub fn quote(&self, book: &BookQuotes) -> ModelQuote {
        match self.probability(book) {
            Some(p) => bids_from_probability(book, p, self.cfg.margin),
            None => ModelQuote::absent(),
        }
    }
}
