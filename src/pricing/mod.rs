pub mod blender;
pub mod book_skew;
pub mod lead_lag;
pub mod regime;
pub mod trend;

use serde::{Deserialize, Serialize};

use crate::config::ModelsConfig;
use crate::model::quote::{BookQuotes, ModelQuote};
use crate::model::signal::SignalState;

pub use blender::bids_from_probability;
pub use book_skew::BookSkewModel;
pub use lead_lag::LeadLagModel;
pub use regime::RegimeModel;
pub use trend::TrendModel;

/// The four quoting strategies, in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    #[serde(rename = "TA")]
    Trend,
    #[serde(rename = "LL")]
    LeadLag,
    #[serde(rename = "RG")]
    Regime,
    #[serde(rename = "BK")]
    BookSkew,
}

impl ModelKind {
    pub const ALL: [ModelKind; 4] = [
        ModelKind::Trend,
        ModelKind::LeadLag,
        ModelKind::Regime,
        ModelKind::BookSkew,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Trend => "TA",
            Self::LeadLag => "LL",
            Self::Regime => "RG",
            Self::BookSkew => "BK",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(label.trim()))
    }
}

/// One quote per model for a single market row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModelQuotes {
    #[serde(rename = "TA")]
    pub trend: ModelQuote,
    #[serde(rename = "LL")]
    pub lead_lag: ModelQuote,
    #[serde(rename = "RG")]
    pub regime: ModelQuote,
    #[serde(rename = "BK")]
    pub book_skew: ModelQuote,
}

impl ModelQuotes {
    pub fn get(&self, kind: ModelKind) -> &ModelQuote {
        match kind {
            ModelKind::Trend => &self.trend,
            ModelKind::LeadLag => &self.lead_lag,
            ModelKind::Regime => &self.regime,
            ModelKind::BookSkew => &self.book_skew,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (ModelKind, &ModelQuote)> + '_ {
        ModelKind::ALL.into_iter().map(move |kind| (kind, self.get(kind)))
    }
}

/// Runs every model against the same signal and book. Models do not see
/// each other's output.
#[derive(Debug, Clone)]
pub struct PricingModelSet {
    trend: TrendModel,
    lead_lag: LeadLagModel,
    regime: RegimeModel,
    book_skew: BookSkewModel,
}

impl PricingModelSet {
    pub fn new(cfg: &ModelsConfig) -> Self {
        Self {
            trend: TrendModel::new(cfg.trend.clone()),
            lead_lag: LeadLagModel::new(cfg.lead_lag.clone()),
            regime: RegimeModel::new(cfg.regime.clone()),
            book_skew: BookSkewModel::new(cfg.book_skew.clone()),
        }
    }

    pub fn quote_all(&self, signal: &SignalState, book: &BookQuotes) -> ModelQuotes {
        ModelQuotes {
            trend: self.trend.quote(signal, book),
            lead_lag: self.lead_lag.quote(signal, book),
            regime: self.regime.quote(signal, book),
            book_skew: self.book_skew.quote(book),
        }
    }

    pub fn trend(&self) -> &TrendModel {
        &self.trend
    }

    pub fn lead_lag(&self) -> &LeadLagModel {
        &self.lead_lag
    }

    pub fn regime(&self) -> &RegimeModel {
        &self.regime
    }

    pub fn book_skew(&self) -> &BookSkewModel {
        &self.book_skew
    }
}
