use serde::Serialize;

use crate::config::Config;
use crate::consensus::{ConsensusResult, ConsensusScorer};
use crate::indicator::{IngestOutcome, PriceHistoryBuffer};
use crate::model::quote::{BookQuotes, MarketQuoteRow};
use crate::model::sample::ReferencePrices;
use crate::model::signal::SignalState;
use crate::model::snapshot::Snapshot;
use crate::model_stats::ModelScoreboard;
use crate::pricing::{ModelKind, ModelQuotes, PricingModelSet};
use crate::signal::MomentumSignalEstimator;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowAnalysis {
    pub market_id: String,
    pub market_name: String,
    pub quotes: ModelQuotes,
    /// Trend model's lead diagnostic, bps rounded to 2 places.
    pub trend_lead_bps: f64,
    pub consensus: ConsensusResult,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotAnalysis {
    pub timestamp: f64,
    pub ingest: IngestOutcome,
    pub signal: SignalState,
    pub rows: Vec<RowAnalysis>,
}

/// Single-instrument signal and pricing engine.
///
/// Owns the reference-price history and the last computed signal. Not
/// `Sync`-shared: drive it from one task and feed snapshots in time order.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    config: Config,
    history: PriceHistoryBuffer,
    estimator: MomentumSignalEstimator,
    models: PricingModelSet,
    scorer: ConsensusScorer,
    scoreboard: ModelScoreboard,
    last_signal: SignalState,
}

impl SignalEngine {
    pub fn new(config: Config) -> Self {
        Self {
            history: PriceHistoryBuffer::new(&config.history),
            estimator: MomentumSignalEstimator::new(config.signal.clone()),
            models: PricingModelSet::new(&config.models),
            scorer: ConsensusScorer::new(config.consensus.clone()),
            scoreboard: ModelScoreboard::new(),
            last_signal: SignalState::neutral(config.signal.empty_sigma),
            config,
        }
    }

    pub fn with_scoreboard(mut self, scoreboard: ModelScoreboard) -> Self {
        self.scoreboard = scoreboard;
        self
    }

    /// Drop all history and return to the cold-start signal. The scoreboard
    /// is kept.
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_signal = SignalState::neutral(self.config.signal.empty_sigma);
    }

    pub fn ingest_reference(&mut self, row: &MarketQuoteRow, now: f64) -> IngestOutcome {
        self.history.ingest(ReferencePrices::from_row(row), now)
    }

    /// Recompute the signal from the current history and remember it.
    pub fn compute_signal(&mut self) -> SignalState {
        self.last_signal = self.estimator.compute(&self.history);
        self.last_signal
    }

    /// Quote every model and reduce to a consensus, using the last signal.
    pub fn price_row(&self, row: &MarketQuoteRow) -> RowAnalysis {
        let book = BookQuotes::from_row(row);
        let quotes = self.models.quote_all(&self.last_signal, &book);
        let consensus = self.scorer.summarize(&quotes, &self.scoreboard);
        RowAnalysis {
            market_id: row.market_id.clone(),
            market_name: row.market_name.clone(),
            quotes,
            trend_lead_bps: self.models.trend().lead_bps(&self.last_signal),
            consensus,
        }
    }

    /// Full per-snapshot pass: one history update from the primary row, one
    /// signal recompute, then pricing for every row.
    pub fn on_snapshot(&mut self, snapshot: &Snapshot) -> SnapshotAnalysis {
        let now = snapshot.timestamp.unwrap_or_else(wall_clock_secs);
        let ingest = match snapshot.primary() {
            Some(row) => self.ingest_reference(row, now),
            None => self.history.ingest(ReferencePrices::default(), now),
        };
        let signal = self.compute_signal();
        let rows = snapshot.rows.iter().map(|row| self.price_row(row)).collect();
        tracing::debug!(
            now,
            ?ingest,
            samples = self.history.len(),
            p_up = signal.p_up,
            "Snapshot processed"
        );
        SnapshotAnalysis {
            timestamp: now,
            ingest,
            signal,
            rows,
        }
    }

    pub fn record_model_outcome(&mut self, model: ModelKind, pnl: f64) {
        self.scoreboard.record_outcome(model, pnl);
    }

    pub fn last_signal(&self) -> SignalState {
        self.last_signal
    }

    pub fn history(&self) -> &PriceHistoryBuffer {
        &self.history
    }

    pub fn models(&self) -> &PricingModelSet {
        &self.models
    }

    pub fn scoreboard(&self) -> &ModelScoreboard {
        &self.scoreboard
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn wall_clock_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}
