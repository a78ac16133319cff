use std::collections::VecDeque;

use serde::Serialize;

use crate::config::HistoryConfig;
use crate::model::sample::{PriceSample, ReferencePrices};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestOutcome {
    Appended,
    /// Neither reference source produced a usable price. Eviction still ran.
    NoPrice,
    /// Timestamp older than the newest retained sample; buffer untouched.
    OutOfOrder,
    /// Timestamp was NaN or infinite; buffer untouched.
    InvalidTimestamp,
}

/// Time-bounded history of blended reference prices, oldest first.
///
/// Every retained sample is at most `horizon_secs` older than the last
/// accepted timestamp. Size is bounded only by arrival rate over that window.
#[derive(Debug, Clone)]
pub struct PriceHistoryBuffer {
    horizon_secs: f64,
    composite_weight: f64,
    exchange_weight: f64,
    samples: VecDeque<PriceSample>,
}

impl PriceHistoryBuffer {
    pub fn new(cfg: &HistoryConfig) -> Self {
        Self {
            horizon_secs: cfg.horizon_secs,
            composite_weight: cfg.composite_weight,
            exchange_weight: cfg.exchange_weight,
            samples: VecDeque::new(),
        }
    }

    pub fn ingest(&mut self, prices: ReferencePrices, now: f64) -> IngestOutcome {
        if !now.is_finite() {
            return IngestOutcome::InvalidTimestamp;
        }
        if let Some(newest) = self.samples.back() {
            if now < newest.timestamp {
                tracing::debug!(
                    now,
                    newest = newest.timestamp,
                    "Rejecting out-of-order reference sample"
                );
                return IngestOutcome::OutOfOrder;
            }
        }

        let outcome = match prices.to_sample(now, self.composite_weight, self.exchange_weight) {
            Some(sample) => {
                self.samples.push_back(sample);
                IngestOutcome::Appended
            }
            None => IngestOutcome::NoPrice,
        };
        self.evict_before(now - self.horizon_secs);
        outcome
    }

    fn evict_before(&mut self, keep_after: f64) {
        while self
            .samples
            .front()
            .map(|s| s.timestamp < keep_after)
            .unwrap_or(false)
        {
            let _ = self.samples.pop_front();
        }
    }

    /// Price of the newest sample at least `secs` old relative to the newest
    /// sample, falling back to the oldest retained one.
    pub fn price_ago(&self, secs: f64) -> Option<f64> {
        let newest = self.samples.back()?.timestamp;
        self.samples
            .iter()
            .rev()
            .find(|s| newest - s.timestamp >= secs)
            .or_else(|| self.samples.front())
            .map(|s| s.price)
    }

    /// Samples no older than `secs` relative to the newest sample, oldest first.
    pub fn window(&self, secs: f64) -> impl Iterator<Item = &PriceSample> + '_ {
        let newest = self.samples.back().map(|s| s.timestamp).unwrap_or(0.0);
        self.samples
            .iter()
            .skip_while(move |s| newest - s.timestamp > secs)
    }

    pub fn latest(&self) -> Option<&PriceSample> {
        self.samples.back()
    }

    pub fn oldest(&self) -> Option<&PriceSample> {
        self.samples.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceSample> + '_ {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn horizon_secs(&self) -> f64 {
        self.horizon_secs
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> PriceHistoryBuffer {
        PriceHistoryBuffer::new(&HistoryConfig::default())
    }

    fn px(p: f64) -> ReferencePrices {
        ReferencePrices::new(Some(p), None)
    }

    #[test]
    fn price_ago_on_empty_is_none() {
        assert_eq!(buffer().price_ago(20.0), None);
    }

    #[test]
    fn price_ago_falls_back_to_oldest() {
        let mut buf = buffer();
        buf.ingest(px(100.0), 0.0);
        buf.ingest(px(101.0), 5.0);
        buf.ingest(px(102.0), 10.0);
        assert_eq!(buf.price_ago(60.0), Some(100.0));
    }

    #[test]
    fn price_ago_picks_newest_qualifying_sample() {
        let mut buf = buffer();
        for (t, p) in [(0.0, 100.0), (5.0, 101.0), (10.0, 102.0), (25.0, 103.0)] {
            buf.ingest(px(p), t);
        }
        // newest = 25: ages are 25, 20, 15, 0
        assert_eq!(buf.price_ago(20.0), Some(101.0));
        assert_eq!(buf.price_ago(0.0), Some(103.0));
    }

    #[test]
    fn window_keeps_boundary_sample() {
        let mut buf = buffer();
        for t in [0.0, 10.0, 30.0, 40.0] {
            buf.ingest(px(100.0 + t), t);
        }
        let ts: Vec<f64> = buf.window(30.0).map(|s| s.timestamp).collect();
        assert_eq!(ts, vec![10.0, 30.0, 40.0]);
    }

    #[test]
    fn no_price_still_evicts() {
        let mut buf = buffer();
        buf.ingest(px(100.0), 0.0);
        let outcome = buf.ingest(ReferencePrices::default(), 701.0);
        assert_eq!(outcome, IngestOutcome::NoPrice);
        assert!(buf.is_empty());
    }
}
