use serde::Serialize;

use crate::model::quote::MarketQuoteRow;

/// One accepted reference-price observation. Never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceSample {
    pub timestamp: f64,
    pub price: f64,
    pub composite: Option<f64>,
    pub exchange: Option<f64>,
}

/// The two reference prices carried by the primary market row, already
/// filtered down to finite values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReferencePrices {
    pub composite: Option<f64>,
    pub exchange: Option<f64>,
}

impl ReferencePrices {
    pub fn new(composite: Option<f64>, exchange: Option<f64>) -> Self {
        Self {
            composite: finite(composite),
            exchange: finite(exchange),
        }
    }

    pub fn from_row(row: &MarketQuoteRow) -> Self {
        Self::new(row.btc_current, row.btc_current_binance)
    }

    /// Weighted blend when both sources quote, otherwise whichever one does.
    /// Returns `None` when the result is not a usable positive price.
    pub fn blended(&self, composite_weight: f64, exchange_weight: f64) -> Option<f64> {
        let p = match (self.composite, self.exchange) {
            (Some(c), Some(e)) => composite_weight * c + exchange_weight * e,
            (Some(c), None) => c,
            (None, Some(e)) => e,
            (None, None) => return None,
        };
        (p.is_finite() && p > 0.0).then_some(p)
    }

    pub fn to_sample(
        self,
        timestamp: f64,
        composite_weight: f64,
        exchange_weight: f64,
    ) -> Option<PriceSample> {
        let price = self.blended(composite_weight, exchange_weight)?;
        Some(PriceSample {
            timestamp,
            price,
            composite: self.composite,
            exchange: self.exchange,
        })
    }
}

pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

pub(crate) fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_uses_both_sources_when_present() {
        let prices = ReferencePrices::new(Some(100.0), Some(110.0));
        let p = prices.blended(0.4, 0.6).unwrap();
        assert!((p - 106.0).abs() < 1e-9);
    }

    #[test]
    fn blend_falls_back_to_single_source() {
        assert_eq!(ReferencePrices::new(Some(99.0), None).blended(0.4, 0.6), Some(99.0));
        assert_eq!(ReferencePrices::new(None, Some(101.0)).blended(0.4, 0.6), Some(101.0));
    }

    #[test]
    fn non_finite_sources_are_dropped() {
        let prices = ReferencePrices::new(Some(f64::NAN), Some(f64::INFINITY));
        assert_eq!(prices.composite, None);
        assert_eq!(prices.exchange, None);
        assert_eq!(prices.blended(0.4, 0.6), None);
    }

    #[test]
    fn non_positive_blend_is_rejected() {
        let prices = ReferencePrices::new(Some(0.0), None);
        assert!(prices.to_sample(1.0, 0.4, 0.6).is_none());
    }
}
