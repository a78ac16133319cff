use serde::{Deserialize, Serialize};

use crate::model::sample::positive;

/// Per-market row as delivered by the snapshot feed. Unknown fields are
/// ignored; every numeric field may be missing or null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketQuoteRow {
    #[serde(default)]
    pub market_id: String,
    #[serde(default)]
    pub market_name: String,
    #[serde(default)]
    pub ask_yes: Option<f64>,
    #[serde(default)]
    pub ask_no: Option<f64>,
    #[serde(default)]
    pub bid_yes: Option<f64>,
    #[serde(default)]
    pub bid_no: Option<f64>,
    #[serde(default)]
    pub btc_current: Option<f64>,
    #[serde(default)]
    pub btc_current_binance: Option<f64>,
}

/// Validated top-of-book for one binary market. A side is `Some` only when
/// it carries a finite price above zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BookQuotes {
    pub ask_yes: Option<f64>,
    pub ask_no: Option<f64>,
    pub bid_yes: Option<f64>,
    pub bid_no: Option<f64>,
}

impl BookQuotes {
    pub fn new(
        ask_yes: Option<f64>,
        ask_no: Option<f64>,
        bid_yes: Option<f64>,
        bid_no: Option<f64>,
    ) -> Self {
        Self {
            ask_yes: positive(ask_yes),
            ask_no: positive(ask_no),
            bid_yes: positive(bid_yes),
            bid_no: positive(bid_no),
        }
    }

    pub fn from_row(row: &MarketQuoteRow) -> Self {
        Self::new(row.ask_yes, row.ask_no, row.bid_yes, row.bid_no)
    }

    pub fn asks(&self) -> Option<(f64, f64)> {
        Some((self.ask_yes?, self.ask_no?))
    }
}

/// Two-sided bid suggestion produced by a pricing model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ModelQuote {
    pub yes: Option<f64>,
    pub no: Option<f64>,
}

impl ModelQuote {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.yes.is_none() && self.no.is_none()
    }

    /// Both sides, when both are present and finite.
    pub fn pair(&self) -> Option<(f64, f64)> {
        match (self.yes, self.no) {
            (Some(y), Some(n)) if y.is_finite() && n.is_finite() => Some((y, n)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_deserializes_from_camel_case_and_ignores_extras() {
        let row: MarketQuoteRow = serde_json::from_str(
            r#"{"marketId":"m1","marketName":"BTC up?","askYes":0.55,"askNo":null,
                "bidYes":0.5,"btcCurrent":64000.5,"btcTarget":63900.0}"#,
        )
        .unwrap();
        assert_eq!(row.market_id, "m1");
        assert_eq!(row.ask_yes, Some(0.55));
        assert_eq!(row.ask_no, None);
        assert_eq!(row.bid_no, None);
        assert_eq!(row.btc_current, Some(64000.5));
    }

    #[test]
    fn book_drops_zero_and_nan_sides() {
        let book = BookQuotes::new(Some(0.55), Some(0.0), Some(f64::NAN), Some(0.4));
        assert_eq!(book.ask_yes, Some(0.55));
        assert_eq!(book.ask_no, None);
        assert_eq!(book.bid_yes, None);
        assert_eq!(book.bid_no, Some(0.4));
        assert!(book.asks().is_none());
    }
}
