use crate::model::quote::{BookQuotes, ModelQuote};

/// Turn an up-probability into bids for both outcomes.
///
/// Each side bids its fair value less `margin`, never below the resting best
/// bid and never above the ask. Both asks are required; otherwise both sides
/// are absent.
pub fn bids_from_probability(book: &BookQuotes, p: f64, margin: f64) -> ModelQuote {
    let Some((ask_yes, ask_no)) = book.asks() else {
        return ModelQuote::absent();
    };

    let mut jy = p - margin;
    let mut jn = (1.0 - p) - margin;
    if let Some(bid) = book.bid_yes {
        jy = jy.max(bid);
    }
    if let Some(bid) = book.bid_no {
        jn = jn.max(bid);
    }

    ModelQuote {
        yes: Some(round4(jy.max(0.0).min(ask_yes))),
        no: Some(round4(jn.max(0.0).min(ask_no))),
    }
}

pub fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

pub fn round3(v: f64) -> f64 {
    (v * 1_000.0).round() / 1_000.0
}

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_ask_yields_absent_quote() {
        let book = BookQuotes::new(Some(0.5), None, Some(0.4), Some(0.4));
        assert!(bids_from_probability(&book, 0.6, 0.006).is_absent());
    }

    #[test]
    fn bid_floor_and_ask_cap() {
        let book = BookQuotes::new(Some(0.55), Some(0.48), Some(0.50), Some(0.44));
        let q = bids_from_probability(&book, 0.9, 0.006);
        // yes capped at ask, no floored at bid
        assert_eq!(q.yes, Some(0.55));
        assert_eq!(q.no, Some(0.44));
    }

    #[test]
    fn rounds_to_four_places() {
        assert!((round4(0.123456) - 0.1235).abs() < 1e-12);
        assert!((round2(-12.345) - -12.35).abs() < 1e-9);
        assert!((round3(1.103404) - 1.103).abs() < 1e-12);
    }
}
