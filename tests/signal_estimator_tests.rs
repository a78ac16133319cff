use binary_quant::config::{HistoryConfig, SignalConfig};
use binary_quant::indicator::PriceHistoryBuffer;
use binary_quant::model::sample::ReferencePrices;
use binary_quant::signal::{sigmoid, MomentumSignalEstimator};

fn history(points: &[(f64, f64)]) -> PriceHistoryBuffer {
    let mut buf = PriceHistoryBuffer::new(&HistoryConfig::default());
    for &(t, p) in points {
        buf.ingest(ReferencePrices::new(Some(p), None), t);
    }
    buf
}

fn estimator() -> MomentumSignalEstimator {
    MomentumSignalEstimator::new(SignalConfig::default())
}

#[test]
fn cold_start_with_four_samples_is_neutral() {
    let buf = history(&[(0.0, 100.0), (1.0, 120.0), (2.0, 90.0), (3.0, 130.0)]);
    let s = estimator().compute(&buf);
    assert_eq!(s.p_up, 0.5);
    assert_eq!(s.lead_bps, 0.0);
    assert_eq!(s.momentum_fast, 0.0);
    assert_eq!(s.momentum_slow, 0.0);
    assert_eq!(s.rsi_normalized, 0.0);
}

#[test]
fn compute_is_idempotent() {
    let buf = history(&[
        (0.0, 100.0),
        (4.0, 100.4),
        (9.0, 99.8),
        (15.0, 101.2),
        (22.0, 100.9),
        (30.0, 101.7),
    ]);
    let est = estimator();
    assert_eq!(est.compute(&buf), est.compute(&buf));
}

#[test]
/// Steady climb from 100 to 103 over 25s: fast momentum is measured against
/// the sample 20s back (101) and the probability leans up.
fn upward_drift_pushes_p_up_above_half() {
    let buf = history(&[
        (0.0, 100.0),
        (5.0, 101.0),
        (10.0, 101.5),
        (15.0, 102.0),
        (20.0, 102.5),
        (25.0, 103.0),
    ]);
    let s = estimator().compute(&buf);
    assert!((s.momentum_fast - (103.0f64 / 101.0).ln()).abs() < 1e-12);
    assert!((s.momentum_fast - 0.0196).abs() < 1e-3);
    assert!((s.momentum_slow - (103.0f64 / 100.0).ln()).abs() < 1e-12);
    assert!((s.rsi_normalized - 1.0).abs() < 1e-12);
    assert!(s.volatility > 0.0);
    assert!(s.p_up > 0.5);
    assert!(s.p_up < 1.0);
}

#[test]
fn downward_drift_pushes_p_up_below_half() {
    let buf = history(&[
        (0.0, 103.0),
        (5.0, 102.5),
        (10.0, 102.0),
        (15.0, 101.0),
        (20.0, 100.5),
        (25.0, 100.0),
    ]);
    let s = estimator().compute(&buf);
    assert!(s.momentum_fast < 0.0);
    assert!(s.rsi_normalized < 0.0);
    assert!(s.p_up < 0.5);
}

#[test]
fn flat_window_reads_neutral_oscillator() {
    let buf = history(&[
        (0.0, 100.0),
        (5.0, 100.0),
        (10.0, 100.0),
        (15.0, 100.0),
        (20.0, 100.0),
    ]);
    let s = estimator().compute(&buf);
    assert_eq!(s.rsi_normalized, 0.0);
    assert_eq!(s.volatility, 0.0);
    assert_eq!(s.p_up, 0.5);
}

#[test]
/// Exchange quoting 50bps over the composite with a flat blend saturates z.
fn exchange_lead_is_reported_in_bps() {
    let mut buf = PriceHistoryBuffer::new(&HistoryConfig::default());
    for t in [0.0, 2.0, 4.0, 6.0, 8.0] {
        buf.ingest(ReferencePrices::new(Some(100.0), Some(100.5)), t);
    }
    let s = estimator().compute(&buf);
    assert!((s.lead_bps - 50.0).abs() < 1e-9);
    assert!((s.p_up - sigmoid(8.0)).abs() < 1e-12);
}

#[test]
fn lead_needs_both_sources() {
    let mut buf = PriceHistoryBuffer::new(&HistoryConfig::default());
    for t in [0.0, 2.0, 4.0, 6.0] {
        buf.ingest(ReferencePrices::new(Some(100.0), Some(101.0)), t);
    }
    buf.ingest(ReferencePrices::new(None, Some(101.0)), 8.0);
    let s = estimator().compute(&buf);
    assert_eq!(s.lead_bps, 0.0);
}

#[test]
/// Samples further apart than the volatility window leave no returns to
/// measure; sigma falls back to the empty-window constant.
fn sparse_history_uses_empty_window_sigma() {
    let buf = history(&[
        (0.0, 100.0),
        (100.0, 101.0),
        (200.0, 102.0),
        (300.0, 103.0),
        (400.0, 104.0),
    ]);
    let s = estimator().compute(&buf);
    assert_eq!(s.volatility, 0.0001);
    assert_eq!(s.rsi_normalized, 0.0);
    assert!(s.p_up > 0.5);
}
