use serde::Serialize;

/// Volatility reported when there are no usable returns to measure.
pub const EMPTY_WINDOW_SIGMA: f64 = 0.0001;

/// Features derived from the reference-price history. Replaced wholesale on
/// every recompute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalState {
    pub p_up: f64,
    pub lead_bps: f64,
    pub momentum_fast: f64,
    pub momentum_slow: f64,
    pub volatility: f64,
    pub rsi_normalized: f64,
}

impl SignalState {
    /// Cold-start state: no directional view.
    pub fn neutral(volatility: f64) -> Self {
        Self {
            p_up: 0.5,
            lead_bps: 0.0,
            momentum_fast: 0.0,
            momentum_slow: 0.0,
            volatility,
            rsi_normalized: 0.0,
        }
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::neutral(EMPTY_WINDOW_SIGMA)
    }
}
