use crate::config::SignalConfig;
use crate::indicator::oscillator::{normalize_rsi, window_rsi};
use crate::indicator::volatility::log_return_std;
use crate::indicator::PriceHistoryBuffer;
use crate::model::signal::SignalState;

/// Turns the reference-price history into momentum, oscillator, volatility
/// and lead/lag features, and squashes their weighted sum into `p_up`.
///
/// Stateless apart from its configuration: computing twice over the same
/// history gives the same `SignalState`.
#[derive(Debug, Clone)]
pub struct MomentumSignalEstimator {
    cfg: SignalConfig,
}

impl MomentumSignalEstimator {
    pub fn new(cfg: SignalConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &SignalConfig {
        &self.cfg
    }

    pub fn compute(&self, history: &PriceHistoryBuffer) -> SignalState {
        let cfg = &self.cfg;
        let Some(latest) = history.latest() else {
            return SignalState::neutral(cfg.empty_sigma);
        };
        if history.len() < cfg.min_samples {
            tracing::debug!(
                samples = history.len(),
                required = cfg.min_samples,
                "Signal warming up"
            );
            return SignalState::neutral(cfg.empty_sigma);
        }

        let p_now = latest.price;
        let rf = log_momentum(p_now, history.price_ago(cfg.fast_lookback_secs));
        let rs = log_momentum(p_now, history.price_ago(cfg.slow_lookback_secs));

        let rsi = window_rsi(
            history
                .window(cfg.oscillator_window_secs)
                .map(|s| s.price),
        );
        let rsi_n = normalize_rsi(rsi);

        let sigma = log_return_std(
            history
                .window(cfg.volatility_window_secs)
                .map(|s| s.price),
        )
        .unwrap_or(cfg.empty_sigma);

        let lead = match (latest.composite, latest.exchange) {
            (Some(a), Some(b)) if a > 0.0 => (b - a) / a,
            _ => 0.0,
        };

        let score = cfg.weight_fast * rf
            + cfg.weight_slow * rs
            + cfg.weight_oscillator * rsi_n
            + cfg.weight_lead * lead;
        let denom = cfg.sigma_scale * sigma.max(cfg.sigma_floor);
        let z = (score / denom.max(cfg.denom_floor)).clamp(-cfg.z_limit, cfg.z_limit);
        let p_up = sigmoid(z);

        tracing::trace!(p_up, z, rf, rs, rsi_n, sigma, lead, "Signal computed");

        SignalState {
            p_up,
            lead_bps: lead * 10_000.0,
            momentum_fast: rf,
            momentum_slow: rs,
            volatility: sigma,
            rsi_normalized: rsi_n,
        }
    }
}

fn log_momentum(p_now: f64, p_then: Option<f64>) -> f64 {
    match p_then {
        Some(p) if p.is_finite() && p > 0.0 => (p_now / p).ln(),
        _ => 0.0,
    }
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
