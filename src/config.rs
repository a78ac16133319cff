use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub history: HistoryConfig,
    pub signal: SignalConfig,
    pub models: ModelsConfig,
    pub consensus: ConsensusConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Samples older than this (relative to the newest) are evicted.
    pub horizon_secs: f64,
    pub composite_weight: f64,
    pub exchange_weight: f64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            horizon_secs: 700.0,
            composite_weight: 0.4,
            exchange_weight: 0.6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Below this many samples the estimator reports the neutral state.
    pub min_samples: usize,
    pub fast_lookback_secs: f64,
    pub slow_lookback_secs: f64,
    pub oscillator_window_secs: f64,
    pub volatility_window_secs: f64,
    pub weight_fast: f64,
    pub weight_slow: f64,
    pub weight_oscillator: f64,
    pub weight_lead: f64,
    pub sigma_scale: f64,
    pub sigma_floor: f64,
    pub empty_sigma: f64,
    pub denom_floor: f64,
    pub z_limit: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            min_samples: 5,
            fast_lookback_secs: 20.0,
            slow_lookback_secs: 120.0,
            oscillator_window_secs: 30.0,
            volatility_window_secs: 60.0,
            weight_fast: 1.8,
            weight_slow: 1.2,
            weight_oscillator: 0.6,
            weight_lead: 0.8,
            sigma_scale: 2.5,
            sigma_floor: 0.00008,
            empty_sigma: 0.0001,
            denom_floor: 1e-6,
            z_limit: 8.0,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub trend: TrendModelConfig,
    pub lead_lag: LeadLagModelConfig,
    pub regime: RegimeModelConfig,
    pub book_skew: BookSkewModelConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrendModelConfig {
    pub p_min: f64,
    pub p_max: f64,
    pub margin: f64,
}

impl Default for TrendModelConfig {
    fn default() -> Self {
        Self {
            p_min: 0.01,
            p_max: 0.99,
            margin: 0.006,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LeadLagModelConfig {
    /// Basis points of lead that map to one unit of z.
    pub lead_scale_bps: f64,
    pub z_limit: f64,
    pub slope: f64,
    pub p_min: f64,
    pub p_max: f64,
    pub margin: f64,
}

impl Default for LeadLagModelConfig {
    fn default() -> Self {
        Self {
            lead_scale_bps: 35.0,
            z_limit: 1.5,
            slope: 0.18,
            p_min: 0.02,
            p_max: 0.98,
            margin: 0.006,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegimeModelConfig {
    pub trend_weight_min: f64,
    pub trend_weight_max: f64,
    pub mean_reversion_slope: f64,
    pub p_min: f64,
    pub p_max: f64,
    pub margin: f64,
}

impl Default for RegimeModelConfig {
    fn default() -> Self {
        Self {
            trend_weight_min: 0.1,
            trend_weight_max: 0.9,
            mean_reversion_slope: 0.35,
            p_min: 0.02,
            p_max: 0.98,
            margin: 0.0065,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookSkewModelConfig {
    pub slope: f64,
    /// Spread assumed for a side that has no resting bid.
    pub default_spread: f64,
    pub p_min: f64,
    pub p_max: f64,
    pub margin: f64,
}

impl Default for BookSkewModelConfig {
    fn default() -> Self {
        Self {
            slope: 0.12,
            default_spread: 0.01,
            p_min: 0.02,
            p_max: 0.98,
            margin: 0.006,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsensusConfig {
    pub strength_weight: f64,
    pub agreement_weight: f64,
    /// Rank models by strength scaled with their track record.
    pub performance_weighting: bool,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            strength_weight: 0.6,
            agreement_weight: 0.4,
            performance_weighting: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

pub fn config_path() -> PathBuf {
    std::env::var("BQ_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::load_from_path(&config_path())
    }

    /// Missing file means built-in defaults; a present but broken file is an error.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let h = &self.history;
        if !(h.horizon_secs > 0.0) {
            bail!("history.horizon_secs must be > 0, got {}", h.horizon_secs);
        }
        if h.composite_weight < 0.0
            || h.exchange_weight < 0.0
            || (h.composite_weight + h.exchange_weight - 1.0).abs() > 1e-9
        {
            bail!(
                "history weights must be non-negative and sum to 1, got {} + {}",
                h.composite_weight,
                h.exchange_weight
            );
        }

        let s = &self.signal;
        for (name, secs) in [
            ("signal.fast_lookback_secs", s.fast_lookback_secs),
            ("signal.slow_lookback_secs", s.slow_lookback_secs),
            ("signal.oscillator_window_secs", s.oscillator_window_secs),
            ("signal.volatility_window_secs", s.volatility_window_secs),
        ] {
            if !(secs > 0.0) {
                bail!("{} must be > 0, got {}", name, secs);
            }
            if secs > h.horizon_secs {
                bail!(
                    "{} ({}) exceeds history.horizon_secs ({})",
                    name,
                    secs,
                    h.horizon_secs
                );
            }
        }
        if s.min_samples == 0 {
            bail!("signal.min_samples must be > 0");
        }
        if !(s.sigma_floor > 0.0) || !(s.denom_floor > 0.0) || !(s.z_limit > 0.0) {
            bail!("signal floors and z_limit must be > 0");
        }
        for (name, value) in [
            ("signal.weight_fast", s.weight_fast),
            ("signal.weight_slow", s.weight_slow),
            ("signal.weight_oscillator", s.weight_oscillator),
            ("signal.weight_lead", s.weight_lead),
            ("signal.sigma_scale", s.sigma_scale),
            ("signal.empty_sigma", s.empty_sigma),
        ] {
            if !value.is_finite() {
                bail!("{} must be finite, got {}", name, value);
            }
        }

        let m = &self.models;
        check_range("models.trend", m.trend.p_min, m.trend.p_max)?;
        check_range("models.lead_lag", m.lead_lag.p_min, m.lead_lag.p_max)?;
        check_range("models.regime", m.regime.p_min, m.regime.p_max)?;
        check_range(
            "models.regime trend weight",
            m.regime.trend_weight_min,
            m.regime.trend_weight_max,
        )?;
        check_range("models.book_skew", m.book_skew.p_min, m.book_skew.p_max)?;
        if !(m.lead_lag.lead_scale_bps > 0.0) {
            bail!("models.lead_lag.lead_scale_bps must be > 0");
        }
        if !(m.lead_lag.z_limit > 0.0) {
            bail!("models.lead_lag.z_limit must be > 0, got {}", m.lead_lag.z_limit);
        }
        for (name, value) in [
            ("models.lead_lag.slope", m.lead_lag.slope),
            ("models.regime.mean_reversion_slope", m.regime.mean_reversion_slope),
            ("models.book_skew.slope", m.book_skew.slope),
            ("models.book_skew.default_spread", m.book_skew.default_spread),
            ("models.trend.margin", m.trend.margin),
            ("models.lead_lag.margin", m.lead_lag.margin),
            ("models.regime.margin", m.regime.margin),
            ("models.book_skew.margin", m.book_skew.margin),
            ("consensus.strength_weight", self.consensus.strength_weight),
            ("consensus.agreement_weight", self.consensus.agreement_weight),
        ] {
            if !value.is_finite() {
                bail!("{} must be finite, got {}", name, value);
            }
        }
        Ok(())
    }
}

fn check_range(name: &str, lo: f64, hi: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
        bail!("{} range [{}, {}] must satisfy 0 <= min <= max <= 1", name, lo, hi);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let toml_str = r#"
[history]
horizon_secs = 900.0

[models.regime]
margin = 0.007

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert!((config.history.horizon_secs - 900.0).abs() < f64::EPSILON);
        assert!((config.history.composite_weight - 0.4).abs() < f64::EPSILON);
        assert!((config.models.regime.margin - 0.007).abs() < f64::EPSILON);
        assert!((config.models.trend.margin - 0.006).abs() < f64::EPSILON);
        assert_eq!(config.signal.min_samples, 5);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn validate_rejects_bad_weights() {
        let mut config = Config::default();
        config.history.exchange_weight = 0.7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_inverted_clamp() {
        let mut config = Config::default();
        config.models.lead_lag.p_min = 0.9;
        config.models.lead_lag.p_max = 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_window_beyond_horizon() {
        let mut config = Config::default();
        config.signal.slow_lookback_secs = 800.0;
        assert!(config.validate().is_err());
    }
}
