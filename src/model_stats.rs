use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::pricing::ModelKind;

const WEIGHT_BASE: f64 = 0.8;
const WEIGHT_WIN_RATE_SLOPE: f64 = 0.4;
const WEIGHT_PNL_SCALE_USD: f64 = 200.0;
const WEIGHT_PNL_SLOPE: f64 = 0.15;
const WEIGHT_MIN: f64 = 0.7;
const WEIGHT_MAX: f64 = 1.3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelStats {
    pub trades: u32,
    pub wins: u32,
    pub pnl: f64,
}

impl ModelStats {
    pub fn losses(&self) -> u32 {
        self.trades.saturating_sub(self.wins)
    }

    /// Laplace-smoothed win rate; 0.5 with no history.
    pub fn smoothed_win_rate(&self) -> f64 {
        (self.wins as f64 + 1.0) / (self.trades as f64 + 2.0)
    }

    /// Ranking multiplier in `[0.7, 1.3]`; exactly 1.0 with no history.
    pub fn weight(&self) -> f64 {
        let pnl_adj = (self.pnl / WEIGHT_PNL_SCALE_USD).tanh() * WEIGHT_PNL_SLOPE;
        (WEIGHT_BASE + WEIGHT_WIN_RATE_SLOPE * self.smoothed_win_rate() + pnl_adj)
            .clamp(WEIGHT_MIN, WEIGHT_MAX)
    }
}

/// Realized track record per pricing model, fed by whoever trades on the
/// consensus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelScoreboard {
    stats: BTreeMap<ModelKind, ModelStats>,
}

impl ModelScoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_outcome(&mut self, model: ModelKind, pnl: f64) {
        if !pnl.is_finite() {
            tracing::warn!(model = model.label(), pnl, "Ignoring non-finite model outcome");
            return;
        }
        let entry = self.stats.entry(model).or_default();
        entry.trades = entry.trades.saturating_add(1);
        if pnl > 0.0 {
            entry.wins = entry.wins.saturating_add(1);
        }
        entry.pnl += pnl;
        tracing::info!(
            model = model.label(),
            trades = entry.trades,
            wins = entry.wins,
            pnl = entry.pnl,
            "Model outcome recorded"
        );
    }

    pub fn stats(&self, model: ModelKind) -> ModelStats {
        self.stats.get(&model).copied().unwrap_or_default()
    }

    pub fn weight(&self, model: ModelKind) -> f64 {
        self.stats(model).weight()
    }

    pub fn weights(&self) -> BTreeMap<ModelKind, f64> {
        ModelKind::ALL
            .into_iter()
            .map(|kind| (kind, self.weight(kind)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.stats.clear();
    }

    /// Missing file loads as an empty scoreboard.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let payload = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&payload)
            .with_context(|| format!("failed to parse model scoreboard {}", path.display()))
    }

    pub fn persist_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let payload =
            serde_json::to_string_pretty(self).context("failed to serialize model scoreboard")?;
        std::fs::write(path, payload)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stats_weigh_exactly_one() {
        assert_eq!(ModelStats::default().weight(), 1.0);
        assert_eq!(ModelScoreboard::new().weight(ModelKind::Regime), 1.0);
    }

    #[test]
    fn weight_is_bounded() {
        let hot = ModelStats {
            trades: 1000,
            wins: 1000,
            pnl: 1e6,
        };
        let cold = ModelStats {
            trades: 1000,
            wins: 0,
            pnl: -1e6,
        };
        assert!((hot.weight() - 1.3).abs() < 1e-12);
        assert!((cold.weight() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn record_outcome_counts_wins_and_pnl() {
        let mut board = ModelScoreboard::new();
        board.record_outcome(ModelKind::Trend, 5.0);
        board.record_outcome(ModelKind::Trend, -2.0);
        board.record_outcome(ModelKind::Trend, 0.0);
        board.record_outcome(ModelKind::Trend, f64::NAN);
        let s = board.stats(ModelKind::Trend);
        assert_eq!(s.trades, 3);
        assert_eq!(s.wins, 1);
        assert_eq!(s.losses(), 2);
        assert!((s.pnl - 3.0).abs() < 1e-12);
    }
}
