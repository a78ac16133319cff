use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::ConsensusConfig;
use crate::model_stats::ModelScoreboard;
use crate::pricing::blender::round3;
use crate::pricing::{ModelKind, ModelQuotes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }

}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsensusResult {
    /// `"<model>:<UP|DOWN> <confidence>%"`, or `"-"` when no model quoted.
    pub label: String,
    /// `1..=99` for a real verdict, `0` for the sentinel.
    pub confidence_percent: u8,
    pub best: Option<ModelKind>,
    pub direction: Option<Direction>,
    /// Ranking weights, rounded to 3 decimals for reporting.
    pub weights: BTreeMap<ModelKind, f64>,
}

impl ConsensusResult {
    pub fn none(weights: BTreeMap<ModelKind, f64>) -> Self {
        Self {
            label: "-".to_string(),
            confidence_percent: 0,
            best: None,
            direction: None,
            weights: reported_weights(&weights),
        }
    }

    pub fn is_none(&self) -> bool {
        self.best.is_none()
    }
}

#[derive(Debug, Clone, Copy)]
struct Scored {
    kind: ModelKind,
    direction: Direction,
    strength: f64,
    rank: f64,
}

/// Reduces the per-model quotes for a row to one best model and a
/// confidence figure.
#[derive(Debug, Clone)]
pub struct ConsensusScorer {
    cfg: ConsensusConfig,
}

impl ConsensusScorer {
    pub fn new(cfg: ConsensusConfig) -> Self {
        Self { cfg }
    }

    pub fn summarize(&self, quotes: &ModelQuotes, board: &ModelScoreboard) -> ConsensusResult {
        let weights = if self.cfg.performance_weighting {
            board.weights()
        } else {
            ModelKind::ALL.into_iter().map(|k| (k, 1.0)).collect()
        };

        let mut scored: Vec<Scored> = quotes
            .iter()
            .filter_map(|(kind, quote)| {
                let (yes, no) = quote.pair()?;
                let direction = if yes >= no {
                    Direction::Up
                } else {
                    Direction::Down
                };
                let strength = (yes - no).abs();
                let weight = weights.get(&kind).copied().unwrap_or(1.0);
                Some(Scored {
                    kind,
                    direction,
                    strength,
                    rank: strength * weight,
                })
            })
            .collect();

        if scored.is_empty() {
            return ConsensusResult::none(weights);
        }

        // Stable sort: equal ranks keep ModelKind::ALL priority order.
        scored.sort_by(|a, b| b.rank.partial_cmp(&a.rank).unwrap_or(Ordering::Equal));
        let best = scored[0];

        let agreeing = scored
            .iter()
            .filter(|s| s.direction == best.direction)
            .count();
        let agreement = agreeing as f64 / scored.len() as f64;
        let raw = (self.cfg.strength_weight * best.strength + self.cfg.agreement_weight * agreement)
            * 100.0;
        let confidence = raw.clamp(1.0, 99.0).round() as u8;

        ConsensusResult {
            label: format!(
                "{}:{} {}%",
                best.kind.label(),
                best.direction.label(),
                confidence
            ),
            confidence_percent: confidence,
            best: Some(best.kind),
            direction: Some(best.direction),
            weights: reported_weights(&weights),
        }
    }
}

fn reported_weights(weights: &BTreeMap<ModelKind, f64>) -> BTreeMap<ModelKind, f64> {
    weights.iter().map(|(kind, w)| (*kind, round3(*w))).collect()
}
