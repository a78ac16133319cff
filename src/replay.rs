use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use crate::engine::SignalEngine;
use crate::error::AppError;
use crate::model::snapshot::Snapshot;
use crate::pricing::ModelKind;

/// Realized PnL from trading on one model's quote.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ModelOutcome {
    #[serde(deserialize_with = "model_from_label")]
    pub model: ModelKind,
    pub pnl: f64,
}

fn model_from_label<'de, D>(deserializer: D) -> Result<ModelKind, D::Error>
where
    D: Deserializer<'de>,
{
    let label = String::deserialize(deserializer)?;
    ModelKind::from_label(&label)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown model '{}'", label)))
}

/// One line of the replay stream: a market snapshot, or
/// `{"outcome": {"model": "TA", "pnl": 3.2}}` feeding the model scoreboard.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayRecord {
    Snapshot(Snapshot),
    Outcome(ModelOutcome),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    pub lines: usize,
    pub forwarded: usize,
    pub skipped: usize,
}

/// Parse one JSON-lines record. Blank lines yield `Ok(None)`.
pub fn parse_record_line(line_no: usize, line: &str) -> Result<Option<ReplayRecord>, AppError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let malformed = |e: serde_json::Error| AppError::Snapshot {
        line: line_no,
        reason: e.to_string(),
    };
    let value: serde_json::Value = serde_json::from_str(trimmed).map_err(malformed)?;
    let record = match value.get("outcome") {
        Some(outcome) => {
            ReplayRecord::Outcome(ModelOutcome::deserialize(outcome).map_err(malformed)?)
        }
        None => ReplayRecord::Snapshot(Snapshot::deserialize(value).map_err(malformed)?),
    };
    Ok(Some(record))
}

/// Read records line by line and forward them in order. Malformed lines
/// are logged and skipped. Stops early if the receiver goes away.
pub async fn read_records<R>(reader: R, tx: mpsc::Sender<ReplayRecord>) -> Result<ReadSummary>
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = ReadSummary::default();
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await.context("failed to read replay line")? {
        summary.lines += 1;
        match parse_record_line(summary.lines, &line) {
            Ok(Some(record)) => {
                if tx.send(record).await.is_err() {
                    tracing::info!("Record receiver closed, reader exiting");
                    break;
                }
                summary.forwarded += 1;
            }
            Ok(None) => {}
            Err(e) => {
                summary.skipped += 1;
                tracing::warn!(error = %e, "Skipping malformed record");
            }
        }
    }
    Ok(summary)
}

/// Sole owner of the engine: processes records as they arrive and writes
/// one JSON analysis per snapshot. Outcomes update the scoreboard and
/// produce no output. Returns the engine once the channel closes.
pub async fn run_engine<W>(
    mut engine: SignalEngine,
    mut rx: mpsc::Receiver<ReplayRecord>,
    mut out: W,
) -> Result<SignalEngine>
where
    W: AsyncWrite + Unpin,
{
    while let Some(record) = rx.recv().await {
        let snapshot = match record {
            ReplayRecord::Snapshot(snapshot) => snapshot,
            ReplayRecord::Outcome(outcome) => {
                engine.record_model_outcome(outcome.model, outcome.pnl);
                continue;
            }
        };
        let analysis = engine.on_snapshot(&snapshot);
        let mut line =
            serde_json::to_string(&analysis).context("failed to serialize snapshot analysis")?;
        line.push('\n');
        out.write_all(line.as_bytes())
            .await
            .context("failed to write snapshot analysis")?;
    }
    out.flush().await.context("failed to flush output")?;
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_line_is_skipped_quietly() {
        assert!(parse_record_line(1, "   ").unwrap().is_none());
    }

    #[test]
    fn malformed_line_reports_line_number() {
        let err = parse_record_line(7, "{not json").unwrap_err();
        assert!(err.to_string().starts_with("snapshot line 7:"));
    }

    #[test]
    fn outcome_line_uses_model_labels() {
        let record = parse_record_line(1, r#"{"outcome":{"model":"ll","pnl":-4.5}}"#)
            .unwrap()
            .unwrap();
        assert_eq!(
            record,
            ReplayRecord::Outcome(ModelOutcome {
                model: ModelKind::LeadLag,
                pnl: -4.5,
            })
        );
    }

    #[test]
    fn outcome_with_unknown_model_is_malformed() {
        let err = parse_record_line(3, r#"{"outcome":{"model":"XX","pnl":1.0}}"#).unwrap_err();
        assert!(err.to_string().contains("unknown model 'XX'"));
    }

    #[test]
    fn plain_snapshot_line_parses_as_snapshot() {
        let record = parse_record_line(1, r#"{"timestamp":3,"rows":[]}"#)
            .unwrap()
            .unwrap();
        assert!(matches!(record, ReplayRecord::Snapshot(s) if s.timestamp == Some(3.0)));
    }
}
