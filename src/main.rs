use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::BufReader;
use tokio::sync::mpsc;

use binary_quant::config::Config;
use binary_quant::error::AppError;
use binary_quant::model_stats::ModelScoreboard;
use binary_quant::replay::{read_records, run_engine, ReplayRecord};
use binary_quant::SignalEngine;

const RECORD_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Default)]
struct CliArgs {
    input: Option<PathBuf>,
    stats: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<CliArgs, AppError> {
    let mut out = CliArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--stats" => {
                let path = iter
                    .next()
                    .ok_or_else(|| AppError::Config("--stats requires a path".to_string()))?;
                out.stats = Some(PathBuf::from(path));
            }
            "-" => out.input = None,
            other if other.starts_with("--") => {
                return Err(AppError::Config(format!("unknown flag '{}'", other)));
            }
            other => out.input = Some(PathBuf::from(other)),
        }
    }
    Ok(out)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = parse_args(&args)?;

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };

    // stdout carries the analysis stream, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".into())
            }),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .json()
        .init();

    let scoreboard = match &cli.stats {
        Some(path) => ModelScoreboard::load_from_path(path)?,
        None => ModelScoreboard::new(),
    };

    tracing::info!(
        input = %cli.input.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "stdin".to_string()),
        horizon_secs = config.history.horizon_secs,
        "Starting binary-quant"
    );

    let engine = SignalEngine::new(config).with_scoreboard(scoreboard);
    let (tx, rx) = mpsc::channel::<ReplayRecord>(RECORD_CHANNEL_CAPACITY);

    let input = cli.input.clone();
    let reader_task = tokio::spawn(async move {
        match input {
            Some(path) => {
                let file = tokio::fs::File::open(&path)
                    .await
                    .with_context(|| format!("failed to open {}", path.display()))?;
                read_records(BufReader::new(file), tx).await
            }
            None => read_records(BufReader::new(tokio::io::stdin()), tx).await,
        }
    });
    let engine_task = tokio::spawn(run_engine(engine, rx, tokio::io::stdout()));

    tokio::select! {
        res = engine_task => {
            let engine = res.context("engine task panicked")??;
            match reader_task.await {
                Ok(Ok(summary)) => tracing::info!(
                    lines = summary.lines,
                    forwarded = summary.forwarded,
                    skipped = summary.skipped,
                    "Input exhausted"
                ),
                Ok(Err(e)) => tracing::error!(error = %e, "Record reader failed"),
                Err(e) => tracing::error!(error = %e, "Record reader panicked"),
            }
            if let Some(path) = &cli.stats {
                engine.scoreboard().persist_to_path(path)?;
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Ctrl+C received");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_input_and_stats() {
        let cli = parse_args(&args(&["snaps.jsonl", "--stats", "data/stats.json"])).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("snaps.jsonl")));
        assert_eq!(cli.stats, Some(PathBuf::from("data/stats.json")));
    }

    #[test]
    fn rejects_dangling_stats_flag() {
        assert!(parse_args(&args(&["--stats"])).is_err());
        assert!(parse_args(&args(&["--bogus"])).is_err());
    }
}
