use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot line {line}: {reason}")]
    Snapshot { line: usize, reason: String },
}
