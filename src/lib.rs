pub mod config;
pub mod consensus;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod model;
pub mod model_stats;
pub mod pricing;
pub mod replay;
pub mod signal;

pub use engine::{RowAnalysis, SignalEngine, SnapshotAnalysis};
