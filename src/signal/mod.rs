pub mod estimator;

pub use estimator::{sigmoid, MomentumSignalEstimator};
