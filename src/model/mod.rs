pub mod quote;
pub mod sample;
pub mod signal;
pub mod snapshot;
