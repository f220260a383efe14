pub mod config;
pub mod coverage;
pub mod goals;
pub mod optimizer;
pub mod output;
pub mod plan;
pub mod progress;
pub mod snapshot;
