//! Inference: timed runs, top-k ranking, and latency benchmarking.

pub mod benchmark;
pub mod predictor;
pub mod runner;

pub use benchmark::{BenchmarkConfig, BenchmarkReport, LatencyStats, Timer};
pub use predictor::{Prediction, RankedLabel};
pub use runner::{run_benchmark, run_timed};
