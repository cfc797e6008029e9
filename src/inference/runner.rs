//! Drives inference passes against a loaded model.
//!
//! The first call against a freshly loaded plan pays one-time
//! initialization cost, so every entry point here runs at least one
//! discarded warmup pass before timing anything.

use std::time::{Duration, Instant};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tract_onnx::prelude::tract_ndarray::Array4;
use tracing::{debug, info};

use crate::inference::benchmark::{BenchmarkConfig, BenchmarkReport, Timer};
use crate::model::SavedClassifier;
use crate::utils::error::Result;
use crate::IMAGE_SIZE;

/// Run inference with one discarded warmup call, timing the second call.
///
/// Returns the timed call's probability vector and its wall-clock
/// duration. The warmup result is discarded; it must be numerically
/// identical to the timed result.
pub fn run_timed(
    classifier: &SavedClassifier,
    input: &Array4<f32>,
) -> Result<(Vec<f32>, Duration)> {
    debug!("Running warmup pass");
    let _ = classifier.predict(input.clone())?;

    let start = Instant::now();
    let probabilities = classifier.predict(input.clone())?;
    let elapsed = start.elapsed();

    debug!("Timed pass completed in {:.6}s", elapsed.as_secs_f64());
    Ok((probabilities, elapsed))
}

/// Run repeated timed iterations over the same input tensor.
///
/// This is repeated single-image timing, not batch inference: every
/// iteration feeds the identical batch-of-one tensor.
pub fn run_benchmark(
    classifier: &SavedClassifier,
    input: &Array4<f32>,
    config: &BenchmarkConfig,
) -> Result<BenchmarkReport> {
    info!(
        "Benchmarking {} ({} warmup + {} timed iterations)",
        classifier.source().display(),
        config.warmup_iterations,
        config.iterations
    );

    for _ in 0..config.warmup_iterations {
        classifier.predict(input.clone())?;
    }

    let progress = ProgressBar::new(config.iterations as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} iterations ({eta})")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut timer = Timer::new();
    for _ in 0..config.iterations {
        timer.start();
        classifier.predict(input.clone())?;
        timer.stop();
        progress.inc(1);
    }
    progress.finish_and_clear();

    let report = BenchmarkReport::new(
        timer.stats(),
        config,
        classifier.source(),
        classifier.artifact_size_mb(),
        IMAGE_SIZE,
    );

    println!("{}", "Benchmark Results:".cyan().bold());
    println!(
        "  {} {} ± {} ms",
        "Mean latency:".green(),
        format!("{:.2}", report.latency.mean_ms).bold(),
        format!("{:.2}", report.latency.std_ms)
    );
    println!(
        "  P50/P95/P99: {:.2}/{:.2}/{:.2} ms",
        report.latency.p50_ms, report.latency.p95_ms, report.latency.p99_ms
    );
    println!("  Min/Max: {:.2}/{:.2} ms", report.latency.min_ms, report.latency.max_ms);
    println!(
        "  {} {} FPS",
        "Throughput:".green(),
        format!("{:.1}", report.throughput_fps).bold()
    );
    if report.model_size_mb > 0.0 {
        println!("  Model size: {:.2} MB", report.model_size_mb);
    }

    if let Some(output_path) = &config.output_path {
        report.save(output_path)?;
        info!("Saved benchmark report to {}", output_path.display());
    }

    Ok(report)
}
