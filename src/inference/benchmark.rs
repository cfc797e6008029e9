//! Latency measurement utilities.
//!
//! Generalizes the warmup-then-time pattern of a single classification run
//! into repeated timed iterations with summary statistics.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::utils::error::Result;

/// Configuration for a latency benchmark
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Number of warmup iterations (excluded from measurements)
    pub warmup_iterations: usize,
    /// Number of timed iterations
    pub iterations: usize,
    /// Output file for the JSON report (optional)
    pub output_path: Option<PathBuf>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            warmup_iterations: 10,
            iterations: 100,
            output_path: None,
        }
    }
}

impl BenchmarkConfig {
    /// A short configuration for smoke-testing a setup
    pub fn quick() -> Self {
        Self {
            warmup_iterations: 2,
            iterations: 10,
            output_path: None,
        }
    }
}

/// Latency statistics over the timed iterations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatencyStats {
    /// Mean latency in milliseconds
    pub mean_ms: f64,
    /// Standard deviation in milliseconds
    pub std_ms: f64,
    /// Minimum latency
    pub min_ms: f64,
    /// Maximum latency
    pub max_ms: f64,
    /// Median (50th percentile)
    pub p50_ms: f64,
    /// 95th percentile
    pub p95_ms: f64,
    /// 99th percentile
    pub p99_ms: f64,
}

impl LatencyStats {
    /// Calculate statistics from a list of durations
    pub fn from_durations(durations: &[Duration]) -> Self {
        if durations.is_empty() {
            return Self::default();
        }

        let mut times_ms: Vec<f64> =
            durations.iter().map(|d| d.as_secs_f64() * 1000.0).collect();
        times_ms.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let n = times_ms.len();
        let mean = times_ms.iter().sum::<f64>() / n as f64;
        let variance =
            times_ms.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / n as f64;

        Self {
            mean_ms: mean,
            std_ms: variance.sqrt(),
            min_ms: times_ms[0],
            max_ms: times_ms[n - 1],
            p50_ms: percentile(&times_ms, 50.0),
            p95_ms: percentile(&times_ms, 95.0),
            p99_ms: percentile(&times_ms, 99.0),
        }
    }
}

/// Calculate a percentile from sorted data
fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let idx = (p / 100.0 * (sorted_data.len() - 1) as f64).round() as usize;
    sorted_data[idx.min(sorted_data.len() - 1)]
}

/// Timer collecting per-iteration durations
pub struct Timer {
    start: Instant,
    times: Vec<Duration>,
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            times: Vec::new(),
        }
    }

    /// Start timing an iteration
    pub fn start(&mut self) {
        self.start = Instant::now();
    }

    /// Stop timing and record the duration
    pub fn stop(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        self.times.push(elapsed);
        elapsed
    }

    /// All recorded durations
    pub fn times(&self) -> &[Duration] {
        &self.times
    }

    /// Statistics over the recorded durations
    pub fn stats(&self) -> LatencyStats {
        LatencyStats::from_durations(&self.times)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Results of a benchmark run, serializable for later comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Inference engine identifier
    pub framework: String,
    /// Path of the benchmarked model artifact
    pub model: String,
    /// Model artifact size in megabytes
    pub model_size_mb: f64,
    /// Input image side length
    pub image_size: usize,
    /// Number of timed iterations
    pub iterations: usize,
    /// Number of warmup iterations
    pub warmup_iterations: usize,
    /// Latency statistics
    pub latency: LatencyStats,
    /// Throughput in images per second
    pub throughput_fps: f64,
    /// When the benchmark was run
    pub timestamp: String,
}

impl BenchmarkReport {
    /// Build a report from timing data
    pub fn new(
        latency: LatencyStats,
        config: &BenchmarkConfig,
        model: &Path,
        model_size_mb: f64,
        image_size: usize,
    ) -> Self {
        let throughput_fps = if latency.mean_ms > 0.0 {
            1000.0 / latency.mean_ms
        } else {
            0.0
        };

        Self {
            framework: "tract (Rust)".to_string(),
            model: model.display().to_string(),
            model_size_mb,
            image_size,
            iterations: config.iterations,
            warmup_iterations: config.warmup_iterations,
            latency,
            throughput_fps,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Save the report to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// One-line summary of the run
    pub fn summary(&self) -> String {
        format!(
            "Latency: {:.2}ms (mean), {:.2}ms (p95), {:.2}ms (p99) | Throughput: {:.1} img/s",
            self.latency.mean_ms, self.latency.p95_ms, self.latency.p99_ms, self.throughput_fps
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_stats() {
        let durations: Vec<Duration> = vec![
            Duration::from_millis(10),
            Duration::from_millis(12),
            Duration::from_millis(11),
            Duration::from_millis(15),
            Duration::from_millis(9),
        ];

        let stats = LatencyStats::from_durations(&durations);

        assert!((stats.mean_ms - 11.4).abs() < 0.1);
        assert_eq!(stats.min_ms, 9.0);
        assert_eq!(stats.max_ms, 15.0);
        assert!(stats.p50_ms >= stats.min_ms && stats.p50_ms <= stats.max_ms);
    }

    #[test]
    fn test_latency_stats_empty() {
        let stats = LatencyStats::from_durations(&[]);
        assert_eq!(stats.mean_ms, 0.0);
        assert_eq!(stats.p99_ms, 0.0);
    }

    #[test]
    fn test_timer() {
        let mut timer = Timer::new();

        for _ in 0..5 {
            timer.start();
            std::thread::sleep(Duration::from_millis(1));
            timer.stop();
        }

        assert_eq!(timer.times().len(), 5);
        assert!(timer.stats().mean_ms >= 1.0);
    }

    #[test]
    fn test_benchmark_config_defaults() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.warmup_iterations, 10);
        assert_eq!(config.iterations, 100);
        assert!(config.output_path.is_none());
    }

    #[test]
    fn test_report_roundtrip() {
        let timings = vec![
            Duration::from_millis(100),
            Duration::from_millis(120),
            Duration::from_millis(110),
        ];
        let report = BenchmarkReport::new(
            LatencyStats::from_durations(&timings),
            &BenchmarkConfig::default(),
            Path::new("optimized_models/model.onnx"),
            12.5,
            224,
        );

        assert!(report.throughput_fps > 0.0);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        report.save(&path).unwrap();

        let loaded: BenchmarkReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.iterations, report.iterations);
        assert_eq!(loaded.model, "optimized_models/model.onnx");
    }
}
