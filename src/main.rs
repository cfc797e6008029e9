//! ImageNet Inference CLI
//!
//! Classifies a single image with a pretrained, pre-optimized model and
//! reports steady-state inference latency and the top-k labels.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use imagenet_infer::utils::logging::init_logging;
use imagenet_infer::{
    run_benchmark, run_timed, BenchmarkConfig, FileLabelSource, ImagePreprocessor, LabelSet,
    Prediction, RemoteLabelSource, SavedClassifier, DEFAULT_LABELS_URL, DEFAULT_TOP_K,
};

/// Single-image ImageNet classification with a pre-optimized model
#[derive(Parser, Debug)]
#[command(name = "imagenet_infer")]
#[command(version)]
#[command(about = "Classify one image with a pretrained optimized model", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a single image and print the top-k labels
    Classify {
        /// Path to the input image
        #[arg(short, long, default_value = "parrot.jpg")]
        image: PathBuf,

        /// Directory containing the optimized saved model
        #[arg(short, long, default_value = "./optimized_models")]
        model_dir: PathBuf,

        /// Number of top predictions to print
        #[arg(short = 'k', long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Read labels from a local file instead of the network
        #[arg(long)]
        labels_file: Option<PathBuf>,

        /// Cache file for the downloaded label list
        #[arg(long, default_value = "data/ImageNetLabels.txt")]
        labels_cache: PathBuf,
    },

    /// Measure steady-state inference latency over repeated iterations
    Benchmark {
        /// Path to the input image
        #[arg(short, long, default_value = "parrot.jpg")]
        image: PathBuf,

        /// Directory containing the optimized saved model
        #[arg(short, long, default_value = "./optimized_models")]
        model_dir: PathBuf,

        /// Number of timed iterations
        #[arg(short = 'n', long, default_value = "100")]
        iterations: usize,

        /// Warmup iterations excluded from measurement
        #[arg(short, long, default_value = "10")]
        warmup: usize,

        /// Write the JSON report to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Classify {
            image,
            model_dir,
            top_k,
            labels_file,
            labels_cache,
        } => classify(image, model_dir, top_k, labels_file, labels_cache),
        Commands::Benchmark {
            image,
            model_dir,
            iterations,
            warmup,
            output,
        } => benchmark(image, model_dir, iterations, warmup, output),
    }
}

fn classify(
    image: PathBuf,
    model_dir: PathBuf,
    top_k: usize,
    labels_file: Option<PathBuf>,
    labels_cache: PathBuf,
) -> Result<()> {
    let classifier = SavedClassifier::load(&model_dir)
        .with_context(|| format!("Failed to load saved model from {}", model_dir.display()))?;
    info!(
        "Model: {} ({} classes)",
        classifier.source().display(),
        classifier.num_classes()
    );

    let input = ImagePreprocessor::default()
        .preprocess_from_path(&image)
        .with_context(|| format!("Failed to preprocess {}", image.display()))?;

    let labels = match labels_file {
        Some(path) => LabelSet::from_source(&FileLabelSource::new(path)),
        None => LabelSet::from_source(&RemoteLabelSource::new(DEFAULT_LABELS_URL, labels_cache)),
    }
    .context("Failed to resolve class labels")?
    .align_to(classifier.num_classes())
    .context("Label list does not match the model output")?;

    let (probabilities, elapsed) = run_timed(&classifier, &input)?;
    let prediction = Prediction::new(probabilities, &labels, top_k, elapsed)?;

    println!("{}", "Classification Results:".cyan().bold());
    print!("{}", prediction.display());

    Ok(())
}

fn benchmark(
    image: PathBuf,
    model_dir: PathBuf,
    iterations: usize,
    warmup: usize,
    output: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(iterations > 0, "Iteration count must be greater than 0");

    let classifier = SavedClassifier::load(&model_dir)
        .with_context(|| format!("Failed to load saved model from {}", model_dir.display()))?;

    let input = ImagePreprocessor::default()
        .preprocess_from_path(&image)
        .with_context(|| format!("Failed to preprocess {}", image.display()))?;

    let config = BenchmarkConfig {
        warmup_iterations: warmup,
        iterations,
        output_path: output,
    };
    let report = run_benchmark(&classifier, &input, &config)?;
    info!("{}", report.summary());

    Ok(())
}
