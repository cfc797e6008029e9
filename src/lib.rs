//! # ImageNet Inference
//!
//! A Rust library for classifying a single image with a pretrained,
//! pre-optimized ONNX model and measuring steady-state inference latency.
//!
//! ## Features
//!
//! - **Saved-model loading** from a local directory, with signature
//!   resolution (input shape and class count)
//! - **Bicubic preprocessing** to a unit-range 224x224 NHWC tensor
//! - **Warmup-aware timing** so the reported latency reflects steady state
//! - **ImageNet label resolution** from a remote label file with an
//!   explicit on-disk cache
//!
//! ## Modules
//!
//! - `model`: saved-model loading and execution
//! - `preprocess`: image decoding, resizing, and tensor layout
//! - `labels`: class-label sources and alignment with the model output
//! - `inference`: timed runs, top-k ranking, and latency benchmarking
//! - `utils`: error types and logging setup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use imagenet_infer::{ImagePreprocessor, SavedClassifier};
//! use imagenet_infer::inference::runner::run_timed;
//!
//! let classifier = SavedClassifier::load("./optimized_models".as_ref())?;
//! let input = ImagePreprocessor::default().preprocess_from_path("parrot.jpg".as_ref())?;
//! let (probabilities, elapsed) = run_timed(&classifier, &input)?;
//! ```

pub mod inference;
pub mod labels;
pub mod model;
pub mod preprocess;
pub mod utils;

// Re-export commonly used items for convenience
pub use inference::benchmark::{BenchmarkConfig, BenchmarkReport, LatencyStats};
pub use inference::predictor::{Prediction, RankedLabel};
pub use inference::runner::{run_benchmark, run_timed};
pub use labels::{FileLabelSource, LabelSet, LabelSource, RemoteLabelSource};
pub use model::{ModelSignature, SavedClassifier};
pub use preprocess::{ImagePreprocessor, PreprocessConfig};
pub use utils::error::{Error, Result};

/// Side length the model expects for its square input image
pub const IMAGE_SIZE: usize = 224;

/// Number of color channels the model expects
pub const CHANNELS: usize = 3;

/// Number of predictions reported by default
pub const DEFAULT_TOP_K: usize = 3;

/// Public label file for ImageNet class names
pub const DEFAULT_LABELS_URL: &str =
    "https://storage.googleapis.com/download.tensorflow.org/data/ImageNetLabels.txt";

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
