//! Saved-model loader built on tract.
//!
//! Locates the ONNX artifact inside a saved-model directory, declares the
//! expected input fact, optimizes the graph, and exposes a single
//! inference entry point.

use std::fs;
use std::path::{Path, PathBuf};

use tract_onnx::prelude::tract_ndarray::Array4;
use tract_onnx::prelude::*;
use tracing::{debug, info};

use crate::utils::error::{Error, Result};
use crate::{CHANNELS, IMAGE_SIZE};

/// File name the loader looks for first inside the model directory
const DEFAULT_MODEL_FILE: &str = "model.onnx";

type OnnxPlan = Arc<TypedSimplePlan>;

/// Resolved input/output shapes of a loaded model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSignature {
    /// Expected input tensor shape (NHWC, batch of one)
    pub input_shape: [usize; 4],
    /// Length of the output probability vector
    pub num_classes: usize,
}

/// A pretrained classifier loaded from a saved-model directory
pub struct SavedClassifier {
    plan: OnnxPlan,
    signature: ModelSignature,
    source: PathBuf,
}

impl SavedClassifier {
    /// Load the model artifact found in `model_dir`.
    ///
    /// Looks for `model.onnx` first, then falls back to the first `.onnx`
    /// entry in lexicographic order. Fatal if the directory is missing or
    /// holds no loadable artifact.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_file = resolve_model_file(model_dir)?;
        info!("Loading saved model from {}", model_file.display());

        let plan = tract_onnx::onnx()
            .model_for_path(&model_file)
            .and_then(|model| {
                model.with_input_fact(
                    0,
                    InferenceFact::dt_shape(
                        f32::datum_type(),
                        tvec!(1, IMAGE_SIZE, IMAGE_SIZE, CHANNELS),
                    ),
                )
            })
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| Error::Model(format!("{}: {e}", model_file.display())))?;

        let signature = resolve_signature(&plan)?;
        debug!(
            "Resolved signature: input {:?}, {} classes",
            signature.input_shape, signature.num_classes
        );

        Ok(Self {
            plan,
            signature,
            source: model_file,
        })
    }

    /// The resolved inference signature
    pub fn signature(&self) -> &ModelSignature {
        &self.signature
    }

    /// Length of the output probability vector
    pub fn num_classes(&self) -> usize {
        self.signature.num_classes
    }

    /// Path of the loaded model artifact
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Size of the model artifact on disk, in megabytes
    pub fn artifact_size_mb(&self) -> f64 {
        fs::metadata(&self.source)
            .map(|m| m.len() as f64 / (1024.0 * 1024.0))
            .unwrap_or(0.0)
    }

    /// Run one inference pass, returning the flattened probability vector
    pub fn predict(&self, input: Array4<f32>) -> Result<Vec<f32>> {
        let tensor: Tensor = input.into();
        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| Error::Inference(e.to_string()))?;

        let view = outputs[0]
            .to_plain_array_view::<f32>()
            .map_err(|e| Error::Inference(e.to_string()))?;

        Ok(view.iter().copied().collect())
    }
}

/// Locate the ONNX artifact inside a saved-model directory
fn resolve_model_file(dir: &Path) -> Result<PathBuf> {
    if !dir.is_dir() {
        return Err(Error::PathNotFound(dir.to_path_buf()));
    }

    let preferred = dir.join(DEFAULT_MODEL_FILE);
    if preferred.is_file() {
        return Ok(preferred);
    }

    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map_or(false, |ext| ext.eq_ignore_ascii_case("onnx"))
        })
        .collect();
    candidates.sort();

    candidates.into_iter().next().ok_or_else(|| {
        Error::Model(format!("no .onnx artifact found in {}", dir.display()))
    })
}

/// Resolve the signature from the optimized plan's output fact
fn resolve_signature(plan: &OnnxPlan) -> Result<ModelSignature> {
    let output_fact = plan
        .model()
        .output_fact(0)
        .map_err(|e| Error::Model(e.to_string()))?;

    let dims = output_fact
        .shape
        .as_concrete()
        .ok_or_else(|| Error::Model("output shape is not concrete".to_string()))?;

    let num_classes = *dims
        .last()
        .ok_or_else(|| Error::Model("output tensor has no dimensions".to_string()))?;

    Ok(ModelSignature {
        input_shape: [1, IMAGE_SIZE, IMAGE_SIZE, CHANNELS],
        num_classes,
    })
}
