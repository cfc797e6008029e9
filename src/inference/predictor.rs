//! Prediction ranking and reporting.
//!
//! Turns a probability vector and an aligned label list into a ranked
//! top-k result ready for display.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::labels::LabelSet;
use crate::utils::error::{Error, Result};

/// One entry of the ranked prediction list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedLabel {
    /// Class index into the probability vector
    pub class_index: usize,
    /// Human-readable class name
    pub label: String,
    /// Probability for this class
    pub probability: f32,
}

/// Result of a single classified image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Full probability distribution over all classes
    pub probabilities: Vec<f32>,
    /// Top-k predictions in descending probability order
    pub top_k: Vec<RankedLabel>,
    /// Wall-clock time of the timed inference call, in seconds
    pub inference_time_secs: f64,
}

impl Prediction {
    /// Build a prediction from a probability vector and aligned labels.
    ///
    /// The label list must already be aligned: one entry per class.
    pub fn new(
        probabilities: Vec<f32>,
        labels: &LabelSet,
        k: usize,
        elapsed: Duration,
    ) -> Result<Self> {
        if labels.len() != probabilities.len() {
            return Err(Error::LabelMismatch {
                expected: probabilities.len(),
                found: labels.len(),
            });
        }

        let top_k = rank_top_k(&probabilities, k)
            .into_iter()
            .map(|(index, probability)| RankedLabel {
                class_index: index,
                label: labels.get(index).unwrap_or("unknown").to_string(),
                probability,
            })
            .collect();

        Ok(Self {
            probabilities,
            top_k,
            inference_time_secs: elapsed.as_secs_f64(),
        })
    }

    /// The highest-probability entry
    pub fn top1(&self) -> Option<&RankedLabel> {
        self.top_k.first()
    }

    /// Render the result block: latency line plus one line per entry
    pub fn display(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("time: {}s\n", self.inference_time_secs));
        for entry in &self.top_k {
            output.push_str(&format!("{:.6} : {}\n", entry.probability, entry.label));
        }
        output
    }
}

/// Rank class indices by probability, keeping the k highest in
/// descending order
pub fn rank_top_k(probabilities: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut indexed: Vec<(usize, f32)> = probabilities.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap());
    indexed.truncate(k);
    indexed
}
