//! Saved-model loading and execution.

pub mod classifier;

pub use classifier::{ModelSignature, SavedClassifier};
